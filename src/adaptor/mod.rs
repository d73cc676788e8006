//! Profile adaptors: vendor profile formats -> [`ProfileDictionary`].
//!
//! Currently covers Joystick Gremlin (~v13) XML profiles.

mod dictionary;
mod joystick_gremlin;

pub use dictionary::{
    BUTTON_KEY_PREFIX, DEFAULT_NO_BIND_TEXT, DeviceBindings, ModeBindings, ProfileDictionary,
    button_key,
};
pub use joystick_gremlin::{JoystickGremlin, parse};
