//! Error types for profile parsing and export operations.

use thiserror::Error;

/// Primary error type for stickmap operations.
#[derive(Error, Debug)]
pub enum StickmapError {
    // Profile parsing errors
    #[error("Profile file not found: {path}")]
    ProfileNotFound { path: String },

    #[error("Malformed profile document '{path}': {reason}")]
    MalformedDocument { path: String, reason: String },

    // Inheritance errors
    #[error("Mode '{mode}' of device '{device}' inherits from unknown mode '{target}'")]
    MissingInheritTarget {
        device: String,
        mode: String,
        target: String,
    },

    #[error("Circular inheritance involving mode '{mode}' of device '{device}'")]
    CircularInheritance { device: String, mode: String },

    // Template store errors
    #[error("No template stored for device: {device_id}")]
    TemplateNotFound { device_id: String },

    #[error("Template file not found: {path}")]
    TemplateFileNotFound { path: String },

    #[error("Template store error: {0}")]
    Database(String),

    // Settings errors
    #[error("Settings parse error: {0}")]
    SettingsParse(String),

    #[error("Settings invalid: {0}")]
    SettingsInvalid(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl StickmapError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound { .. }
                | Self::MissingInheritTarget { .. }
                | Self::TemplateNotFound { .. }
                | Self::TemplateFileNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ProfileNotFound { .. } => {
                Some("Check the profile path; Joystick Gremlin profiles end in .xml")
            }
            Self::MissingInheritTarget { .. } => {
                Some("Fix the mode's inherit attribute to name an existing mode")
            }
            Self::TemplateNotFound { .. } => Some("Run: stickmap set-template <DEVICE_ID> <SVG>"),
            Self::TemplateFileNotFound { .. } => {
                Some("Check that the stored SVG template still exists on disk")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using StickmapError.
pub type Result<T> = std::result::Result<T, StickmapError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| StickmapError::Other(format!("{}: {e}", f().into())))
    }
}
