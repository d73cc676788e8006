//! Parsed profile data model: device -> mode -> button -> label.
//!
//! A [`ProfileDictionary`] is built fresh per parse invocation and returned as a
//! snapshot; nothing mutates it incrementally afterwards. Devices and modes keep
//! document order, button keys are unique within a mode.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, StickmapError};

/// Prefix applied to raw button ids when keying bindings.
pub const BUTTON_KEY_PREFIX: &str = "BUTTON_";

/// Default label for buttons present in the profile but without a description.
pub const DEFAULT_NO_BIND_TEXT: &str = "No Bind";

/// Build the binding key for a raw button id.
#[must_use]
pub fn button_key(id: &str) -> String {
    format!("{BUTTON_KEY_PREFIX}{id}")
}

/// Bindings for one mode of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeBindings {
    /// Mode name, scoped to the owning device.
    pub name: String,
    /// Name of the sibling mode this mode inherits unset bindings from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherit: Option<String>,
    /// Button key -> function label.
    pub buttons: BTreeMap<String, String>,
}

impl ModeBindings {
    #[must_use]
    pub fn new(name: impl Into<String>, inherit: Option<String>) -> Self {
        Self {
            name: name.into(),
            inherit,
            buttons: BTreeMap::new(),
        }
    }

    /// Insert a binding. Duplicate keys silently overwrite (last wins).
    pub fn bind(&mut self, key: String, label: String) {
        trace!(mode = %self.name, key = %key, "Binding button");
        self.buttons.insert(key, label);
    }

    /// Look up a binding label by key.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.buttons.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

/// All modes of a single device, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBindings {
    /// Device name (not guaranteed globally unique across files).
    pub name: String,
    pub modes: Vec<ModeBindings>,
}

impl DeviceBindings {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modes: Vec::new(),
        }
    }

    /// Find a mode by name.
    #[must_use]
    pub fn mode(&self, name: &str) -> Option<&ModeBindings> {
        self.modes.iter().find(|m| m.name == name)
    }

    /// Mode names in document order.
    #[must_use]
    pub fn mode_names(&self) -> Vec<String> {
        self.modes.iter().map(|m| m.name.clone()).collect()
    }
}

/// The accumulated parse result for one profile document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDictionary {
    pub devices: Vec<DeviceBindings>,
}

impl ProfileDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a device by name.
    #[must_use]
    pub fn device(&self, name: &str) -> Option<&DeviceBindings> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Device names in document order.
    #[must_use]
    pub fn device_names(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.name.clone()).collect()
    }

    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Total bindings across all devices and modes.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.devices
            .iter()
            .flat_map(|d| &d.modes)
            .map(|m| m.buttons.len())
            .sum()
    }

    /// Resolve inheritance edges recorded during extraction.
    ///
    /// For every mode naming an inherit source, bindings missing from the
    /// inheriting mode are copied in from the source. Chains are followed
    /// transitively against the pre-resolution snapshot, so the nearest
    /// ancestor wins among inherited values and the inheriting mode always
    /// wins over any ancestor.
    ///
    /// Fails closed: a named source that does not exist in the same device is
    /// [`StickmapError::MissingInheritTarget`], and revisiting a mode while
    /// walking a chain is [`StickmapError::CircularInheritance`].
    pub fn resolve_inheritance(&mut self) -> Result<()> {
        for device in &mut self.devices {
            // Merge against the unresolved snapshot; a mode that is itself a
            // base is never re-merged differently for different children.
            let snapshot = device.modes.clone();

            for mode in &mut device.modes {
                let Some(first_target) = mode.inherit.clone() else {
                    continue;
                };

                let mut visited: HashSet<String> = HashSet::new();
                visited.insert(mode.name.clone());
                let mut target = first_target;

                loop {
                    if !visited.insert(target.clone()) {
                        return Err(StickmapError::CircularInheritance {
                            device: device.name.clone(),
                            mode: mode.name.clone(),
                        });
                    }

                    let source = snapshot.iter().find(|m| m.name == target).ok_or_else(|| {
                        StickmapError::MissingInheritTarget {
                            device: device.name.clone(),
                            mode: mode.name.clone(),
                            target: target.clone(),
                        }
                    })?;

                    for (key, label) in &source.buttons {
                        mode.buttons
                            .entry(key.clone())
                            .or_insert_with(|| label.clone());
                    }

                    match &source.inherit {
                        Some(next) => target = next.clone(),
                        None => break,
                    }
                }

                debug!(
                    device = %device.name,
                    mode = %mode.name,
                    bindings = mode.buttons.len(),
                    "Resolved inheritance"
                );
            }
        }
        Ok(())
    }

    /// Remove from every device any mode whose name is not in `filter`.
    ///
    /// A pure reduction: no-op when the filter set is empty.
    pub fn filter_modes(&mut self, filter: &HashSet<String>) {
        if filter.is_empty() {
            return;
        }
        for device in &mut self.devices {
            device.modes.retain(|m| filter.contains(&m.name));
        }
        debug!(modes = ?filter, "Applied profile filter");
    }
}
