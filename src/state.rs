//! Application-wide state: the processed profile object mapping.
//!
//! Holds parsed profile dictionaries keyed by profile identifier so that the
//! export path can be handed every accumulated result.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::{debug, info};

use crate::adaptor::ProfileDictionary;

/// Parsed profiles accumulated during a session.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Profile identifier -> parsed dictionary.
    pub profiles: HashMap<String, ProfileDictionary>,
}

impl AppState {
    /// Create a new empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed profile, replacing any previous result for the id.
    pub fn record_profile(&mut self, id: impl Into<String>, dictionary: ProfileDictionary) {
        let id = id.into();
        debug!(profile = %id, devices = dictionary.device_count(), "Recording processed profile");
        self.profiles.insert(id, dictionary);
    }

    /// Look up a processed profile by id.
    #[must_use]
    pub fn profile(&self, id: &str) -> Option<&ProfileDictionary> {
        self.profiles.get(id)
    }

    /// Identifiers of all processed profiles.
    #[must_use]
    pub fn profile_ids(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    #[must_use]
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// Drop all processed profiles.
    pub fn reset(&mut self) {
        info!("Application state reset");
        self.profiles.clear();
    }

    /// Summary of accumulated results for reporting.
    #[must_use]
    pub fn summary(&self) -> StateSummary {
        StateSummary {
            profile_count: self.profiles.len(),
            device_count: self.profiles.values().map(ProfileDictionary::device_count).sum(),
            binding_count: self.profiles.values().map(ProfileDictionary::binding_count).sum(),
        }
    }
}

/// Summary of application state for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    /// Number of processed profiles.
    pub profile_count: usize,
    /// Devices across all processed profiles.
    pub device_count: usize,
    /// Bindings across all processed profiles.
    pub binding_count: usize,
}

/// Global application state with thread-safe access.
static APP_STATE: LazyLock<RwLock<AppState>> = LazyLock::new(|| RwLock::new(AppState::default()));

/// Get read access to the application state.
///
/// # Panics
///
/// Panics if the lock is poisoned.
#[must_use]
pub fn app_state() -> RwLockReadGuard<'static, AppState> {
    APP_STATE.read().expect("app state lock poisoned")
}

/// Get write access to the application state.
///
/// # Panics
///
/// Panics if the lock is poisoned.
#[must_use]
pub fn app_state_mut() -> RwLockWriteGuard<'static, AppState> {
    APP_STATE.write().expect("app state lock poisoned")
}

/// Record operations using the global state.
pub mod record {
    use super::*;

    /// Record a processed profile.
    pub fn profile(id: impl Into<String>, dictionary: ProfileDictionary) {
        app_state_mut().record_profile(id, dictionary);
    }

    /// Reset all accumulated state.
    pub fn reset() {
        app_state_mut().reset();
    }
}
