//! Application settings loaded from a TOML file.
//!
//! Lives at `<config_dir>/stickmap/settings.toml`; a missing file yields
//! defaults. Paths in the file may be absolute, `~`-prefixed, or relative to
//! the settings file itself.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::adaptor::DEFAULT_NO_BIND_TEXT;
use crate::error::{Result, StickmapError};

/// Name of the database file holding device template associations.
const TEMPLATE_DB_FILE: &str = "templates.db";

/// User-tunable application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Label shown for buttons without an assigned description.
    pub no_bind_text: String,
    /// Directory exported diagrams are written to; defaults to `./diagrams`.
    pub export_dir: PathBuf,
    /// Override for the template store database path.
    pub template_db: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            no_bind_text: DEFAULT_NO_BIND_TEXT.to_string(),
            export_dir: PathBuf::from("diagrams"),
            template_db: None,
        }
    }
}

impl Settings {
    /// Load settings from the default location, falling back to defaults when
    /// the file does not exist.
    pub fn load() -> Result<Self> {
        let path = settings_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            trace!(path = %path.display(), "No settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load settings from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&contents)
            .map_err(|e| StickmapError::SettingsParse(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Path of the template store database, honoring the settings override.
    ///
    /// A relative or `~`-prefixed override is resolved against the config
    /// directory.
    pub fn template_db_path(&self) -> Result<PathBuf> {
        match &self.template_db {
            Some(path) => resolve_path(path, &config_dir()?),
            None => Ok(config_dir()?.join(TEMPLATE_DB_FILE)),
        }
    }
}

/// The stickmap configuration directory.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("stickmap"))
        .ok_or_else(|| {
            StickmapError::SettingsInvalid("Could not determine config directory".to_string())
        })
}

/// Default settings file location.
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Resolve a path from a settings file.
///
/// Resolution rules:
/// 1. Absolute paths: used as-is
/// 2. Paths starting with `~`: expanded to home directory
/// 3. Relative paths: resolved relative to `base_dir`
pub fn resolve_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() { home } else { home.join(rest) };
        debug!(original = %path.display(), resolved = %resolved.display(), "Expanded home path");
        return Ok(resolved);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    Ok(base_dir.join(path))
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        StickmapError::SettingsInvalid("Could not determine home directory".to_string())
    })
}
