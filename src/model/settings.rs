//! JSON settings file.
//!
//! Stores settings in `%APPDATA%/Corolla/settings.json`. Loading falls
//! back to defaults on any error; saving is best-effort and logs failures
//! instead of propagating them; a broken settings file must never keep
//! the launcher from starting.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::constants::{CONFIG_DIR_NAME, SETTINGS_FILE_NAME};

/// Persisted user settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Show tray balloon notifications (startup status, warnings).
    pub show_notifications: bool,
    /// Directory where quick notes are created.
    pub notes_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_notifications: true,
            notes_dir: default_notes_dir(),
        }
    }
}

/// Default notes directory: the user's desktop, falling back to the
/// current directory when the profile location is unknown.
fn default_notes_dir() -> PathBuf {
    match std::env::var("USERPROFILE") {
        Ok(profile) => PathBuf::from(profile).join("Desktop"),
        Err(_) => PathBuf::from("."),
    }
}

/// Get the settings file path: `%APPDATA%/Corolla/settings.json`.
pub fn settings_path() -> PathBuf {
    let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(appdata)
        .join(CONFIG_DIR_NAME)
        .join(SETTINGS_FILE_NAME)
}

impl Settings {
    /// Load settings from disk, returning defaults if missing or invalid.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Load settings from an explicit path (used by tests).
    pub fn load_from(path: &std::path::Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "invalid settings file, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk, creating the config directory if needed.
    pub fn save(&self) {
        self.save_to(&settings_path());
    }

    /// Save settings to an explicit path (used by tests).
    pub fn save_to(&self, path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %err, "could not create config directory");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(path, json) {
                    warn!(path = %path.display(), error = %err, "could not write settings");
                }
            }
            Err(err) => warn!(error = %err, "could not serialize settings"),
        }
    }
}
