//! Application constants and default values.

// === Identity ===

/// Display name, used for the tray tooltip and notifications.
pub const APP_NAME: &str = "Corolla";

/// Directory under `%APPDATA%` holding the settings file.
pub const CONFIG_DIR_NAME: &str = "Corolla";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Action-list file name, looked up next to the executable.
pub const ACTIONS_FILE_NAME: &str = "actions.json";

// === User-facing text ===

/// One-line description of the activation chord.
pub const CHORD_SUMMARY: &str = "Hold Ctrl and right-click anywhere to open the launcher.";

// === Notes ===

/// File-name prefix for quick notes.
pub const NOTE_FILE_PREFIX: &str = "corolla-note-";
