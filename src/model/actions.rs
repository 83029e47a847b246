//! Quick-launch action list.
//!
//! User actions come from an `actions.json` file next to the executable;
//! a small built-in set (note taking, help) is appended after them. Menu
//! dispatch is a closed enum; entries are matched, never looked up by
//! name.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One user-defined launcher entry from `actions.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchSpec {
    pub id: String,
    pub label: String,
    /// Program or document to start. `%VAR%` references are expanded at
    /// launch time.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// One entry of the activation menu.
///
/// User entries wrap their [`LaunchSpec`]; the built-in entries carry no
/// payload and are dispatched by variant.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Launch(LaunchSpec),
    Note,
    Help,
}

impl MenuEntry {
    /// Label shown in the menu.
    pub fn label(&self) -> &str {
        match self {
            MenuEntry::Launch(spec) => &spec.label,
            MenuEntry::Note => "Note",
            MenuEntry::Help => "Help",
        }
    }

    /// True for the entries that ship with the application.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, MenuEntry::Launch(_))
    }
}

/// Build the menu: user entries first, built-ins appended.
pub fn menu_entries(actions: &[LaunchSpec]) -> Vec<MenuEntry> {
    let mut entries: Vec<MenuEntry> = actions.iter().cloned().map(MenuEntry::Launch).collect();
    entries.push(MenuEntry::Note);
    entries.push(MenuEntry::Help);
    entries
}

/// Load the action list from `path`.
///
/// A missing file simply means "no user actions"; a malformed file is
/// logged and also yields an empty list so startup continues.
pub fn load_actions(path: &Path) -> Vec<LaunchSpec> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str::<Vec<LaunchSpec>>(&contents) {
        Ok(actions) => {
            info!(path = %path.display(), count = actions.len(), "loaded action list");
            actions
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "invalid action list, ignoring it");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "id": "editor", "label": "Editor", "command": "%WINDIR%\\notepad.exe" },
        { "id": "files", "label": "Files", "command": "explorer.exe", "args": ["%USERPROFILE%"] }
    ]"#;

    #[test]
    fn parses_sample_actions() {
        let actions: Vec<LaunchSpec> = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].id, "editor");
        assert!(actions[0].args.is_empty());
        assert_eq!(actions[1].args, vec!["%USERPROFILE%".to_string()]);
    }

    #[test]
    fn builtins_follow_user_entries() {
        let actions: Vec<LaunchSpec> = serde_json::from_str(SAMPLE).unwrap();
        let entries = menu_entries(&actions);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].label(), "Editor");
        assert_eq!(entries[2], MenuEntry::Note);
        assert_eq!(entries[3], MenuEntry::Help);
    }

    #[test]
    fn builtin_flag_matches_variant() {
        let entries = menu_entries(&[]);
        assert!(entries.iter().all(MenuEntry::is_builtin));

        let actions: Vec<LaunchSpec> = serde_json::from_str(SAMPLE).unwrap();
        assert!(!menu_entries(&actions)[0].is_builtin());
    }

    #[test]
    fn missing_file_yields_empty_list() {
        assert!(load_actions(Path::new("no/such/actions.json")).is_empty());
    }

    #[test]
    fn malformed_file_yields_empty_list() {
        let dir = std::env::temp_dir().join("corolla-actions-test");
        let path = dir.join("actions.json");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "{ not json ]").unwrap();

        assert!(load_actions(&path).is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
