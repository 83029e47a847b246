//! Action execution: environment expansion, process launch, quick notes.
//!
//! These helpers run on the application's own execution context, never on
//! the hook dispatch path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;
use tracing::info;

use super::actions::LaunchSpec;
use super::constants::NOTE_FILE_PREFIX;

/// Expand `%VAR%` references against the process environment.
///
/// Unknown variables are left untouched, percent signs and all, matching
/// how the shell treats them. There is no escape syntax.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                // `env::var` rejects empty names and names containing '='
                // or NUL; treat those as literals rather than references.
                let value = if name.is_empty() || name.contains('=') || name.contains('\0') {
                    None
                } else {
                    std::env::var(name).ok()
                };
                match value {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push('%');
                        result.push_str(name);
                        result.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unpaired percent: keep the remainder verbatim.
                result.push('%');
                result.push_str(after);
                return result;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Start the program described by `spec`, detached from this process.
pub fn launch(spec: &LaunchSpec) -> io::Result<()> {
    let command = expand_env_vars(&spec.command);
    let args: Vec<String> = spec.args.iter().map(|a| expand_env_vars(a)).collect();

    info!(id = %spec.id, command = %command, "launching action");
    Command::new(command).args(args).spawn()?;
    Ok(())
}

/// Create a timestamped note file in `notes_dir` and return its path.
///
/// The directory is created if needed. Opening the file in an editor is
/// the caller's concern.
pub fn create_note(notes_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(notes_dir)?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = notes_dir.join(format!("{NOTE_FILE_PREFIX}{stamp}.txt"));
    let header = format!("Corolla note - {}\n\n", Local::now().format("%Y-%m-%d %H:%M:%S"));
    fs::write(&path, header)?;

    info!(path = %path.display(), "created note");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_replaces_known_variable() {
        std::env::set_var("COROLLA_TEST_EXPAND", "value");
        assert_eq!(expand_env_vars("pre %COROLLA_TEST_EXPAND% post"), "pre value post");
    }

    #[test]
    fn expand_keeps_unknown_variable_verbatim() {
        assert_eq!(expand_env_vars("%COROLLA_TEST_MISSING%"), "%COROLLA_TEST_MISSING%");
    }

    #[test]
    fn expand_keeps_unpaired_percent() {
        assert_eq!(expand_env_vars("100% done"), "100% done");
    }

    #[test]
    fn expand_handles_multiple_references() {
        std::env::set_var("COROLLA_TEST_A", "a");
        std::env::set_var("COROLLA_TEST_B", "b");
        assert_eq!(expand_env_vars("%COROLLA_TEST_A%/%COROLLA_TEST_B%"), "a/b");
    }

    #[test]
    fn expand_leaves_plain_text_alone() {
        assert_eq!(expand_env_vars("no references here"), "no references here");
    }

    #[test]
    fn create_note_writes_timestamped_file() {
        let dir = std::env::temp_dir().join("corolla-note-test");
        let _ = fs::remove_dir_all(&dir);

        let path = create_note(&dir).expect("note created");
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(NOTE_FILE_PREFIX));
        assert!(name.ends_with(".txt"));

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Corolla note - "));

        let _ = fs::remove_dir_all(&dir);
    }
}
