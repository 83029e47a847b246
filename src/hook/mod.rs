//! Global input-hook core.
//!
//! This is the heart of the application: system-wide keyboard and pointer
//! hooks feed a chord state machine (hold Ctrl + right click) which raises
//! activation events at the pointer position.
//!
//! The OS-facing registration lives behind the [`HookBackend`] trait; the
//! real implementation is `platform::windows::WindowsHookBackend`, and
//! [`MockHookBackend`] drives the same manager in tests without touching
//! the OS.
//!
//! # Module Structure
//!
//! - [`chord`]: modifier-key state machine fed by the keyboard hook
//! - [`gate`]: decides whether a pointer event fires an activation
//! - [`backend`]: registration seam, hook handles, mock backend
//! - [`manager`]: composition, lifecycle, activation delivery

pub mod backend;
pub mod chord;
pub mod gate;
pub mod manager;

pub use backend::{HookBackend, HookHandle, HookKind, InputSink, MockHookBackend};
pub use chord::ChordDetector;
pub use gate::ActivationGate;
pub use manager::HookManager;

use thiserror::Error;

/// Failures the hook core can report.
///
/// None of these are fatal: registration failures degrade to "no global
/// activation", and a pointer-query failure drops a single activation.
#[derive(Debug, Error)]
pub enum HookError {
    /// The OS refused or failed to register a hook of this kind.
    #[error("failed to register the {kind} hook: {reason}")]
    Registration { kind: HookKind, reason: String },

    /// A hook of this kind is already registered in this process.
    #[error("a {0} hook is already registered in this process")]
    AlreadyRegistered(HookKind),

    /// The pointer position could not be queried at activation time.
    #[error("pointer position query failed: {0}")]
    PointerQuery(String),
}
