//! Corolla: chord-activated quick launcher for Windows.
//!
//! Hold Ctrl and right-click anywhere to open a launch menu at the
//! pointer. The library half is platform-neutral so the hook core, chord
//! logic, and model all test as normal integration tests; the Win32 glue
//! lives under [`platform`] and in the binary.

pub mod events;
pub mod hook;
pub mod model;
pub mod platform;

// Re-export the core entry points for convenience
pub use events::{ActivationDispatcher, ActivationEvent};
pub use hook::{HookError, HookManager, MockHookBackend};
pub use model::Settings;
