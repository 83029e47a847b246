//! Windows-specific implementation using the Win32 API.
//!
//! This module contains all Windows-specific code:
//! - The real hook backend (low-level keyboard and mouse hooks)
//! - The process-elevation probe
//! - UI glue (notification-area icon, activation popup menu)

pub mod backend;
pub mod elevation;
pub mod ui;

// Re-export commonly used items
pub use backend::WindowsHookBackend;
