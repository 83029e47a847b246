//! UI components for Windows.

pub mod menu;
pub mod tray;
