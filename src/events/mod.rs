//! Input and activation events.
//!
//! This module holds the decoded event types the hook core trades in and
//! the fan-out dispatcher that delivers activations to subscribers. It is
//! pure Rust with no FFI dependencies, making it fully testable.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐      ┌──────────────┐
//! │ keyboard hook│      │ pointer hook │
//! └──────┬───────┘      └──────┬───────┘
//!        │ KeyEvent            │ PointerEvent
//!        ▼                     ▼
//! ┌─────────────────────────────────────┐
//! │          hook::HookManager          │
//! │   (chord detector + activation gate)│
//! └─────────────────┬───────────────────┘
//!                   │ ActivationEvent
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │        ActivationDispatcher         │
//! │   (subscribers, failures isolated)  │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`types`]: decoded event definitions
//! - [`dispatcher`]: `ActivationDispatcher` subscriber fan-out

pub mod dispatcher;
pub mod types;

// Re-export main types for convenient access
pub use dispatcher::ActivationDispatcher;
pub use types::{ActivationEvent, InputAction, KeyEvent, MouseButton, PointerEvent};
