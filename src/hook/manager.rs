//! Hook lifecycle and activation delivery.
//!
//! [`HookManager`] owns both interception points (keyboard and pointer),
//! the chord state they feed, and the subscriber list that learns about
//! activations. All state is instance-owned: independent managers can
//! coexist (against independent backends) and tear down cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::events::{ActivationDispatcher, ActivationEvent, KeyEvent, MouseButton, PointerEvent};
use crate::hook::backend::{HookBackend, HookHandle, HookKind, InputSink};
use crate::hook::chord::ChordDetector;
use crate::hook::gate::ActivationGate;

/// Shared state reachable from the hook callbacks.
///
/// The backend holds this behind `Arc<dyn InputSink>` while hooks are
/// installed, so an in-flight callback keeps it alive even if the manager
/// is concurrently uninstalling.
struct HookSink {
    chord: ChordDetector,
    gate: ActivationGate,
    dispatcher: ActivationDispatcher,
    backend: Arc<dyn HookBackend>,
}

impl InputSink for HookSink {
    fn key_event(&self, event: KeyEvent) {
        self.chord.observe(&event);
    }

    fn pointer_event(&self, event: PointerEvent) {
        if !self.gate.should_activate(&event, self.chord.is_pressed()) {
            return;
        }
        // The pointer position is a live query, separate from the event
        // payload. If it fails, this activation is dropped; never raised
        // half-formed, never escalated across the callback boundary.
        match self.backend.pointer_position() {
            Ok((x, y)) => {
                debug!(x, y, "chord activation");
                self.dispatcher.notify(ActivationEvent { x, y });
            }
            Err(err) => warn!(error = %err, "dropping activation: pointer position unavailable"),
        }
    }
}

#[derive(Default)]
struct InstalledHooks {
    keyboard: Option<HookHandle>,
    pointer: Option<HookHandle>,
}

impl InstalledHooks {
    fn both_installed(&self) -> bool {
        self.keyboard.is_some() && self.pointer.is_some()
    }
}

/// Composes the keyboard and pointer hooks into one activation source.
///
/// `install` / `uninstall` are idempotent and may be called from any
/// thread; they serialize on an internal mutex so the manager never
/// reports installed while only one of the two hooks is live.
pub struct HookManager {
    backend: Arc<dyn HookBackend>,
    sink: Arc<HookSink>,
    hooks: Mutex<InstalledHooks>,
    installed: AtomicBool,
}

impl HookManager {
    /// Create a manager over the given backend. Nothing is registered
    /// until [`install`](Self::install) is called.
    pub fn new(backend: Arc<dyn HookBackend>) -> Self {
        let sink = Arc::new(HookSink {
            chord: ChordDetector::new(),
            gate: ActivationGate::new(MouseButton::Right),
            dispatcher: ActivationDispatcher::new(),
            backend: Arc::clone(&backend),
        });
        Self {
            backend,
            sink,
            hooks: Mutex::new(InstalledHooks::default()),
            installed: AtomicBool::new(false),
        }
    }

    /// Create a manager over the real Windows backend.
    #[cfg(target_os = "windows")]
    pub fn system() -> Self {
        Self::new(Arc::new(crate::platform::windows::WindowsHookBackend::new()))
    }

    /// Register a subscriber for activation events.
    ///
    /// Subscribers run on the hook dispatch path: keep them quick and hand
    /// anything slow off to your own execution context (the application
    /// posts a window message and returns).
    pub fn on_activated<F>(&self, subscriber: F)
    where
        F: Fn(ActivationEvent) + Send + Sync + 'static,
    {
        self.sink.dispatcher.subscribe(subscriber);
    }

    /// Install both hooks. Returns true when both are live.
    ///
    /// Idempotent: an already-installed manager returns true without
    /// re-registering. On partial failure the hook that did register is
    /// rolled back so no system-wide interception point leaks.
    pub fn install(&self) -> bool {
        let mut hooks = self.lock_hooks();
        if hooks.both_installed() {
            return true;
        }

        // A modifier held across reinstall must not leave a stale Pressed.
        self.sink.chord.reset();

        let sink: Arc<dyn InputSink> = self.sink.clone();
        let keyboard = match self.backend.install(HookKind::Keyboard, sink.clone()) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(error = %err, "hook installation failed");
                return false;
            }
        };

        match self.backend.install(HookKind::Pointer, sink) {
            Ok(pointer) => {
                hooks.keyboard = Some(keyboard);
                hooks.pointer = Some(pointer);
                self.installed.store(true, Ordering::SeqCst);
                info!("global hooks installed");
                true
            }
            Err(err) => {
                warn!(error = %err, "hook installation failed, rolling back keyboard hook");
                let mut keyboard = keyboard;
                self.backend.uninstall(&mut keyboard);
                false
            }
        }
    }

    /// Release both hooks. Idempotent and always safe, even if `install`
    /// was never called or failed.
    pub fn uninstall(&self) {
        let mut hooks = self.lock_hooks();
        self.installed.store(false, Ordering::SeqCst);

        if let Some(mut handle) = hooks.keyboard.take() {
            self.backend.uninstall(&mut handle);
        }
        if let Some(mut handle) = hooks.pointer.take() {
            self.backend.uninstall(&mut handle);
        }
    }

    /// True while both hooks are live.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Does the current process hold elevated privileges?
    ///
    /// Stateless, queried on demand; a failing probe reads as "not
    /// elevated". Used to pick the diagnostic message when installation
    /// fails, nothing else.
    pub fn is_elevated() -> bool {
        #[cfg(target_os = "windows")]
        {
            crate::platform::windows::elevation::is_process_elevated()
        }
        #[cfg(not(target_os = "windows"))]
        {
            false
        }
    }

    fn lock_hooks(&self) -> MutexGuard<'_, InstalledHooks> {
        match self.hooks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for HookManager {
    fn drop(&mut self) {
        self.uninstall();
    }
}
