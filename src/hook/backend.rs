//! Registration seam between the hook manager and the operating system.
//!
//! [`HookBackend`] is the only place the manager touches when installing
//! or releasing a system-wide hook, which keeps the manager itself free of
//! FFI and testable on any platform. The real backend is
//! `platform::windows::WindowsHookBackend`; [`MockHookBackend`] ships in
//! the library so integration tests (and downstream crates) can drive the
//! manager by injecting events.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::events::{KeyEvent, PointerEvent};
use crate::hook::HookError;

/// The two interception points the core installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Keyboard,
    Pointer,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Keyboard => write!(f, "keyboard"),
            HookKind::Pointer => write!(f, "pointer"),
        }
    }
}

/// Receiver for decoded hook traffic.
///
/// Implementations must be cheap and non-blocking: the real backend calls
/// these methods on the OS dispatch path, which enforces a tight timeout
/// and may silently disable a hook that stalls it.
pub trait InputSink: Send + Sync {
    fn key_event(&self, event: KeyEvent);
    fn pointer_event(&self, event: PointerEvent);
}

/// Owned reference to one installed interception point.
///
/// A raw value of zero means "not installed". Handles are created by
/// [`HookBackend::install`] and cleared by [`HookBackend::uninstall`];
/// uninstall-then-reinstall always produces a fresh handle, never reuses
/// one in place.
#[derive(Debug)]
pub struct HookHandle {
    kind: HookKind,
    raw: isize,
}

impl HookHandle {
    pub fn new(kind: HookKind, raw: isize) -> Self {
        Self { kind, raw }
    }

    pub fn kind(&self) -> HookKind {
        self.kind
    }

    pub fn raw(&self) -> isize {
        self.raw
    }

    pub fn is_installed(&self) -> bool {
        self.raw != 0
    }

    /// Clear the handle, returning the previous raw value. Uninstalling a
    /// cleared handle is a no-op, which is what makes uninstall idempotent.
    pub fn take_raw(&mut self) -> isize {
        std::mem::take(&mut self.raw)
    }
}

/// OS registration surface used by the hook manager.
pub trait HookBackend: Send + Sync {
    /// Register a system-wide hook of `kind`, delivering decoded events to
    /// `sink`. The backend owns the `Arc` for the entire installed
    /// lifetime; that ownership is what keeps the sink alive while the OS
    /// may still invoke it.
    ///
    /// Only one hook per kind may be live per process;
    /// [`HookError::AlreadyRegistered`] reports a conflict.
    fn install(&self, kind: HookKind, sink: Arc<dyn InputSink>) -> Result<HookHandle, HookError>;

    /// Release a hook. Idempotent: a cleared handle is a no-op. The sink
    /// reference is dropped only after the OS acknowledges deregistration.
    fn uninstall(&self, handle: &mut HookHandle);

    /// Current pointer position in screen coordinates. Queried at
    /// activation time, never derived from an event payload.
    fn pointer_position(&self) -> Result<(i32, i32), HookError>;
}

// === Mock backend ===

#[derive(Default)]
struct MockSlots {
    keyboard: Option<Arc<dyn InputSink>>,
    pointer: Option<Arc<dyn InputSink>>,
}

/// In-memory [`HookBackend`] for tests.
///
/// Events are injected with [`send_key`](MockHookBackend::send_key) and
/// [`send_pointer`](MockHookBackend::send_pointer); registration failures
/// and pointer-query failures can be forced per call site to exercise the
/// manager's rollback and drop paths.
pub struct MockHookBackend {
    slots: Mutex<MockSlots>,
    keyboard_installs: AtomicUsize,
    pointer_installs: AtomicUsize,
    fail_keyboard: AtomicBool,
    fail_pointer: AtomicBool,
    fail_position: AtomicBool,
    position: Mutex<(i32, i32)>,
    next_raw: AtomicIsize,
}

impl MockHookBackend {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(MockSlots::default()),
            keyboard_installs: AtomicUsize::new(0),
            pointer_installs: AtomicUsize::new(0),
            fail_keyboard: AtomicBool::new(false),
            fail_pointer: AtomicBool::new(false),
            fail_position: AtomicBool::new(false),
            position: Mutex::new((0, 0)),
            next_raw: AtomicIsize::new(1),
        }
    }

    /// Make future keyboard-hook registrations fail.
    pub fn set_keyboard_failure(&self, fail: bool) {
        self.fail_keyboard.store(fail, Ordering::SeqCst);
    }

    /// Make future pointer-hook registrations fail.
    pub fn set_pointer_failure(&self, fail: bool) {
        self.fail_pointer.store(fail, Ordering::SeqCst);
    }

    /// Make future pointer-position queries fail.
    pub fn set_position_failure(&self, fail: bool) {
        self.fail_position.store(fail, Ordering::SeqCst);
    }

    /// Set the position future queries report.
    pub fn set_position(&self, x: i32, y: i32) {
        *self.lock_position() = (x, y);
    }

    /// Number of successful registrations of `kind` so far.
    pub fn installs(&self, kind: HookKind) -> usize {
        match kind {
            HookKind::Keyboard => self.keyboard_installs.load(Ordering::SeqCst),
            HookKind::Pointer => self.pointer_installs.load(Ordering::SeqCst),
        }
    }

    /// Whether a hook of `kind` is currently registered.
    pub fn is_registered(&self, kind: HookKind) -> bool {
        let slots = self.lock_slots();
        match kind {
            HookKind::Keyboard => slots.keyboard.is_some(),
            HookKind::Pointer => slots.pointer.is_some(),
        }
    }

    /// Inject one keyboard event, as the OS would.
    pub fn send_key(&self, event: KeyEvent) {
        let sink = self.lock_slots().keyboard.clone();
        if let Some(sink) = sink {
            sink.key_event(event);
        }
    }

    /// Inject one pointer event, as the OS would.
    pub fn send_pointer(&self, event: PointerEvent) {
        let sink = self.lock_slots().pointer.clone();
        if let Some(sink) = sink {
            sink.pointer_event(event);
        }
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, MockSlots> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_position(&self) -> std::sync::MutexGuard<'_, (i32, i32)> {
        match self.position.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for MockHookBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HookBackend for MockHookBackend {
    fn install(&self, kind: HookKind, sink: Arc<dyn InputSink>) -> Result<HookHandle, HookError> {
        let should_fail = match kind {
            HookKind::Keyboard => self.fail_keyboard.load(Ordering::SeqCst),
            HookKind::Pointer => self.fail_pointer.load(Ordering::SeqCst),
        };
        if should_fail {
            return Err(HookError::Registration {
                kind,
                reason: "forced failure".to_string(),
            });
        }

        let mut slots = self.lock_slots();
        let slot = match kind {
            HookKind::Keyboard => &mut slots.keyboard,
            HookKind::Pointer => &mut slots.pointer,
        };
        if slot.is_some() {
            return Err(HookError::AlreadyRegistered(kind));
        }
        *slot = Some(sink);

        match kind {
            HookKind::Keyboard => self.keyboard_installs.fetch_add(1, Ordering::SeqCst),
            HookKind::Pointer => self.pointer_installs.fetch_add(1, Ordering::SeqCst),
        };

        let raw = self.next_raw.fetch_add(1, Ordering::SeqCst);
        Ok(HookHandle::new(kind, raw))
    }

    fn uninstall(&self, handle: &mut HookHandle) {
        if handle.take_raw() == 0 {
            return;
        }
        let mut slots = self.lock_slots();
        match handle.kind() {
            HookKind::Keyboard => slots.keyboard = None,
            HookKind::Pointer => slots.pointer = None,
        }
    }

    fn pointer_position(&self) -> Result<(i32, i32), HookError> {
        if self.fail_position.load(Ordering::SeqCst) {
            return Err(HookError::PointerQuery("forced failure".to_string()));
        }
        Ok(*self.lock_position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSink(AtomicUsize, AtomicUsize);

    impl InputSink for CountingSink {
        fn key_event(&self, _event: KeyEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn pointer_event(&self, _event: PointerEvent) {
            self.1.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_sink() -> Arc<CountingSink> {
        Arc::new(CountingSink(AtomicUsize::new(0), AtomicUsize::new(0)))
    }

    #[test]
    fn handle_take_raw_clears_it() {
        let mut handle = HookHandle::new(HookKind::Keyboard, 7);
        assert!(handle.is_installed());
        assert_eq!(handle.take_raw(), 7);
        assert!(!handle.is_installed());
        assert_eq!(handle.take_raw(), 0);
    }

    #[test]
    fn double_install_of_same_kind_is_rejected() {
        let backend = MockHookBackend::new();
        let sink = counting_sink();
        let _keyboard = backend
            .install(HookKind::Keyboard, sink.clone())
            .expect("first install");
        let err = backend.install(HookKind::Keyboard, sink).unwrap_err();
        assert!(matches!(err, HookError::AlreadyRegistered(HookKind::Keyboard)));
    }

    #[test]
    fn uninstall_frees_the_slot() {
        let backend = MockHookBackend::new();
        let sink = counting_sink();
        let mut handle = backend
            .install(HookKind::Pointer, sink.clone())
            .expect("install");
        backend.uninstall(&mut handle);
        assert!(!backend.is_registered(HookKind::Pointer));
        // Fresh registration now succeeds and yields a new handle value.
        let second = backend.install(HookKind::Pointer, sink).expect("reinstall");
        assert_ne!(second.raw(), 0);
    }

    #[test]
    fn events_reach_the_registered_sink() {
        let backend = MockHookBackend::new();
        let sink = counting_sink();
        let _keyboard = backend
            .install(HookKind::Keyboard, sink.clone())
            .expect("install");

        backend.send_key(KeyEvent::press(0x11));
        backend.send_key(KeyEvent::release(0x11));
        assert_eq!(sink.0.load(Ordering::SeqCst), 2);

        // No pointer hook registered: pointer events go nowhere.
        backend.send_pointer(PointerEvent::press(crate::events::MouseButton::Right));
        assert_eq!(sink.1.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn forced_position_failure_is_reported() {
        let backend = MockHookBackend::new();
        backend.set_position(12, 34);
        assert_eq!(backend.pointer_position().unwrap(), (12, 34));

        backend.set_position_failure(true);
        assert!(matches!(
            backend.pointer_position(),
            Err(HookError::PointerQuery(_))
        ));
    }
}
