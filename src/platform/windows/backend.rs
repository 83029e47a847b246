//! Low-level keyboard and mouse hooks for Windows.
//!
//! Implements [`HookBackend`] over `SetWindowsHookExW` with
//! `WH_KEYBOARD_LL` / `WH_MOUSE_LL`. The trampolines registered with the
//! OS find their sink through one process-wide slot per hook kind; the
//! slot owns an `Arc` to the sink, and a trampoline clones that `Arc` out
//! of the slot before invoking it, so an in-flight callback keeps the sink
//! alive even while `uninstall` is racing on another thread.
//!
//! Hooks must be installed from a thread that pumps messages; low-level
//! hook callbacks are delivered through the installing thread's message
//! loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetCursorPos, SetWindowsHookExW, UnhookWindowsHookEx, HHOOK, KBDLLHOOKSTRUCT,
    WH_KEYBOARD_LL, WH_MOUSE_LL, WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_LBUTTONUP,
    WM_MBUTTONDOWN, WM_MBUTTONUP, WM_RBUTTONDOWN, WM_RBUTTONUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

use crate::events::{InputAction, KeyEvent, MouseButton, PointerEvent};
use crate::hook::{HookBackend, HookError, HookHandle, HookKind, InputSink};

type SinkSlot = Mutex<Option<Arc<dyn InputSink>>>;

// One slot per hook kind. The trampolines are plain function pointers with
// no user data, so this is the one piece of process-wide state the backend
// cannot avoid; everything else lives in the manager instance.
static KEYBOARD_SINK: SinkSlot = Mutex::new(None);
static POINTER_SINK: SinkSlot = Mutex::new(None);

fn slot_for(kind: HookKind) -> &'static SinkSlot {
    match kind {
        HookKind::Keyboard => &KEYBOARD_SINK,
        HookKind::Pointer => &POINTER_SINK,
    }
}

fn lock_slot(slot: &'static SinkSlot) -> MutexGuard<'static, Option<Arc<dyn InputSink>>> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Clone the sink out of its slot, then invoke `f` outside the lock.
///
/// A panic in the sink is caught and logged: unwinding across the OS
/// callback boundary would corrupt the hook chain for every other
/// listener on the system.
fn deliver<F>(slot: &'static SinkSlot, f: F)
where
    F: FnOnce(&Arc<dyn InputSink>),
{
    let sink = lock_slot(slot).clone();
    if let Some(sink) = sink {
        if catch_unwind(AssertUnwindSafe(|| f(&sink))).is_err() {
            error!("input hook handler panicked");
        }
    }
}

fn decode_key_event(wparam: WPARAM, lparam: LPARAM) -> Option<KeyEvent> {
    let action = match wparam.0 as u32 {
        WM_KEYDOWN | WM_SYSKEYDOWN => InputAction::Press,
        WM_KEYUP | WM_SYSKEYUP => InputAction::Release,
        _ => return None,
    };

    let data = lparam.0 as *const KBDLLHOOKSTRUCT;
    if data.is_null() {
        return None;
    }
    let vk_code = unsafe { (*data).vkCode };
    Some(KeyEvent { vk_code, action })
}

fn decode_pointer_event(wparam: WPARAM) -> Option<PointerEvent> {
    match wparam.0 as u32 {
        WM_LBUTTONDOWN => Some(PointerEvent::press(MouseButton::Left)),
        WM_LBUTTONUP => Some(PointerEvent::release(MouseButton::Left)),
        WM_RBUTTONDOWN => Some(PointerEvent::press(MouseButton::Right)),
        WM_RBUTTONUP => Some(PointerEvent::release(MouseButton::Right)),
        WM_MBUTTONDOWN => Some(PointerEvent::press(MouseButton::Middle)),
        WM_MBUTTONUP => Some(PointerEvent::release(MouseButton::Middle)),
        _ => None,
    }
}

/// Low-level keyboard hook procedure.
///
/// Always forwards to the next hook in the chain, whatever happens
/// internally; this hook observes, it never consumes.
unsafe extern "system" fn keyboard_hook_proc(ncode: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if ncode >= 0 {
        if let Some(event) = decode_key_event(wparam, lparam) {
            deliver(&KEYBOARD_SINK, |sink| sink.key_event(event));
        }
    }
    CallNextHookEx(None, ncode, wparam, lparam)
}

/// Low-level mouse hook procedure. Same forwarding contract as the
/// keyboard procedure.
unsafe extern "system" fn pointer_hook_proc(ncode: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if ncode >= 0 {
        if let Some(event) = decode_pointer_event(wparam) {
            deliver(&POINTER_SINK, |sink| sink.pointer_event(event));
        }
    }
    CallNextHookEx(None, ncode, wparam, lparam)
}

/// The real [`HookBackend`]: system-wide Win32 low-level hooks.
pub struct WindowsHookBackend;

impl WindowsHookBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsHookBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HookBackend for WindowsHookBackend {
    fn install(&self, kind: HookKind, sink: Arc<dyn InputSink>) -> Result<HookHandle, HookError> {
        let mut guard = lock_slot(slot_for(kind));
        if guard.is_some() {
            return Err(HookError::AlreadyRegistered(kind));
        }

        let module = unsafe { GetModuleHandleW(None) }.map_err(|err| HookError::Registration {
            kind,
            reason: err.to_string(),
        })?;

        let (id, trampoline): (_, unsafe extern "system" fn(i32, WPARAM, LPARAM) -> LRESULT) =
            match kind {
                HookKind::Keyboard => (WH_KEYBOARD_LL, keyboard_hook_proc),
                HookKind::Pointer => (WH_MOUSE_LL, pointer_hook_proc),
            };

        let hook = unsafe { SetWindowsHookExW(id, Some(trampoline), Some(module.into()), 0) }
            .map_err(|err| HookError::Registration {
                kind,
                reason: err.to_string(),
            })?;

        // Publish the sink only after the OS accepted the registration.
        *guard = Some(sink);
        Ok(HookHandle::new(kind, hook.0 as isize))
    }

    fn uninstall(&self, handle: &mut HookHandle) {
        let raw = handle.take_raw();
        if raw == 0 {
            return;
        }

        // Unhook first, then drop the sink reference: a callback that
        // raced the unhook cloned its Arc out of the slot and stays valid.
        let result = unsafe { UnhookWindowsHookEx(HHOOK(raw as *mut _)) };
        if let Err(err) = result {
            warn!(kind = %handle.kind(), error = %err, "unhook failed");
        }
        *lock_slot(slot_for(handle.kind())) = None;
    }

    fn pointer_position(&self) -> Result<(i32, i32), HookError> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }
            .map_err(|err| HookError::PointerQuery(err.to_string()))?;
        Ok((point.x, point.y))
    }
}
