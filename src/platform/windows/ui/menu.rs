//! Activation popup menu.
//!
//! The launcher surface itself: a native popup menu built from the action
//! list and shown at the activation coordinates. Selections come back to
//! the owning window as `WM_COMMAND` with an entry id.

use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DestroyMenu, SetForegroundWindow, TrackPopupMenu, HMENU,
    MF_SEPARATOR, MF_STRING, TPM_LEFTALIGN, TPM_RIGHTBUTTON, TPM_TOPALIGN,
};

use crate::model::MenuEntry;

/// First command id used for menu entries; entry `i` gets `BASE + i`.
const MENU_ENTRY_BASE: u32 = 2000;

/// Build the popup menu for `entries`, separating user actions from the
/// built-ins. The caller owns the returned menu and must destroy it.
pub fn build_activation_menu(entries: &[MenuEntry]) -> HMENU {
    unsafe {
        let menu = CreatePopupMenu().unwrap_or_default();

        let mut previous_builtin = false;
        for (index, entry) in entries.iter().enumerate() {
            if entry.is_builtin() && !previous_builtin && index > 0 {
                let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
            }
            previous_builtin = entry.is_builtin();

            // The wide buffer must outlive the AppendMenuW call.
            let label: Vec<u16> = entry.label().encode_utf16().chain(Some(0)).collect();
            let _ = AppendMenuW(
                menu,
                MF_STRING,
                (MENU_ENTRY_BASE + index as u32) as usize,
                PCWSTR(label.as_ptr()),
            );
        }
        menu
    }
}

/// Show `menu` at screen coordinates, owned by `hwnd`.
pub fn show_activation_menu(hwnd: HWND, menu: HMENU, x: i32, y: i32) {
    unsafe {
        // Required for menu to close when clicking outside
        let _ = SetForegroundWindow(hwnd);
        let _ = TrackPopupMenu(
            menu,
            TPM_TOPALIGN | TPM_LEFTALIGN | TPM_RIGHTBUTTON,
            x,
            y,
            None,
            hwnd,
            None,
        );
    }
}

/// Release a menu built by [`build_activation_menu`].
pub fn destroy_activation_menu(menu: HMENU) {
    unsafe {
        let _ = DestroyMenu(menu);
    }
}

/// Map a `WM_COMMAND` id back to the entry index, if it names one.
pub fn entry_index_from_command(command: u32) -> Option<usize> {
    command.checked_sub(MENU_ENTRY_BASE).map(|i| i as usize)
}
