//! System tray (notification area) icon for Windows.
//!
//! Provides a tray icon with context menu and balloon notifications.
//! This is the fallback activation path when the global hooks could not
//! be installed.

use std::cell::RefCell;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_INFO, NIF_MESSAGE, NIF_TIP, NIIF_INFO, NIIF_WARNING,
    NIM_ADD, NIM_DELETE, NIM_MODIFY, NOTIFYICONDATAW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, LoadImageW, SetForegroundWindow,
    TrackPopupMenu, HMENU, IMAGE_ICON, LR_DEFAULTSIZE, LR_SHARED, MF_GRAYED, MF_SEPARATOR,
    MF_STRING, TPM_BOTTOMALIGN, TPM_LEFTALIGN, TPM_RIGHTBUTTON, WM_USER,
};

// Custom message for tray icon events
pub const WM_TRAYICON: u32 = WM_USER + 1;

// Menu item IDs
pub const MENU_OPEN: u32 = 1001;
pub const MENU_STATUS: u32 = 1002;
pub const MENU_HELP: u32 = 1003;
pub const MENU_QUIT: u32 = 1004;

// Tray icon ID
const TRAY_ICON_ID: u32 = 1;

thread_local! {
    static TRAY_HWND: RefCell<Option<HWND>> = const { RefCell::new(None) };
    static TRAY_MENU: RefCell<Option<HMENU>> = const { RefCell::new(None) };
}

/// Copy a string into one of the fixed-size wide buffers of
/// `NOTIFYICONDATAW`, leaving room for the terminator.
fn copy_wide(dst: &mut [u16], text: &str) {
    let wide: Vec<u16> = text.encode_utf16().collect();
    for (i, &c) in wide.iter().enumerate().take(dst.len() - 1) {
        dst[i] = c;
    }
}

/// Install the system tray icon with context menu.
pub fn install_tray_icon(hwnd: HWND) {
    unsafe {
        TRAY_HWND.with(|h| *h.borrow_mut() = Some(hwnd));

        // Load the custom icon from resources (resource ID 1); fall back
        // to the stock application icon when it is absent.
        let hinstance = GetModuleHandleW(None).unwrap_or_default();
        let icon = LoadImageW(
            Some(hinstance.into()),
            windows::core::PCWSTR(1 as *const u16), // Resource ID 1
            IMAGE_ICON,
            16, // Small icon for tray
            16,
            LR_DEFAULTSIZE | LR_SHARED,
        );
        let hicon = match icon {
            Ok(handle) => windows::Win32::UI::WindowsAndMessaging::HICON(handle.0),
            Err(_) => windows::Win32::UI::WindowsAndMessaging::HICON::default(),
        };

        // Create the notification icon
        let mut nid = NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: hwnd,
            uID: TRAY_ICON_ID,
            uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP,
            uCallbackMessage: WM_TRAYICON,
            hIcon: hicon,
            ..Default::default()
        };
        copy_wide(&mut nid.szTip, "Corolla - Ctrl + right-click");

        let _ = Shell_NotifyIconW(NIM_ADD, &nid);

        // Create context menu
        let menu = CreatePopupMenu().unwrap_or_default();
        let _ = AppendMenuW(menu, MF_STRING, MENU_OPEN as usize, w!("Open menu here"));
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
        let _ = AppendMenuW(
            menu,
            MF_STRING | MF_GRAYED,
            MENU_STATUS as usize,
            w!("Status: active"),
        );
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
        let _ = AppendMenuW(menu, MF_STRING, MENU_HELP as usize, w!("Help"));
        let _ = AppendMenuW(menu, MF_STRING, MENU_QUIT as usize, w!("Quit"));

        TRAY_MENU.with(|m| *m.borrow_mut() = Some(menu));
    }
}

/// Remove the tray icon.
pub fn remove_tray_icon() {
    TRAY_HWND.with(|h| {
        if let Some(hwnd) = *h.borrow() {
            unsafe {
                let nid = NOTIFYICONDATAW {
                    cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                    hWnd: hwnd,
                    uID: TRAY_ICON_ID,
                    ..Default::default()
                };
                let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
            }
        }
    });

    TRAY_MENU.with(|m| {
        if let Some(menu) = m.borrow_mut().take() {
            unsafe {
                let _ = DestroyMenu(menu);
            }
        }
    });
}

/// Show the tray context menu at the cursor position.
pub fn show_tray_menu(hwnd: HWND) {
    TRAY_MENU.with(|m| {
        if let Some(menu) = *m.borrow() {
            unsafe {
                let mut pt = POINT::default();
                let _ = GetCursorPos(&mut pt);

                // Required for menu to close when clicking outside
                let _ = SetForegroundWindow(hwnd);

                let _ = TrackPopupMenu(
                    menu,
                    TPM_BOTTOMALIGN | TPM_LEFTALIGN | TPM_RIGHTBUTTON,
                    pt.x,
                    pt.y,
                    None, // nReserved - must be None/0
                    hwnd,
                    None,
                );
            }
        }
    });
}

/// Update tray tooltip to reflect whether global activation works.
pub fn update_tray_tooltip(hooks_active: bool) {
    TRAY_HWND.with(|h| {
        if let Some(hwnd) = *h.borrow() {
            unsafe {
                let mut nid = NOTIFYICONDATAW {
                    cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                    hWnd: hwnd,
                    uID: TRAY_ICON_ID,
                    uFlags: NIF_TIP,
                    ..Default::default()
                };

                let tip = if hooks_active {
                    "Corolla - Ctrl + right-click"
                } else {
                    "Corolla - tray menu only"
                };
                copy_wide(&mut nid.szTip, tip);

                let _ = Shell_NotifyIconW(NIM_MODIFY, &nid);
            }
        }
    });
}

/// Show a balloon notification from the tray icon.
pub fn show_balloon(title: &str, text: &str, warning: bool) {
    TRAY_HWND.with(|h| {
        if let Some(hwnd) = *h.borrow() {
            unsafe {
                let mut nid = NOTIFYICONDATAW {
                    cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                    hWnd: hwnd,
                    uID: TRAY_ICON_ID,
                    uFlags: NIF_INFO,
                    dwInfoFlags: if warning { NIIF_WARNING } else { NIIF_INFO },
                    ..Default::default()
                };
                copy_wide(&mut nid.szInfoTitle, title);
                copy_wide(&mut nid.szInfo, text);

                let _ = Shell_NotifyIconW(NIM_MODIFY, &nid);
            }
        }
    });
}
