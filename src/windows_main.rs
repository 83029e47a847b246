//! Windows-specific entry point and application logic.
//!
//! Owns the hidden message window, the tray icon, and the hook manager.
//! Hook activations arrive as a posted `WM_APP` message so the popup menu
//! always runs on this thread's message loop, never on the hook dispatch
//! path.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DispatchMessageW, GetCursorPos, GetMessageW, PostMessageW,
    PostQuitMessage, RegisterClassW, TranslateMessage, HMENU, MSG, WM_APP, WM_COMMAND, WM_DESTROY,
    WNDCLASSW, WS_EX_TOOLWINDOW, WS_POPUP,
};

use corolla::hook::HookManager;
use corolla::model::{
    launcher, load_actions, menu_entries, MenuEntry, Settings, ACTIONS_FILE_NAME, APP_NAME,
    CHORD_SUMMARY,
};
use corolla::platform::windows::ui::menu::{
    build_activation_menu, destroy_activation_menu, entry_index_from_command,
    show_activation_menu,
};
use corolla::platform::windows::ui::tray::{
    self, MENU_HELP, MENU_OPEN, MENU_QUIT, WM_TRAYICON,
};

/// Posted by the hook subscriber; wparam/lparam carry the coordinates.
const WM_APP_ACTIVATION: u32 = WM_APP + 1;

/// Per-process application context read by the window procedure.
struct AppContext {
    entries: Vec<MenuEntry>,
    settings: Settings,
    menu: HMENU,
}

thread_local! {
    static APP: RefCell<Option<AppContext>> = const { RefCell::new(None) };
}

/// Main entry point for Windows.
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run_app() {
        eprintln!("Corolla error: {}", e);
        std::process::exit(1);
    }
}

fn actions_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ACTIONS_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(ACTIONS_FILE_NAME))
}

fn run_app() -> windows::core::Result<()> {
    let settings = Settings::load();
    let entries = menu_entries(&load_actions(&actions_path()));
    info!(entries = entries.len(), "starting {}", APP_NAME);

    unsafe {
        let instance = GetModuleHandleW(None)?;
        let class_name = w!("CorollaMain");

        let wc = WNDCLASSW {
            lpfnWndProc: Some(wndproc),
            hInstance: instance.into(),
            lpszClassName: class_name,
            ..Default::default()
        };
        RegisterClassW(&wc);

        // Hidden window: no UI of its own, just a wndproc target for the
        // tray icon, the posted activations, and menu commands. It must be
        // a real (not message-only) window so it can take foreground while
        // a popup menu is open.
        let hwnd = CreateWindowExW(
            WS_EX_TOOLWINDOW,
            class_name,
            w!("Corolla"),
            WS_POPUP,
            0,
            0,
            0,
            0,
            None,
            None,
            Some(instance.into()),
            None,
        )?;

        let menu = build_activation_menu(&entries);
        APP.with(|app| {
            *app.borrow_mut() = Some(AppContext {
                entries,
                settings: settings.clone(),
                menu,
            });
        });

        tray::install_tray_icon(hwnd);

        // Hook manager: activations hop onto this thread via PostMessageW.
        // The closure runs on the hook dispatch path, so it does nothing
        // but post and return.
        let manager = Arc::new(HookManager::system());
        let raw_hwnd = hwnd.0 as isize;
        manager.on_activated(move |event| {
            let hwnd = HWND(raw_hwnd as *mut _);
            let _ = PostMessageW(
                Some(hwnd),
                WM_APP_ACTIVATION,
                WPARAM(event.x as isize as usize),
                LPARAM(event.y as isize),
            );
        });

        if manager.install() {
            if settings.show_notifications {
                tray::show_balloon(
                    &format!("{} started", APP_NAME),
                    CHORD_SUMMARY,
                    false,
                );
            }
        } else {
            let mut message =
                "Could not install global hooks. The launcher stays available from the tray icon."
                    .to_string();
            if !HookManager::is_elevated() {
                message.push_str(" Running as administrator may help.");
            }
            warn!("{}", message);
            tray::update_tray_tooltip(false);
            if settings.show_notifications {
                tray::show_balloon(&format!("{} warning", APP_NAME), &message, true);
            }
        }

        // Message loop
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        // Cleanup
        manager.uninstall();
        tray::remove_tray_icon();
        APP.with(|app| {
            if let Some(context) = app.borrow_mut().take() {
                destroy_activation_menu(context.menu);
            }
        });

        Ok(())
    }
}

/// Show the activation menu at the given screen coordinates.
fn open_menu_at(hwnd: HWND, x: i32, y: i32) {
    // Copy the handle out before showing: TrackPopupMenu spins a modal
    // message loop that can re-enter the window procedure.
    let menu = APP.with(|app| app.borrow().as_ref().map(|context| context.menu));
    if let Some(menu) = menu {
        show_activation_menu(hwnd, menu, x, y);
    }
}

/// Show the activation menu at the current pointer position (tray path).
fn open_menu_at_cursor(hwnd: HWND) {
    let mut pt = POINT::default();
    unsafe {
        let _ = GetCursorPos(&mut pt);
    }
    open_menu_at(hwnd, pt.x, pt.y);
}

/// Execute one menu entry on the application thread.
fn execute_entry(index: usize) {
    let picked = APP.with(|app| {
        app.borrow().as_ref().and_then(|context| {
            context
                .entries
                .get(index)
                .cloned()
                .map(|entry| (entry, context.settings.notes_dir.clone()))
        })
    });
    let Some((entry, notes_dir)) = picked else {
        return;
    };

    match entry {
        MenuEntry::Launch(spec) => {
            if let Err(err) = launcher::launch(&spec) {
                warn!(id = %spec.id, error = %err, "could not launch action");
                tray::show_balloon(
                    &format!("{} error", APP_NAME),
                    &format!("Could not launch '{}': {}", spec.label, err),
                    true,
                );
            }
        }
        MenuEntry::Note => match launcher::create_note(&notes_dir) {
            Ok(path) => {
                if let Err(err) = Command::new("notepad.exe").arg(&path).spawn() {
                    warn!(error = %err, "note created but editor did not start");
                }
            }
            Err(err) => {
                warn!(error = %err, "could not create note");
                tray::show_balloon(
                    &format!("{} error", APP_NAME),
                    &format!("Could not create note: {}", err),
                    true,
                );
            }
        },
        MenuEntry::Help => {
            tray::show_balloon(APP_NAME, CHORD_SUMMARY, false);
        }
    }
}

extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe {
        match msg {
            WM_APP_ACTIVATION => {
                let x = wparam.0 as isize as i32;
                let y = lparam.0 as i32;
                open_menu_at(hwnd, x, y);
                LRESULT(0)
            }

            WM_COMMAND => {
                let cmd = (wparam.0 & 0xFFFF) as u32;
                match cmd {
                    MENU_OPEN => open_menu_at_cursor(hwnd),
                    MENU_HELP => tray::show_balloon(APP_NAME, CHORD_SUMMARY, false),
                    MENU_QUIT => PostQuitMessage(0),
                    other => {
                        if let Some(index) = entry_index_from_command(other) {
                            execute_entry(index);
                        }
                    }
                }
                LRESULT(0)
            }

            // System tray icon messages
            msg if msg == WM_TRAYICON => {
                let event = lparam.0 as u32;
                if event == 0x0205 {
                    // Right-click: show context menu
                    tray::show_tray_menu(hwnd);
                } else if event == 0x0203 {
                    // Double-click: open the launcher at the cursor
                    open_menu_at_cursor(hwnd);
                }
                LRESULT(0)
            }

            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}
