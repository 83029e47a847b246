//! Event types flowing through the hook core.
//!
//! These are decoded, platform-neutral views of the raw hook traffic.
//! The Windows backend translates `KBDLLHOOKSTRUCT` contents and mouse
//! messages into these types before they reach any application logic, so
//! everything downstream of the trampolines stays free of FFI.

/// Press or release edge of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Press,
    Release,
}

/// One keyboard event as observed by the keyboard hook.
///
/// `vk_code` is the Windows virtual-key code, kept as a raw `u32` so the
/// chord logic compiles and tests on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub vk_code: u32,
    pub action: InputAction,
}

impl KeyEvent {
    pub fn press(vk_code: u32) -> Self {
        Self {
            vk_code,
            action: InputAction::Press,
        }
    }

    pub fn release(vk_code: u32) -> Self {
        Self {
            vk_code,
            action: InputAction::Release,
        }
    }
}

/// Pointer buttons the pointer hook can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// One pointer-button event as observed by the pointer hook.
///
/// Carries no coordinates: the activation path queries the live pointer
/// position instead of trusting the event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: MouseButton,
    pub action: InputAction,
}

impl PointerEvent {
    pub fn press(button: MouseButton) -> Self {
        Self {
            button,
            action: InputAction::Press,
        }
    }

    pub fn release(button: MouseButton) -> Self {
        Self {
            button,
            action: InputAction::Release,
        }
    }
}

/// Screen coordinates of the pointer at the moment a chord fired.
///
/// Constructed fresh per trigger and handed to every subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationEvent {
    pub x: i32,
    pub y: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_constructors_set_action() {
        assert_eq!(KeyEvent::press(0x11).action, InputAction::Press);
        assert_eq!(KeyEvent::release(0x11).action, InputAction::Release);
    }

    #[test]
    fn pointer_event_constructors_set_action() {
        assert_eq!(
            PointerEvent::press(MouseButton::Right).action,
            InputAction::Press
        );
        assert_eq!(
            PointerEvent::release(MouseButton::Left).action,
            InputAction::Release
        );
    }

    #[test]
    fn activation_event_is_a_plain_value() {
        let event = ActivationEvent { x: 400, y: 300 };
        let copy = event;
        assert_eq!(event, copy);
    }
}
