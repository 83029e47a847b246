//! Modifier-key state machine.
//!
//! Fed exclusively by the keyboard hook's callback stream; read by the
//! pointer path and by tests. Performs no I/O and cannot fail.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::events::{InputAction, KeyEvent};

/// Virtual-key code for the generic Ctrl key (`VK_CONTROL`).
pub const VK_CONTROL: u32 = 0x11;
/// Virtual-key code for the left Ctrl key (`VK_LCONTROL`).
pub const VK_LCONTROL: u32 = 0xA2;
/// Virtual-key code for the right Ctrl key (`VK_RCONTROL`).
pub const VK_RCONTROL: u32 = 0xA3;

/// Returns true for every virtual-key code treated as the chord modifier.
///
/// Left, right and generic Ctrl are equivalent: low-level keyboard hooks
/// report the sided codes, while other sources report the generic one.
pub fn is_modifier_vk(vk_code: u32) -> bool {
    matches!(vk_code, VK_CONTROL | VK_LCONTROL | VK_RCONTROL)
}

/// Tracks whether the chord modifier is currently held.
///
/// The state is one boolean: "is any recognized Ctrl variant down". If both
/// sided keys are held and released in either order, the first release
/// clears the state; there is deliberately no per-key tracking.
///
/// Writes come from the keyboard hook on the OS dispatch path while reads
/// come from the pointer path, so the flag is atomic.
pub struct ChordDetector {
    pressed: AtomicBool,
}

impl ChordDetector {
    pub fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
        }
    }

    /// Observe one keyboard event. Non-modifier keys leave the state
    /// untouched.
    pub fn observe(&self, event: &KeyEvent) {
        if !is_modifier_vk(event.vk_code) {
            return;
        }
        match event.action {
            InputAction::Press => self.pressed.store(true, Ordering::SeqCst),
            InputAction::Release => self.pressed.store(false, Ordering::SeqCst),
        }
    }

    /// Current chord state.
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::SeqCst)
    }

    /// Force the state back to released. Called on every hook install so a
    /// modifier held across an uninstall/reinstall cannot leave a stale
    /// `Pressed` behind.
    pub fn reset(&self) {
        self.pressed.store(false, Ordering::SeqCst);
    }
}

impl Default for ChordDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_released() {
        let detector = ChordDetector::new();
        assert!(!detector.is_pressed());
    }

    #[test]
    fn press_and_release_round_trip() {
        let detector = ChordDetector::new();
        detector.observe(&KeyEvent::press(VK_CONTROL));
        assert!(detector.is_pressed());
        detector.observe(&KeyEvent::release(VK_CONTROL));
        assert!(!detector.is_pressed());
    }

    #[test]
    fn left_variant_alone_presses() {
        let detector = ChordDetector::new();
        detector.observe(&KeyEvent::press(VK_LCONTROL));
        assert!(detector.is_pressed());
    }

    #[test]
    fn sided_variants_are_equivalent() {
        let detector = ChordDetector::new();
        detector.observe(&KeyEvent::press(VK_RCONTROL));
        assert!(detector.is_pressed());
        // Releasing a different variant still clears the single boolean.
        detector.observe(&KeyEvent::release(VK_LCONTROL));
        assert!(!detector.is_pressed());
    }

    #[test]
    fn other_keys_are_ignored() {
        let detector = ChordDetector::new();
        detector.observe(&KeyEvent::press(0x41)); // 'A'
        assert!(!detector.is_pressed());

        detector.observe(&KeyEvent::press(VK_CONTROL));
        detector.observe(&KeyEvent::release(0x41));
        assert!(detector.is_pressed());
    }

    #[test]
    fn repeated_presses_stay_pressed() {
        // Holding a key autorepeats WM_KEYDOWN; the state must stay stable.
        let detector = ChordDetector::new();
        detector.observe(&KeyEvent::press(VK_CONTROL));
        detector.observe(&KeyEvent::press(VK_CONTROL));
        detector.observe(&KeyEvent::press(VK_CONTROL));
        assert!(detector.is_pressed());
    }

    #[test]
    fn reset_clears_pressed_state() {
        let detector = ChordDetector::new();
        detector.observe(&KeyEvent::press(VK_CONTROL));
        detector.reset();
        assert!(!detector.is_pressed());
    }
}
