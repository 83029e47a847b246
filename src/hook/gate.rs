//! Activation gate: pointer events plus chord state decide whether the
//! launcher fires.

use crate::events::{InputAction, MouseButton, PointerEvent};

/// Decides whether a pointer-button event qualifies as an activation.
///
/// Only a press of the trigger button while the chord modifier is held
/// qualifies. Releases, other buttons, and presses without the modifier
/// all pass through untouched; the hook never consumes events.
pub struct ActivationGate {
    trigger: MouseButton,
}

impl ActivationGate {
    pub fn new(trigger: MouseButton) -> Self {
        Self { trigger }
    }

    /// The button this gate fires on.
    pub fn trigger(&self) -> MouseButton {
        self.trigger
    }

    /// Returns true when `event` should fire an activation given the
    /// current chord state.
    pub fn should_activate(&self, event: &PointerEvent, chord_pressed: bool) -> bool {
        chord_pressed && event.button == self.trigger && event.action == InputAction::Press
    }
}

impl Default for ActivationGate {
    fn default() -> Self {
        Self::new(MouseButton::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_trigger_press_with_chord_held() {
        let gate = ActivationGate::default();
        assert!(gate.should_activate(&PointerEvent::press(MouseButton::Right), true));
    }

    #[test]
    fn never_fires_without_chord() {
        let gate = ActivationGate::default();
        assert!(!gate.should_activate(&PointerEvent::press(MouseButton::Right), false));
    }

    #[test]
    fn ignores_other_buttons() {
        let gate = ActivationGate::default();
        assert!(!gate.should_activate(&PointerEvent::press(MouseButton::Left), true));
        assert!(!gate.should_activate(&PointerEvent::press(MouseButton::Middle), true));
    }

    #[test]
    fn ignores_releases() {
        let gate = ActivationGate::default();
        assert!(!gate.should_activate(&PointerEvent::release(MouseButton::Right), true));
    }

    #[test]
    fn trigger_button_is_configurable() {
        let gate = ActivationGate::new(MouseButton::Middle);
        assert_eq!(gate.trigger(), MouseButton::Middle);
        assert!(gate.should_activate(&PointerEvent::press(MouseButton::Middle), true));
        assert!(!gate.should_activate(&PointerEvent::press(MouseButton::Right), true));
    }
}
