//! Tests for the chord state machine and the activation gate as pure
//! components, driven by event sequences.

use corolla::events::{KeyEvent, MouseButton, PointerEvent};
use corolla::hook::chord::{ChordDetector, VK_CONTROL, VK_LCONTROL, VK_RCONTROL};
use corolla::hook::ActivationGate;

fn run_sequence(events: &[KeyEvent]) -> bool {
    let detector = ChordDetector::new();
    for event in events {
        detector.observe(event);
    }
    detector.is_pressed()
}

// === Detector sequences ===

#[test]
fn down_up_ends_released() {
    assert!(!run_sequence(&[
        KeyEvent::press(VK_CONTROL),
        KeyEvent::release(VK_CONTROL),
    ]));
}

#[test]
fn single_down_ends_pressed() {
    assert!(run_sequence(&[KeyEvent::press(VK_LCONTROL)]));
}

#[test]
fn generic_and_sided_codes_are_one_modifier() {
    // Pressing both variants and releasing them in the opposite order: the
    // state is a single boolean, so the first release ends the chord.
    assert!(!run_sequence(&[
        KeyEvent::press(VK_LCONTROL),
        KeyEvent::press(VK_RCONTROL),
        KeyEvent::release(VK_LCONTROL),
        KeyEvent::release(VK_RCONTROL),
    ]));
}

#[test]
fn re_press_after_release_ends_pressed() {
    assert!(run_sequence(&[
        KeyEvent::press(VK_CONTROL),
        KeyEvent::release(VK_CONTROL),
        KeyEvent::press(VK_RCONTROL),
    ]));
}

#[test]
fn unrelated_keys_never_change_state() {
    let letters = [0x41u32, 0x5A, 0x20, 0x1B]; // A, Z, Space, Esc
    let mut events = Vec::new();
    for vk in letters {
        events.push(KeyEvent::press(vk));
        events.push(KeyEvent::release(vk));
    }
    assert!(!run_sequence(&events));

    events.insert(0, KeyEvent::press(VK_CONTROL));
    assert!(run_sequence(&events));
}

// === Gate decisions ===

#[test]
fn gate_fires_only_for_pressed_trigger_with_chord() {
    let gate = ActivationGate::new(MouseButton::Right);

    assert!(gate.should_activate(&PointerEvent::press(MouseButton::Right), true));
    assert!(!gate.should_activate(&PointerEvent::press(MouseButton::Right), false));
    assert!(!gate.should_activate(&PointerEvent::release(MouseButton::Right), true));
    assert!(!gate.should_activate(&PointerEvent::press(MouseButton::Left), true));
}

#[test]
fn detector_and_gate_compose() {
    let detector = ChordDetector::new();
    let gate = ActivationGate::new(MouseButton::Right);
    let click = PointerEvent::press(MouseButton::Right);

    assert!(!gate.should_activate(&click, detector.is_pressed()));

    detector.observe(&KeyEvent::press(VK_CONTROL));
    assert!(gate.should_activate(&click, detector.is_pressed()));

    detector.observe(&KeyEvent::release(VK_CONTROL));
    assert!(!gate.should_activate(&click, detector.is_pressed()));
}
