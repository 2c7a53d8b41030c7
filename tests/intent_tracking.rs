use keyintent::binding::{MOVE_BACKWARD, MOVE_FORWARD, MOVE_LEFT, MOVE_RIGHT, SPRINT};
use keyintent::{ConfigurationError, InputIntentTracker, KeyBinding, KeyEvent, KeyboardSurface};

fn observing(binding: &KeyBinding) -> (KeyboardSurface, InputIntentTracker, keyintent::Handle) {
    let surface = KeyboardSurface::new();
    let mut tracker = InputIntentTracker::new(surface.clone());
    let handle = tracker.start(binding).expect("valid binding");
    (surface, tracker, handle)
}

fn tables() -> Vec<KeyBinding> {
    vec![
        KeyBinding::movement(),
        KeyBinding::new().bind("Space", "jump"),
        KeyBinding::new()
            .bind("ArrowUp", "up")
            .bind("ArrowDown", "down")
            .bind("KeyE", "interact")
            .bind("ControlLeft", "crouch"),
    ]
}

#[test]
fn fresh_observation_is_all_false() {
    for binding in tables() {
        let (_surface, tracker, _handle) = observing(&binding);
        let state = tracker.current_state();
        assert_eq!(state.len(), binding.len());
        for entry in binding.entries() {
            assert_eq!(state.get(&entry.intent), Some(false));
        }
    }
}

#[test]
fn down_sets_and_up_clears_every_bound_intent() {
    for binding in tables() {
        let (surface, tracker, _handle) = observing(&binding);
        for entry in binding.entries() {
            surface.key_down(&entry.key);
            assert!(tracker.current_state()[entry.intent.as_str()], "{} down", entry.key);
            surface.key_up(&entry.key);
            assert!(!tracker.current_state()[entry.intent.as_str()], "{} up", entry.key);
        }
    }
}

#[test]
fn unbound_keys_leave_state_untouched() {
    let (surface, tracker, _handle) = observing(&KeyBinding::movement());
    surface.key_down("KeyW");
    let before = tracker.current_state();

    surface.key_down("KeyQ");
    surface.key_up("Enter");
    surface.key_down("");

    assert_eq!(tracker.current_state(), before);
}

#[test]
fn repeated_down_does_not_toggle() {
    let (surface, tracker, _handle) = observing(&KeyBinding::movement());
    surface.key_down("KeyA");
    let once = tracker.current_state();
    surface.key_down("KeyA");
    assert_eq!(tracker.current_state(), once);
    assert!(once[MOVE_LEFT]);
}

#[test]
fn stop_twice_is_harmless() {
    let (surface, mut tracker, mut handle) = observing(&KeyBinding::movement());
    tracker.stop(&mut handle);
    tracker.stop(&mut handle);
    handle.stop();
    assert_eq!(surface.listener_count(), 0);
    assert!(!tracker.is_observing());
}

#[test]
fn walk_then_sprint_then_release_forward() {
    let (surface, tracker, _handle) = observing(&KeyBinding::movement());
    for event in [
        KeyEvent::down("KeyW"),
        KeyEvent::down("ShiftLeft"),
        KeyEvent::up("KeyW"),
    ] {
        surface.dispatch(&event);
    }

    let state = tracker.current_state();
    assert!(!state[MOVE_FORWARD]);
    assert!(!state[MOVE_BACKWARD]);
    assert!(!state[MOVE_LEFT]);
    assert!(!state[MOVE_RIGHT]);
    assert!(state[SPRINT]);
    assert_eq!(
        serde_json::to_value(&state).unwrap(),
        serde_json::json!({
            "moveForward": false,
            "moveBackward": false,
            "moveLeft": false,
            "moveRight": false,
            "sprint": true,
        })
    );
}

#[test]
fn empty_binding_is_rejected_without_listeners() {
    let surface = KeyboardSurface::new();
    let mut tracker = InputIntentTracker::new(surface.clone());
    let result = tracker.start(&KeyBinding::new());
    assert_eq!(result.err(), Some(ConfigurationError::EmptyBinding));
    assert_eq!(surface.listener_count(), 0);
}

#[test]
fn snapshots_are_independent_of_later_events() {
    let (surface, tracker, _handle) = observing(&KeyBinding::movement());
    let snapshot = tracker.current_state();
    surface.key_down("KeyD");
    assert!(!snapshot[MOVE_RIGHT]);
    assert!(tracker.current_state()[MOVE_RIGHT]);
}

#[test]
fn stopped_tracker_ignores_events_and_restart_is_zeroed() {
    let (surface, mut tracker, mut handle) = observing(&KeyBinding::movement());
    surface.key_down("KeyS");
    tracker.stop(&mut handle);

    surface.key_down("KeyW");
    assert!(tracker.current_state().is_empty());

    let _again = tracker.start(&KeyBinding::movement()).unwrap();
    let state = tracker.current_state();
    assert!(!state.any_active());
    assert_eq!(state.len(), 5);
}

#[test]
fn shared_intent_follows_last_event() {
    let binding = KeyBinding::new().bind("KeyW", "up").bind("ArrowUp", "up");
    let (surface, tracker, _handle) = observing(&binding);
    surface.key_down("KeyW");
    surface.key_down("ArrowUp");
    surface.key_up("KeyW");
    assert!(!tracker.current_state()["up"]);
}
