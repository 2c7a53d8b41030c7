// ============================================================================
// motion.rs — KeyIntent
// Planar movement driven by held intents, polled once per frame.
// ============================================================================

use crate::binding::{
    MOVE_BACKWARD, MOVE_FORWARD, MOVE_LEFT, MOVE_RIGHT, SPRINT, TURN_LEFT, TURN_RIGHT,
};
use crate::intent::IntentState;

pub const WALK_SPEED: f32 = 5.0;
pub const SPRINT_SPEED: f32 = 9.0;
/// Radians per second while a turn intent is held.
pub const TURN_RATE: f32 = 1.8;

/// Position on the ground plane plus the facing used for forward motion.
/// Heading 0 faces +y; positive x is to the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionState {
    pub position: [f32; 2],
    pub heading: f32,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            heading: 0.0,
        }
    }
}

impl MotionState {
    /// Advance by `dt` seconds. Turning is applied before translation.
    /// Opposing intents cancel and diagonals are normalized so they are no
    /// faster than a straight line.
    pub fn apply_intents(&mut self, intents: &IntentState, dt: f32) {
        let axis = |pos: &str, neg: &str| {
            (intents.is_active(pos) as i8 - intents.is_active(neg) as i8) as f32
        };

        let turn = axis(TURN_RIGHT, TURN_LEFT);
        if turn != 0.0 {
            self.heading = wrap_angle(self.heading + turn * TURN_RATE * dt);
        }

        let forward = axis(MOVE_FORWARD, MOVE_BACKWARD);
        let strafe = axis(MOVE_RIGHT, MOVE_LEFT);

        let len = (forward * forward + strafe * strafe).sqrt();
        if len == 0.0 {
            return;
        }

        let step = Self::speed_for(intents) * dt / len;
        let (sin, cos) = self.heading.sin_cos();

        // Forward is (sin, cos); right is (cos, -sin).
        self.position[0] += (forward * sin + strafe * cos) * step;
        self.position[1] += (forward * cos - strafe * sin) * step;
    }

    pub fn speed_for(intents: &IntentState) -> f32 {
        if intents.is_active(SPRINT) {
            SPRINT_SPEED
        } else {
            WALK_SPEED
        }
    }
}

fn wrap_angle(a: f32) -> f32 {
    let mut x = a;
    while x > std::f32::consts::PI {
        x -= std::f32::consts::TAU;
    }
    while x < -std::f32::consts::PI {
        x += std::f32::consts::TAU;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::KeyBinding;
    use crate::surface::KeyboardSurface;
    use crate::tracker::InputIntentTracker;

    fn held(keys: &[&str]) -> IntentState {
        let surface = KeyboardSurface::new();
        let mut tracker = InputIntentTracker::new(surface.clone());
        let _handle = tracker.start(&KeyBinding::movement_with_turning()).unwrap();
        for key in keys {
            surface.key_down(key);
        }
        tracker.current_state()
    }

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn idle_does_not_move() {
        let mut motion = MotionState::default();
        motion.apply_intents(&held(&[]), 1.0);
        assert_eq!(motion, MotionState::default());
    }

    #[test]
    fn forward_walks_and_sprint_runs() {
        let mut motion = MotionState::default();
        motion.apply_intents(&held(&["KeyW"]), 1.0);
        assert!(close(motion.position, [0.0, WALK_SPEED]));

        let mut motion = MotionState::default();
        motion.apply_intents(&held(&["KeyW", "ShiftLeft"]), 0.5);
        assert!(close(motion.position, [0.0, SPRINT_SPEED * 0.5]));
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut motion = MotionState::default();
        motion.apply_intents(&held(&["KeyA", "KeyD", "KeyW", "KeyS"]), 1.0);
        assert_eq!(motion.position, [0.0, 0.0]);
    }

    #[test]
    fn diagonal_is_normalized() {
        let mut motion = MotionState::default();
        motion.apply_intents(&held(&["KeyW", "KeyD"]), 1.0);
        let [x, y] = motion.position;
        assert!(((x * x + y * y).sqrt() - WALK_SPEED).abs() < 1e-4);
        assert!(x > 0.0 && y > 0.0);
    }

    #[test]
    fn strafe_follows_heading() {
        let mut motion = MotionState {
            heading: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        motion.apply_intents(&held(&["KeyD"]), 1.0);
        assert!(close(motion.position, [0.0, -WALK_SPEED]));
    }

    #[test]
    fn stopped_tracker_snapshot_is_idle() {
        let mut motion = MotionState::default();
        motion.apply_intents(&IntentState::empty(), 1.0);
        assert_eq!(motion.position, [0.0, 0.0]);
        assert_eq!(MotionState::speed_for(&IntentState::empty()), WALK_SPEED);
    }

    #[test]
    fn turn_intents_rotate_heading_in_place() {
        let mut motion = MotionState::default();
        motion.apply_intents(&held(&["KeyE"]), 0.5);
        assert!((motion.heading - TURN_RATE * 0.5).abs() < 1e-6);
        assert_eq!(motion.position, [0.0, 0.0]);

        motion.apply_intents(&held(&["KeyQ", "KeyE"]), 1.0);
        assert!((motion.heading - TURN_RATE * 0.5).abs() < 1e-6);
    }

    #[test]
    fn turning_left_then_forward_moves_along_negative_x() {
        let mut motion = MotionState::default();
        motion.apply_intents(&held(&["KeyQ"]), std::f32::consts::FRAC_PI_2 / TURN_RATE);
        motion.apply_intents(&held(&["KeyW"]), 1.0);
        assert!(close(motion.position, [-WALK_SPEED, 0.0]));
    }

    #[test]
    fn heading_stays_wrapped() {
        let mut motion = MotionState::default();
        motion.apply_intents(&held(&["KeyE"]), 10.0);
        assert!(motion.heading.abs() <= std::f32::consts::PI);
    }
}
