use serde::{Deserialize, Serialize};

/// Logical state of one house door.
///
/// Two states only: closed (target 0) and open (target `-open_angle`). The
/// visible angle lags behind and is eased separately by [`ease_toward`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DoorState {
    is_open: bool,
    target_angle: f32,
}

impl DoorState {
    pub const CLOSED: DoorState = DoorState {
        is_open: false,
        target_angle: 0.0,
    };

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Rotation about the hinge the door is easing toward, in radians.
    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }

    /// Flip the door and retarget. Returns the new open flag.
    pub fn toggle(&mut self, open_angle: f32) -> bool {
        self.is_open = !self.is_open;
        self.target_angle = if self.is_open { -open_angle } else { 0.0 };
        self.is_open
    }

    pub fn reset(&mut self) {
        *self = Self::CLOSED;
    }
}

/// One easing step of `live` toward `target`.
///
/// Covers `ease` of the remaining gap, or snaps onto the target once the gap
/// is within `epsilon`. With `0 < ease <= 1` it never overshoots.
pub fn ease_toward(live: f32, target: f32, ease: f32, epsilon: f32) -> f32 {
    let gap = target - live;
    if gap.abs() <= epsilon {
        target
    } else {
        live + gap * ease
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn starts_closed() {
        let door = DoorState::default();
        assert_eq!(door, DoorState::CLOSED);
        assert!(!door.is_open());
        assert_eq!(door.target_angle(), 0.0);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut door = DoorState::CLOSED;
        assert!(door.toggle(FRAC_PI_2));
        assert_eq!(door.target_angle(), -FRAC_PI_2);
        assert!(!door.toggle(FRAC_PI_2));
        assert_eq!(door, DoorState::CLOSED);
    }

    #[test]
    fn reset_closes() {
        let mut door = DoorState::CLOSED;
        door.toggle(1.0);
        door.reset();
        assert_eq!(door, DoorState::CLOSED);
    }

    #[test]
    fn easing_is_monotonic_and_settles() {
        let target = -FRAC_PI_2;
        let mut live = 0.0_f32;
        let mut ticks = 0;
        while live != target {
            let next = ease_toward(live, target, 0.05, 0.01);
            assert!(next <= live, "moved away from target");
            assert!(next >= target, "overshot target");
            live = next;
            ticks += 1;
            assert!(ticks < 1000, "did not settle");
        }
        assert_eq!(live, target);
    }

    #[test]
    fn easing_retargets_mid_swing() {
        let mut live = 0.0_f32;
        for _ in 0..10 {
            live = ease_toward(live, -FRAC_PI_2, 0.05, 0.01);
        }
        let mid = live;
        live = ease_toward(live, 0.0, 0.05, 0.01);
        assert!(live > mid);
    }

    #[test]
    fn within_epsilon_snaps() {
        assert_eq!(ease_toward(0.995, 1.0, 0.05, 0.01), 1.0);
        assert_eq!(ease_toward(1.0, 1.0, 0.05, 0.01), 1.0);
    }
}
