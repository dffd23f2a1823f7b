use glam::Vec2;

use crate::action::{Action, ActionMap};

/// The five movement intent flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub running: bool,
}

impl MovementIntent {
    fn set(&mut self, action: Action, down: bool) {
        match action {
            Action::MoveForward => self.forward = down,
            Action::MoveBackward => self.backward = down,
            Action::StrafeLeft => self.left = down,
            Action::StrafeRight => self.right = down,
            Action::Run => self.running = down,
            Action::Interact | Action::Pause => {}
        }
    }
}

/// Everything the game needs from input for one tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputFrame {
    pub movement: MovementIntent,
    /// Pointer motion accumulated while captured, in pixels.
    pub look_delta: Vec2,
    /// Discrete actions pressed since the previous frame, in press order.
    pub actions: Vec<Action>,
}

/// Input accumulated between ticks.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    movement: MovementIntent,
    look_delta: Vec2,
    pointer_captured: bool,
    pending: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. Returns the action the key is bound to, if any.
    ///
    /// Auto-repeat presses of discrete actions are ignored.
    pub fn key(&mut self, map: &ActionMap, key: &str, pressed: bool, repeat: bool) -> Option<Action> {
        let action = map.resolve(key)?;
        if action.is_held() {
            self.movement.set(action, pressed);
        } else if pressed && !repeat {
            self.pending.push(action);
        }
        Some(action)
    }

    /// Record relative pointer motion. Dropped unless the pointer is captured.
    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        if !self.pointer_captured {
            return;
        }
        if !dx.is_finite() || !dy.is_finite() {
            tracing::trace!(dx, dy, "dropping non-finite pointer delta");
            return;
        }
        self.look_delta += Vec2::new(dx, dy);
    }

    pub fn set_pointer_captured(&mut self, captured: bool) {
        if !captured {
            self.look_delta = Vec2::ZERO;
        }
        self.pointer_captured = captured;
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    pub fn movement(&self) -> MovementIntent {
        self.movement
    }

    /// Release every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.movement = MovementIntent::default();
    }

    /// Take this tick's input. Held flags persist; deltas and presses reset.
    pub fn take_frame(&mut self) -> InputFrame {
        InputFrame {
            movement: self.movement,
            look_delta: std::mem::take(&mut self.look_delta),
            actions: std::mem::take(&mut self.pending),
        }
    }
}
