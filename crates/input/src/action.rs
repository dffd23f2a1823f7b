use std::collections::HashMap;

use hamlet_config::KeyBindings;

/// A logical action produced by a bound key.
///
/// Game code consumes actions, never raw key identifiers, so rebinding keys
/// only touches configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Run,
    /// Toggle the door of the nearest house.
    Interact,
    /// Toggle the pause menu.
    Pause,
}

impl Action {
    /// Held actions drive movement flags while the key is down.
    pub fn is_held(self) -> bool {
        matches!(
            self,
            Self::MoveForward | Self::MoveBackward | Self::StrafeLeft | Self::StrafeRight | Self::Run
        )
    }
}

/// Lookup from physical key identifier to action.
#[derive(Debug, Clone, Default)]
pub struct ActionMap {
    bindings: HashMap<String, Action>,
}

impl ActionMap {
    pub fn from_bindings(keys: &KeyBindings) -> Self {
        let pairs = [
            (&keys.forward, Action::MoveForward),
            (&keys.backward, Action::MoveBackward),
            (&keys.left, Action::StrafeLeft),
            (&keys.right, Action::StrafeRight),
            (&keys.run, Action::Run),
            (&keys.interact, Action::Interact),
            (&keys.pause, Action::Pause),
        ];
        let mut bindings = HashMap::new();
        for (key, action) in pairs {
            if let Some(previous) = bindings.insert(key.clone(), action) {
                tracing::warn!(key = %key, ?previous, ?action, "key bound twice, last binding wins");
            }
        }
        Self { bindings }
    }

    pub fn resolve(&self, key: &str) -> Option<Action> {
        self.bindings.get(key).copied()
    }
}
