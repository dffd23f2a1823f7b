use serde::{Deserialize, Serialize};

/// Toast severity, used by the presentation layer for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Info,
}

/// A transient message for the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    /// Report of a door toggle on the named house.
    pub fn door(house: &str, open: bool) -> Self {
        if open {
            Self::new(format!("{house} door opened!"), Severity::Success)
        } else {
            Self::new(format!("{house} door closed!"), Severity::Warning)
        }
    }
}

/// Record of a state change made by a session.
///
/// The log is append-only until drained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started,
    /// A door was toggled; `open` is the new logical state.
    DoorToggled { house: usize, open: bool },
    Paused,
    Resumed,
    Restarted,
    Stopped,
}
