//! Input: physical keys and pointer motion mapped to logical actions.
//!
//! # Invariants
//! - Event handlers only set flags or accumulate deltas; the game consumes a
//!   whole `InputFrame` synchronously at the start of each tick.
//! - Pointer motion is honored only while the pointer is captured. Motion
//!   received without capture is dropped, never buffered.

pub mod action;
pub mod state;

pub use action::{Action, ActionMap};
pub use state::{InputFrame, InputState, MovementIntent};

pub fn crate_info() -> &'static str {
    "hamlet-input v2.0.0"
}
