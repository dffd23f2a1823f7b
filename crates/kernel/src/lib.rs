//! Kernel: the walking simulation behind every frontend.
//!
//! # Invariants
//! - Exactly one `DoorState` per house, keyed by the house's configuration index.
//! - Pitch stays within the configured limit; position stays inside the
//!   ground bounds at eye height.
//! - All mutations flow through `GameSession` operations; frontends read
//!   snapshots and drain notifications.

pub mod door;
pub mod environment;
pub mod error;
pub mod events;
pub mod fps;
pub mod layout;
pub mod player;
pub mod proximity;
pub mod session;

pub use door::DoorState;
pub use environment::{Environment, House};
pub use error::KernelError;
pub use events::{Notification, SessionEvent, Severity};
pub use fps::FpsCounter;
pub use player::{CameraPose, Player, intent_vector};
pub use proximity::{LinearScan, ProximityIndex};
pub use session::{GameSession, GameSettings, HudSnapshot, SENSITIVITY_RANGE};

pub fn crate_info() -> &'static str {
    "hamlet-kernel v2.0.0"
}
