//! Shared value types: transforms and colors.
//!
//! # Invariants
//! - Types here are plain values with no identity or lifecycle.

mod color;
mod types;

pub use color::{Color, ColorParseError};
pub use types::Transform;
