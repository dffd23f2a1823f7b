//! Game configuration: every tunable constant of the walking simulator.
//!
//! # Invariants
//! - Loaded once at startup, then shared read-only (`Arc<GameConfig>`).
//! - Files override any subset of fields; missing fields keep reference values.
//! - Values are not range-validated.

mod load;
mod tunables;

pub use load::{ConfigError, ConfigFormat};
pub use tunables::{
    AnimationConfig, CameraConfig, FpsConfig, GameConfig, GraphicsConfig, GroundConfig,
    HouseGeometry, HousePlacement, KeyBindings, PlayerConfig, QualityPreset, QualityTier,
    SceneConfig, Size3, TreeGeometry, TreePlacement,
};

pub fn crate_info() -> &'static str {
    "hamlet-config v2.0.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("config"));
    }
}
