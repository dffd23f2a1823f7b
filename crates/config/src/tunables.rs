use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use hamlet_common::Color;
use serde::{Deserialize, Serialize};

/// Root configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub version: String,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub graphics: GraphicsConfig,
    pub scene: SceneConfig,
    pub ground: GroundConfig,
    /// Houses in interaction order; the position in this list is the house index.
    pub houses: Vec<HousePlacement>,
    pub house: HouseGeometry,
    pub trees: Vec<TreePlacement>,
    pub tree: TreeGeometry,
    pub animation: AnimationConfig,
    pub keys: KeyBindings,
    pub fps: FpsConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: "2.0.0".into(),
            player: PlayerConfig::default(),
            camera: CameraConfig::default(),
            graphics: GraphicsConfig::default(),
            scene: SceneConfig::default(),
            ground: GroundConfig::default(),
            houses: vec![
                HousePlacement::new(-10.0, -10.0, 0xff6b6b, "Red House"),
                HousePlacement::new(10.0, -10.0, 0x4ecdc4, "Blue House"),
                HousePlacement::new(-10.0, -25.0, 0xffe66d, "Yellow House"),
            ],
            house: HouseGeometry::default(),
            trees: [
                (15.0, 5.0),
                (-15.0, 5.0),
                (20.0, -5.0),
                (-20.0, -5.0),
                (15.0, -20.0),
                (-15.0, -30.0),
                (-5.0, 10.0),
                (8.0, 15.0),
            ]
            .into_iter()
            .map(|(x, z)| TreePlacement {
                position: Vec2::new(x, z),
            })
            .collect(),
            tree: TreeGeometry::default(),
            animation: AnimationConfig::default(),
            keys: KeyBindings::default(),
            fps: FpsConfig::default(),
        }
    }
}

impl GameConfig {
    /// Half the ground edge length; the playable area is centred on the origin.
    pub fn half_ground(&self) -> f32 {
        self.ground.size / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Distance per tick while walking.
    pub walk_speed: f32,
    /// Distance per tick while running.
    pub run_speed: f32,
    /// Radians per pixel of pointer motion at the neutral slider value.
    pub mouse_sensitivity: f32,
    /// Eye height above the ground.
    pub height: f32,
    pub collision_radius: f32,
    pub interaction_distance: f32,
    /// Spawn point on the ground plane (x, z).
    pub spawn: Vec2,
    /// Keeps the player this far inside the ground edge.
    pub boundary_margin: f32,
    /// Per-tick velocity decay factor.
    pub friction: f32,
    /// Slider value at which the sensitivity scale is 1.0.
    pub sensitivity_baseline: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 0.1,
            run_speed: 0.2,
            mouse_sensitivity: 0.002,
            height: 1.6,
            collision_radius: 0.5,
            interaction_distance: 6.0,
            spawn: Vec2::new(0.0, 5.0),
            boundary_margin: 1.0,
            friction: 0.8,
            sensitivity_baseline: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Pitch limit in radians, applied symmetrically.
    pub max_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            max_pitch: FRAC_PI_2,
        }
    }
}

/// Graphics quality tier selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [QualityTier::Low, QualityTier::Medium, QualityTier::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityPreset {
    pub shadow_map_size: u32,
    pub max_lights: u32,
    pub fog_density: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    pub shadow_map_size: u32,
    pub antialiasing: bool,
    pub low: QualityPreset,
    pub medium: QualityPreset,
    pub high: QualityPreset,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            shadow_map_size: 2048,
            antialiasing: true,
            low: QualityPreset {
                shadow_map_size: 1024,
                max_lights: 2,
                fog_density: 0.002,
            },
            medium: QualityPreset {
                shadow_map_size: 2048,
                max_lights: 4,
                fog_density: 0.001,
            },
            high: QualityPreset {
                shadow_map_size: 4096,
                max_lights: 6,
                fog_density: 0.0005,
            },
        }
    }
}

impl GraphicsConfig {
    pub fn preset(&self, tier: QualityTier) -> QualityPreset {
        match tier {
            QualityTier::Low => self.low,
            QualityTier::Medium => self.medium,
            QualityTier::High => self.high,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub background_color: Color,
    pub fog_color: Color,
    pub fog_near: f32,
    pub fog_far: f32,
    pub ambient_light_intensity: f32,
    pub sun_light_intensity: f32,
    pub sun_position: glam::Vec3,
    pub porch_light_color: Color,
    pub porch_light_intensity: f32,
    pub porch_light_range: f32,
    pub grass_patches: u32,
    pub grass_color: Color,
    /// Seed for the grass scatter; the same seed always yields the same layout.
    pub grass_seed: u64,
    pub road_lines: u32,
    pub road_line_color: Color,
    pub sky_radius: f32,
    pub sky_color: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background_color: Color::from_hex(0x87ceeb),
            fog_color: Color::from_hex(0x87ceeb),
            fog_near: 0.0,
            fog_far: 750.0,
            ambient_light_intensity: 0.6,
            sun_light_intensity: 0.8,
            sun_position: glam::Vec3::new(50.0, 50.0, 50.0),
            porch_light_color: Color::from_hex(0xffaa00),
            porch_light_intensity: 0.5,
            porch_light_range: 10.0,
            grass_patches: 50,
            grass_color: Color::from_hex(0x2d8a1f),
            grass_seed: 42,
            road_lines: 10,
            road_line_color: Color::from_hex(0xffff00),
            sky_radius: 500.0,
            sky_color: Color::from_hex(0x87ceeb),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Edge length of the square ground plane.
    pub size: f32,
    pub color: Color,
    pub road_width: f32,
    pub road_color: Color,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            color: Color::from_hex(0x3a9d23),
            road_width: 5.0,
            road_color: Color::from_hex(0x555555),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousePlacement {
    /// Ground-plane position (x, z).
    pub position: Vec2,
    pub color: Color,
    pub name: String,
}

impl HousePlacement {
    pub fn new(x: f32, z: f32, color: u32, name: &str) -> Self {
        Self {
            position: Vec2::new(x, z),
            color: Color::from_hex(color),
            name: name.into(),
        }
    }
}

/// Box dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size3 {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Size3 {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn to_vec3(self) -> glam::Vec3 {
        glam::Vec3::new(self.width, self.height, self.depth)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseGeometry {
    pub body: Size3,
    pub roof_radius: f32,
    pub roof_height: f32,
    pub door: Size3,
    pub window: Size3,
    pub door_color: Color,
    pub window_color: Color,
    pub window_glow: Color,
    pub chimney: Size3,
    pub chimney_color: Color,
}

impl Default for HouseGeometry {
    fn default() -> Self {
        Self {
            body: Size3::new(4.0, 3.0, 4.0),
            roof_radius: 3.0,
            roof_height: 2.0,
            door: Size3::new(0.8, 1.5, 0.1),
            window: Size3::new(0.6, 0.6, 0.1),
            door_color: Color::from_hex(0x654321),
            window_color: Color::from_hex(0xadd8e6),
            window_glow: Color::from_hex(0xffffaa),
            chimney: Size3::new(0.4, 1.5, 0.4),
            chimney_color: Color::from_hex(0x8b4513),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreePlacement {
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeGeometry {
    pub trunk_radius_top: f32,
    pub trunk_radius_bottom: f32,
    pub trunk_height: f32,
    pub trunk_color: Color,
    pub leaves_radius: f32,
    pub leaves_color: Color,
}

impl Default for TreeGeometry {
    fn default() -> Self {
        Self {
            trunk_radius_top: 0.2,
            trunk_radius_bottom: 0.3,
            trunk_height: 2.0,
            trunk_color: Color::from_hex(0x8b4513),
            leaves_radius: 1.5,
            leaves_color: Color::from_hex(0x228b22),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Door swing when fully open, in radians. The open target is its negation.
    pub door_rotation: f32,
    /// Fraction of the remaining angle covered per tick.
    pub door_speed: f32,
    /// Below this angular gap the door snaps to its target.
    pub door_epsilon: f32,
    pub notification_duration_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            door_rotation: PI / 2.0,
            door_speed: 0.05,
            door_epsilon: 0.01,
            notification_duration_ms: 2000,
        }
    }
}

/// Physical key identifiers (winit `KeyCode` names) per logical action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub run: String,
    pub interact: String,
    pub pause: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "KeyW".into(),
            backward: "KeyS".into(),
            left: "KeyA".into(),
            right: "KeyD".into(),
            run: "ShiftLeft".into(),
            interact: "KeyE".into(),
            pause: "Escape".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsConfig {
    /// Sampling window for the FPS readout.
    pub update_interval_ms: u64,
}

impl Default for FpsConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_houses() {
        let config = GameConfig::default();
        let positions: Vec<Vec2> = config.houses.iter().map(|h| h.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec2::new(-10.0, -10.0),
                Vec2::new(10.0, -10.0),
                Vec2::new(-10.0, -25.0)
            ]
        );
        assert_eq!(config.houses[0].name, "Red House");
    }

    #[test]
    fn quality_presets_scale_up() {
        let g = GraphicsConfig::default();
        let low = g.preset(QualityTier::Low);
        let high = g.preset(QualityTier::High);
        assert!(low.shadow_map_size < high.shadow_map_size);
        assert!(low.max_lights < high.max_lights);
        assert!(low.fog_density > high.fog_density);
        assert_eq!(g.preset(QualityTier::Medium).max_lights, 4);
    }

    #[test]
    fn half_ground_matches_size() {
        assert_eq!(GameConfig::default().half_ground(), 50.0);
    }

    #[test]
    fn default_bindings_cover_seven_actions() {
        let k = KeyBindings::default();
        let all = [
            &k.forward,
            &k.backward,
            &k.left,
            &k.right,
            &k.run,
            &k.interact,
            &k.pause,
        ];
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn quality_tier_serializes_lowercase() {
        let json = serde_json::to_string(&QualityTier::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
