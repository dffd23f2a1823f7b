//! Static scene construction from configuration.
//!
//! Everything here runs once per environment. The only handles kept afterwards
//! are the per-house door pivots returned by [`build_scene`].

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::Vec3;
use hamlet_common::{Color, Transform};
use hamlet_config::{GameConfig, HousePlacement, TreePlacement};
use hamlet_scene::{Fog, Light, Material, NodeId, Primitive, Renderable, SceneSink, Side};

const GRASS_HEIGHT: f32 = 0.01;
const ROAD_HEIGHT: f32 = 0.01;
const ROAD_LINE_HEIGHT: f32 = 0.02;
const ROAD_LINE_SIZE: (f32, f32) = (0.2, 2.0);
const GRASS_OPACITY: f32 = 0.3;
const GRASS_SEGMENTS: u32 = 6;
const PORCH_LIGHT_HEIGHT: f32 = 2.0;
const PORCH_LIGHT_OFFSET: f32 = 3.0;
const WINDOW_GLOW_INTENSITY: f32 = 0.2;
const LEAF_LAYERS: u32 = 3;
const SKY_SEGMENTS: u32 = 32;
const LEAF_SEGMENTS: u32 = 8;
const TRUNK_SEGMENTS: u32 = 8;

/// Scene handles of one house.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseNodes {
    pub root: NodeId,
    /// Hinge group on the front-left edge; rotating it about Y swings the door.
    pub door_pivot: NodeId,
}

/// Fog as configured, for the fog-on setting.
pub fn scene_fog(config: &GameConfig) -> Fog {
    Fog {
        color: config.scene.fog_color,
        near: config.scene.fog_near,
        far: config.scene.fog_far,
    }
}

/// Populate `sink` with the whole village. Returns one entry per configured
/// house, in configuration order.
pub fn build_scene(config: &GameConfig, sink: &mut dyn SceneSink) -> Vec<HouseNodes> {
    sink.set_background(config.scene.background_color);
    sink.set_fog(Some(scene_fog(config)));
    add_lights(config, sink);
    add_ground(config, sink);
    add_road(config, sink);
    let houses = config
        .houses
        .iter()
        .map(|house| add_house(config, house, sink))
        .collect();
    for tree in &config.trees {
        add_tree(config, tree, sink);
    }
    add_sky(config, sink);
    houses
}

fn add_lights(config: &GameConfig, sink: &mut dyn SceneSink) {
    let scene = &config.scene;
    sink.add_light(Light::Ambient {
        color: Color::WHITE,
        intensity: scene.ambient_light_intensity,
    });
    sink.add_light(Light::Directional {
        color: Color::WHITE,
        intensity: scene.sun_light_intensity,
        position: scene.sun_position,
        shadow_map_size: config.graphics.shadow_map_size,
    });
    for house in &config.houses {
        sink.add_light(Light::Point {
            color: scene.porch_light_color,
            intensity: scene.porch_light_intensity,
            range: scene.porch_light_range,
            position: Vec3::new(
                house.position.x,
                PORCH_LIGHT_HEIGHT,
                house.position.y + PORCH_LIGHT_OFFSET,
            ),
        });
    }
}

/// Flat on the ground, facing up.
fn lying(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_xyz(x, y, z).with_rotation_x(-FRAC_PI_2)
}

fn add_ground(config: &GameConfig, sink: &mut dyn SceneSink) {
    let size = config.ground.size;
    let ground = Renderable::new(
        Primitive::Plane {
            width: size,
            height: size,
        },
        Material::lit(config.ground.color),
    )
    .receiving_shadow();
    sink.add_renderable(None, "ground", lying(0.0, 0.0, 0.0), ground);

    let half = config.half_ground();
    let mut rng = SplitMix64::new(config.scene.grass_seed);
    for _ in 0..config.scene.grass_patches {
        let radius = rng.next_f32() * 2.0 + 1.0;
        let x = rng.next_f32() * size - half;
        let z = rng.next_f32() * size - half;
        let patch = Renderable::new(
            Primitive::Disc {
                radius,
                segments: GRASS_SEGMENTS,
            },
            Material::lit(config.scene.grass_color).with_opacity(GRASS_OPACITY),
        );
        sink.add_renderable(None, "grass", lying(x, GRASS_HEIGHT, z), patch);
    }
}

fn add_road(config: &GameConfig, sink: &mut dyn SceneSink) {
    let size = config.ground.size;
    let road = Renderable::new(
        Primitive::Plane {
            width: config.ground.road_width,
            height: size,
        },
        Material::lit(config.ground.road_color),
    )
    .receiving_shadow();
    sink.add_renderable(None, "road", lying(0.0, ROAD_HEIGHT, 0.0), road);

    let count = config.scene.road_lines;
    if count == 0 {
        return;
    }
    let spacing = size / count as f32;
    let line = Renderable::new(
        Primitive::Plane {
            width: ROAD_LINE_SIZE.0,
            height: ROAD_LINE_SIZE.1,
        },
        Material::unlit(config.scene.road_line_color),
    );
    for i in 0..count {
        let z = -config.half_ground() + i as f32 * spacing;
        sink.add_renderable(None, "road line", lying(0.0, ROAD_LINE_HEIGHT, z), line);
    }
}

fn add_house(config: &GameConfig, placement: &HousePlacement, sink: &mut dyn SceneSink) -> HouseNodes {
    let geometry = &config.house;
    let body = geometry.body;
    let root = sink.add_group(
        None,
        &placement.name,
        Transform::from_xyz(placement.position.x, 0.0, placement.position.y),
    );

    sink.add_renderable(
        Some(root),
        "body",
        Transform::from_xyz(0.0, body.height / 2.0, 0.0),
        Renderable::new(
            Primitive::Cuboid {
                size: body.to_vec3(),
            },
            Material::lit(placement.color),
        )
        .casting_shadow()
        .receiving_shadow(),
    );

    // Four-sided cone turned 45 degrees so its faces line up with the walls.
    sink.add_renderable(
        Some(root),
        "roof",
        Transform::from_xyz(0.0, body.height + geometry.roof_height / 2.0, 0.0)
            .with_rotation_y(FRAC_PI_4),
        Renderable::new(
            Primitive::Cone {
                radius: geometry.roof_radius,
                height: geometry.roof_height,
                segments: 4,
            },
            Material::lit(geometry.door_color),
        )
        .casting_shadow(),
    );

    let door = geometry.door;
    let door_pivot = sink.add_group(
        Some(root),
        "door hinge",
        Transform::from_xyz(-body.width / 2.0, 0.0, body.depth / 2.0),
    );
    sink.add_renderable(
        Some(door_pivot),
        "door",
        Transform::from_xyz(door.width / 2.0, door.height / 2.0, door.depth / 2.0 + 0.01),
        Renderable::new(
            Primitive::Cuboid {
                size: door.to_vec3(),
            },
            Material::lit(geometry.door_color),
        )
        .casting_shadow(),
    );

    let window = Renderable::new(
        Primitive::Cuboid {
            size: geometry.window.to_vec3(),
        },
        Material::lit(geometry.window_color)
            .with_emissive(geometry.window_glow, WINDOW_GLOW_INTENSITY),
    );
    for x in [-1.0, 1.0] {
        sink.add_renderable(
            Some(root),
            "window",
            Transform::from_xyz(x, 1.5, body.depth / 2.0 + 0.05),
            window,
        );
    }

    sink.add_renderable(
        Some(root),
        "chimney",
        Transform::from_xyz(1.2, 3.75, -1.0),
        Renderable::new(
            Primitive::Cuboid {
                size: geometry.chimney.to_vec3(),
            },
            Material::lit(geometry.chimney_color),
        )
        .casting_shadow(),
    );

    HouseNodes { root, door_pivot }
}

fn add_tree(config: &GameConfig, placement: &TreePlacement, sink: &mut dyn SceneSink) {
    let tree = &config.tree;
    let root = sink.add_group(
        None,
        "tree",
        Transform::from_xyz(placement.position.x, 0.0, placement.position.y),
    );
    sink.add_renderable(
        Some(root),
        "trunk",
        Transform::from_xyz(0.0, tree.trunk_height / 2.0, 0.0),
        Renderable::new(
            Primitive::Cylinder {
                radius_top: tree.trunk_radius_top,
                radius_bottom: tree.trunk_radius_bottom,
                height: tree.trunk_height,
                segments: TRUNK_SEGMENTS,
            },
            Material::lit(tree.trunk_color),
        )
        .casting_shadow(),
    );
    for layer in 0..LEAF_LAYERS {
        let i = layer as f32;
        sink.add_renderable(
            Some(root),
            "leaves",
            Transform::from_xyz(0.0, tree.trunk_height + 0.5 + i * 0.8, 0.0),
            Renderable::new(
                Primitive::Sphere {
                    radius: tree.leaves_radius - i * 0.3,
                    width_segments: LEAF_SEGMENTS,
                    height_segments: LEAF_SEGMENTS,
                },
                Material::lit(tree.leaves_color),
            )
            .casting_shadow(),
        );
    }
}

fn add_sky(config: &GameConfig, sink: &mut dyn SceneSink) {
    sink.add_renderable(
        None,
        "sky",
        Transform::default(),
        Renderable::new(
            Primitive::Sphere {
                radius: config.scene.sky_radius,
                width_segments: SKY_SEGMENTS,
                height_segments: SKY_SEGMENTS,
            },
            Material::unlit(config.scene.sky_color).with_side(Side::Back),
        ),
    );
}

/// Splitmix64 stream. The same seed always yields the same scatter.
#[derive(Debug, Clone)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}
