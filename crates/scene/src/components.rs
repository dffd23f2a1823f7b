use glam::Vec3;
use hamlet_common::Color;
use serde::{Deserialize, Serialize};

/// Shape of a renderable, in local space.
///
/// Planes and discs are authored in the XY plane facing +Z; cones and
/// cylinders are centred on the origin along Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Cuboid {
        size: Vec3,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Disc {
        radius: f32,
        segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Primitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cuboid { .. } => "cuboid",
            Self::Plane { .. } => "plane",
            Self::Disc { .. } => "disc",
            Self::Cone { .. } => "cone",
            Self::Cylinder { .. } => "cylinder",
            Self::Sphere { .. } => "sphere",
        }
    }
}

/// Whether a surface reacts to scene lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shading {
    #[default]
    Lit,
    Unlit,
}

/// Which faces are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Front,
    /// Seen from inside, e.g. the sky dome.
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub opacity: f32,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub shading: Shading,
    pub side: Side,
}

impl Material {
    /// Opaque lit surface.
    pub fn lit(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            shading: Shading::Lit,
            side: Side::Front,
        }
    }

    /// Opaque surface drawn at full color regardless of lighting.
    pub fn unlit(color: Color) -> Self {
        Self {
            shading: Shading::Unlit,
            ..Self::lit(color)
        }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }

    pub fn with_emissive(self, emissive: Color, intensity: f32) -> Self {
        Self {
            emissive,
            emissive_intensity: intensity,
            ..self
        }
    }

    pub fn with_side(self, side: Side) -> Self {
        Self { side, ..self }
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Renderable component: a primitive with its material and shadow flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub primitive: Primitive,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Renderable {
    pub fn new(primitive: Primitive, material: Material) -> Self {
        Self {
            primitive,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn casting_shadow(self) -> Self {
        Self {
            cast_shadow: true,
            ..self
        }
    }

    pub fn receiving_shadow(self) -> Self {
        Self {
            receive_shadow: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        /// The light shines from this position towards the origin.
        position: Vec3,
        shadow_map_size: u32,
    },
    Point {
        color: Color,
        intensity: f32,
        /// Distance at which the contribution reaches zero.
        range: f32,
        position: Vec3,
    },
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}
