use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Translation-only transform.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Self::default()
        }
    }

    /// Replace the rotation with a rotation about X (radians).
    pub fn with_rotation_x(self, angle: f32) -> Self {
        Self {
            rotation: Quat::from_rotation_x(angle),
            ..self
        }
    }

    /// Replace the rotation with a rotation about Y (radians).
    pub fn with_rotation_y(self, angle: f32) -> Self {
        Self {
            rotation: Quat::from_rotation_y(angle),
            ..self
        }
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}
