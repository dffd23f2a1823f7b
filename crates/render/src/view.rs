use glam::{EulerRot, Mat4, Quat, Vec3};
use hamlet_config::CameraConfig;
use hamlet_kernel::CameraPose;

/// Perspective camera derived from the player's pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl RenderView {
    pub fn new(camera: &CameraConfig) -> Self {
        Self {
            eye: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: camera.fov_degrees,
            aspect: 16.0 / 9.0,
            near: camera.near,
            far: camera.far,
        }
    }

    /// Copy the player's pose into the view.
    pub fn follow(&mut self, pose: &CameraPose) {
        self.eye = pose.position;
        self.yaw = pose.yaw;
        self.pitch = pose.pitch;
    }

    /// Update the aspect ratio after a resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    /// World-to-camera. Built from the rotation directly so looking
    /// straight up or down stays well defined.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation().conjugate()) * Mat4::from_translation(-self.eye)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn view() -> RenderView {
        RenderView::new(&CameraConfig::default())
    }

    #[test]
    fn follows_pose() {
        let mut v = view();
        let mut pose = CameraPose::new(Vec3::new(0.0, 1.6, 5.0));
        pose.yaw = 0.3;
        v.follow(&pose);
        assert_eq!(v.eye, pose.position);
        assert!((v.forward() - pose.forward()).length() < 1e-5);
    }

    #[test]
    fn point_ahead_is_centred() {
        let mut v = view();
        v.eye = Vec3::new(0.0, 1.6, 5.0);
        let clip = v.view_projection() * Vec3::new(0.0, 1.6, -5.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn straight_up_is_finite() {
        let mut v = view();
        v.pitch = FRAC_PI_2;
        assert!(v.view_projection().is_finite());
        assert!((v.forward() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut v = view();
        v.set_viewport(800, 400);
        assert_eq!(v.aspect, 2.0);
        v.set_viewport(800, 0);
        assert_eq!(v.aspect, 800.0);
    }
}
