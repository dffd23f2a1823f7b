use glam::{EulerRot, Quat, Vec2, Vec3};
use hamlet_config::GameConfig;
use hamlet_input::MovementIntent;
use serde::{Deserialize, Serialize};

/// First-person camera pose. The player is the only writer after spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    /// Rotation about world Y, radians. Zero looks down -Z.
    pub yaw: f32,
    /// Rotation about the camera's X, radians. Positive looks up.
    pub pitch: f32,
}

impl CameraPose {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Yaw then pitch, no roll.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Horizontal unit vector the camera faces, independent of pitch.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal unit vector to the camera's right.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Position on the ground plane (x, z).
    pub fn ground(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }
}

/// Unit-or-zero movement direction: x is strafe (right positive), y is
/// forward. Opposing flags cancel; diagonals are normalized.
pub fn intent_vector(intent: MovementIntent) -> Vec2 {
    let axis = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
    Vec2::new(
        axis(intent.right, intent.left),
        axis(intent.forward, intent.backward),
    )
    .normalize_or_zero()
}

/// Movement controller: coast-and-decay walking, mouse-look, bounds.
#[derive(Debug, Clone)]
pub struct Player {
    pose: CameraPose,
    /// x is strafe speed, y is forward speed, both per tick.
    velocity: Vec2,
    sensitivity: f32,
    walk_speed: f32,
    run_speed: f32,
    friction: f32,
    eye_height: f32,
    bound: f32,
    max_pitch: f32,
    base_sensitivity: f32,
    sensitivity_baseline: f32,
    spawn: Vec3,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let player = &config.player;
        let spawn = Vec3::new(player.spawn.x, player.height, player.spawn.y);
        Self {
            pose: CameraPose::new(spawn),
            velocity: Vec2::ZERO,
            sensitivity: player.mouse_sensitivity,
            walk_speed: player.walk_speed,
            run_speed: player.run_speed,
            friction: player.friction,
            eye_height: player.height,
            // A margin wider than the ground pins the player to the centre.
            bound: (config.half_ground() - player.boundary_margin).max(0.0),
            max_pitch: config.camera.max_pitch.max(0.0),
            base_sensitivity: player.mouse_sensitivity,
            sensitivity_baseline: player.sensitivity_baseline,
            spawn,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Radians of rotation per pixel of pointer motion.
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Scale sensitivity by a slider value; the baseline value means 1.0.
    pub fn set_sensitivity_slider(&mut self, value: f32) {
        self.sensitivity = self.base_sensitivity * (value / self.sensitivity_baseline);
    }

    /// Integrate one tick of movement.
    ///
    /// Speeds are per tick, so `dt` only gates the step: a non-finite `dt`
    /// skips it.
    pub fn update(&mut self, dt: f32, intent: MovementIntent) {
        if !dt.is_finite() {
            tracing::trace!(dt, "skipping movement for non-finite dt");
            return;
        }
        let direction = intent_vector(intent);
        let speed = if intent.running {
            self.run_speed
        } else {
            self.walk_speed
        };
        // Axes without input keep their decaying velocity.
        if intent.forward || intent.backward {
            self.velocity.y = direction.y * speed;
        }
        if intent.left || intent.right {
            self.velocity.x = direction.x * speed;
        }

        self.pose.position +=
            self.pose.forward() * self.velocity.y + self.pose.right() * self.velocity.x;
        self.velocity *= self.friction;
        self.constrain();
    }

    /// Apply pointer motion in pixels. Pitch stays within the configured limit.
    pub fn look(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        self.pose.yaw -= delta.x * self.sensitivity;
        self.pose.pitch = (self.pose.pitch - delta.y * self.sensitivity)
            .clamp(-self.max_pitch, self.max_pitch);
    }

    /// Back to the spawn point, facing forward, at rest.
    pub fn reset(&mut self) {
        self.pose = CameraPose::new(self.spawn);
        self.velocity = Vec2::ZERO;
    }

    /// Ground position rounded to one decimal, as shown on the HUD.
    pub fn rounded_position(&self) -> Vec2 {
        (self.pose.ground() * 10.0).round() / 10.0
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, x: f32, z: f32) {
        self.pose.position.x = x;
        self.pose.position.z = z;
        self.constrain();
    }

    fn constrain(&mut self) {
        let p = &mut self.pose.position;
        p.y = self.eye_height;
        p.x = p.x.clamp(-self.bound, self.bound);
        p.z = p.z.clamp(-self.bound, self.bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const DT: f32 = 1.0 / 60.0;

    fn player() -> Player {
        Player::new(&GameConfig::default())
    }

    fn forward() -> MovementIntent {
        MovementIntent {
            forward: true,
            ..MovementIntent::default()
        }
    }

    #[test]
    fn intent_vector_is_normalized() {
        let none = intent_vector(MovementIntent::default());
        assert_eq!(none, Vec2::ZERO);

        let single = intent_vector(forward());
        assert_eq!(single, Vec2::new(0.0, 1.0));

        let opposed = intent_vector(MovementIntent {
            forward: true,
            backward: true,
            ..MovementIntent::default()
        });
        assert_eq!(opposed, Vec2::ZERO);

        let diagonal = intent_vector(MovementIntent {
            forward: true,
            left: true,
            ..MovementIntent::default()
        });
        assert!((diagonal.length() - single.length()).abs() < 1e-6);
        assert!(diagonal.x < 0.0 && diagonal.y > 0.0);
    }

    #[test]
    fn spawns_at_eye_height() {
        let p = player();
        assert_eq!(p.pose().position, Vec3::new(0.0, 1.6, 5.0));
        assert_eq!(p.pose().yaw, 0.0);
    }

    #[test]
    fn walking_forward_moves_down_negative_z() {
        let mut p = player();
        p.update(DT, forward());
        let pos = p.pose().position;
        assert!((pos.z - 4.9).abs() < 1e-5);
        assert!(pos.x.abs() < 1e-6);
        assert!((p.velocity().y - 0.08).abs() < 1e-6);
    }

    #[test]
    fn running_doubles_speed() {
        let mut p = player();
        p.update(
            DT,
            MovementIntent {
                forward: true,
                running: true,
                ..MovementIntent::default()
            },
        );
        assert!((p.pose().position.z - 4.8).abs() < 1e-5);
    }

    #[test]
    fn releasing_keys_coasts_and_decays() {
        let mut p = player();
        p.update(DT, forward());
        let after_press = p.pose().position.z;
        p.update(DT, MovementIntent::default());
        let coasted = after_press - p.pose().position.z;
        assert!((coasted - 0.08).abs() < 1e-5);
        for _ in 0..200 {
            p.update(DT, MovementIntent::default());
        }
        assert!(p.velocity().length() < 1e-6);
    }

    #[test]
    fn movement_follows_yaw_and_ignores_pitch() {
        let mut p = player();
        // Turn a quarter to the left and look straight up.
        p.look(Vec2::new(-FRAC_PI_2 / p.sensitivity(), -1e6));
        assert_eq!(p.pose().pitch, FRAC_PI_2);
        p.update(DT, forward());
        let pos = p.pose().position;
        assert!((pos.x - -0.1).abs() < 1e-4, "x was {}", pos.x);
        assert!((pos.z - 5.0).abs() < 1e-4);
        assert_eq!(pos.y, 1.6);
    }

    #[test]
    fn pitch_is_clamped_both_ways() {
        let mut p = player();
        for dy in [1e4, -3e4, 5.0, -1e9, 1e9] {
            p.look(Vec2::new(0.0, dy));
            assert!(p.pose().pitch.abs() <= FRAC_PI_2);
        }
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut p = player();
        let before = p.pose();
        p.look(Vec2::new(f32::NAN, 1.0));
        p.update(f32::INFINITY, forward());
        assert_eq!(p.pose(), before);
    }

    #[test]
    fn position_stays_inside_bounds() {
        let mut p = player();
        let run = MovementIntent {
            forward: true,
            right: true,
            running: true,
            ..MovementIntent::default()
        };
        for i in 0..5000 {
            if i % 500 == 0 {
                p.look(Vec2::new(PI / 3.0 / p.sensitivity(), 0.0));
            }
            p.update(DT, run);
            let pos = p.pose().position;
            assert!(pos.x.abs() <= 49.0 && pos.z.abs() <= 49.0);
        }
    }

    #[test]
    fn degenerate_limits_pin_instead_of_failing() {
        let mut config = GameConfig::default();
        config.ground.size = 1.0;
        config.camera.max_pitch = -0.5;
        let mut p = Player::new(&config);
        p.update(DT, forward());
        p.look(Vec2::new(0.0, 100.0));
        let pose = p.pose();
        assert_eq!(pose.position.x, 0.0);
        assert_eq!(pose.position.z, 0.0);
        assert_eq!(pose.pitch, 0.0);
    }

    #[test]
    fn sensitivity_slider_scales_from_baseline() {
        let mut p = player();
        p.set_sensitivity_slider(5.0);
        assert!((p.sensitivity() - 0.002).abs() < 1e-9);
        p.set_sensitivity_slider(10.0);
        assert!((p.sensitivity() - 0.004).abs() < 1e-9);
    }

    #[test]
    fn reset_returns_to_spawn() {
        let mut p = player();
        p.look(Vec2::new(100.0, 100.0));
        p.update(DT, forward());
        p.reset();
        assert_eq!(p.pose(), CameraPose::new(Vec3::new(0.0, 1.6, 5.0)));
        assert_eq!(p.velocity(), Vec2::ZERO);
    }

    #[test]
    fn rounded_position_uses_one_decimal() {
        let mut p = player();
        p.place(-3.14159, 2.25);
        assert_eq!(p.rounded_position(), Vec2::new(-3.1, 2.3));
    }

    #[test]
    fn orientation_matches_horizontal_basis() {
        let mut pose = CameraPose::new(Vec3::ZERO);
        pose.yaw = 0.7;
        let rotated = pose.orientation() * Vec3::NEG_Z;
        assert!((rotated - pose.forward()).length() < 1e-5);
        let right = pose.orientation() * Vec3::X;
        assert!((right - pose.right()).length() < 1e-5);
    }
}
