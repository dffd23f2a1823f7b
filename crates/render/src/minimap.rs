use glam::Vec2;
use hamlet_common::Color;
use hamlet_kernel::{CameraPose, House};

/// A house marker in minimap pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapMark {
    pub center: Vec2,
    pub color: Color,
    pub name: String,
}

/// Everything needed to paint one minimap frame, in pixels from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapFrame {
    pub size: Vec2,
    /// Road strip: left edge x and width. It runs the full height.
    pub road_x: f32,
    pub road_width: f32,
    pub houses: Vec<MinimapMark>,
    /// The player is always drawn at the centre.
    pub player: Vec2,
    /// End of the heading line starting at `player`.
    pub heading_tip: Vec2,
}

/// Player-centred top-down projection. North (-Z) is up.
#[derive(Debug, Clone, Copy)]
pub struct Minimap {
    pub size: Vec2,
    /// Pixels per world unit.
    pub scale: f32,
    pub heading_length: f32,
}

impl Default for Minimap {
    fn default() -> Self {
        Self {
            size: Vec2::splat(150.0),
            scale: 1.5,
            heading_length: 15.0,
        }
    }
}

impl Minimap {
    /// Map a ground-plane point (x, z) to pixels.
    pub fn project(&self, player: Vec2, point: Vec2) -> Vec2 {
        self.size / 2.0 + (point - player) * self.scale
    }

    pub fn frame<'a>(
        &self,
        pose: &CameraPose,
        houses: impl IntoIterator<Item = &'a House>,
        road_width: f32,
    ) -> MinimapFrame {
        let player = pose.ground();
        let center = self.size / 2.0;
        let road_center = self.project(player, Vec2::new(0.0, player.y)).x;
        let houses = houses
            .into_iter()
            .map(|house| MinimapMark {
                center: self.project(player, Vec2::new(house.position.x, house.position.z)),
                color: house.color,
                name: house.name.clone(),
            })
            .collect();
        let facing = pose.forward();
        MinimapFrame {
            size: self.size,
            road_x: road_center - road_width * self.scale / 2.0,
            road_width: road_width * self.scale,
            houses,
            player: center,
            heading_tip: center + Vec2::new(facing.x, facing.z) * self.heading_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn house(x: f32, z: f32) -> House {
        House {
            index: 0,
            name: "Red House".into(),
            position: Vec3::new(x, 0.0, z),
            color: Color::from_hex(0xff6b6b),
        }
    }

    #[test]
    fn houses_are_relative_to_player() {
        let map = Minimap::default();
        let pose = CameraPose::new(Vec3::new(0.0, 1.6, 5.0));
        let houses = [house(-10.0, -10.0)];
        let frame = map.frame(&pose, &houses, 5.0);
        assert_eq!(frame.player, Vec2::new(75.0, 75.0));
        assert_eq!(frame.houses[0].center, Vec2::new(75.0 - 15.0, 75.0 - 22.5));
    }

    #[test]
    fn road_follows_player_x() {
        let map = Minimap::default();
        let pose = CameraPose::new(Vec3::new(10.0, 1.6, 0.0));
        let none: [House; 0] = [];
        let frame = map.frame(&pose, &none, 5.0);
        assert_eq!(frame.road_width, 7.5);
        assert_eq!(frame.road_x + frame.road_width / 2.0, 75.0 - 15.0);
    }

    #[test]
    fn heading_points_up_when_facing_north() {
        let map = Minimap::default();
        let none: [House; 0] = [];
        let mut pose = CameraPose::new(Vec3::ZERO);
        let frame = map.frame(&pose, &none, 5.0);
        assert!((frame.heading_tip - Vec2::new(75.0, 60.0)).length() < 1e-4);

        pose.yaw = FRAC_PI_2;
        let frame = map.frame(&pose, &none, 5.0);
        assert!((frame.heading_tip - Vec2::new(60.0, 75.0)).length() < 1e-4);
    }
}
