use glam::{Quat, Vec2, Vec3};
use hamlet_common::Color;
use hamlet_config::GameConfig;
use hamlet_scene::{Fog, NodeId, SceneGraph, SceneSink};
use serde::{Deserialize, Serialize};

use crate::door::{DoorState, ease_toward};
use crate::error::KernelError;
use crate::layout::{build_scene, scene_fog};
use crate::proximity::{LinearScan, ProximityIndex};

/// A house the player can interact with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    /// Position in configuration order; stable for the whole session.
    pub index: usize,
    pub name: String,
    /// Ground-level centre of the house.
    pub position: Vec3,
    pub color: Color,
}

#[derive(Debug)]
struct HouseSlot {
    house: House,
    door: DoorState,
    pivot: NodeId,
    /// Visible hinge rotation, eased toward `door.target_angle()`.
    live_angle: f32,
}

/// The static village plus per-house door state.
///
/// Owns the scene graph; the only scene mutations after construction are
/// door pivot rotations and the fog toggle.
#[derive(Debug)]
pub struct Environment {
    scene: SceneGraph,
    slots: Vec<HouseSlot>,
    sites: Vec<Vec2>,
    proximity: Box<dyn ProximityIndex>,
    fog: Fog,
    open_angle: f32,
    door_speed: f32,
    door_epsilon: f32,
}

impl Environment {
    pub fn new(config: &GameConfig) -> Self {
        let mut scene = SceneGraph::new();
        let nodes = build_scene(config, &mut scene);
        let slots: Vec<HouseSlot> = config
            .houses
            .iter()
            .zip(nodes)
            .enumerate()
            .map(|(index, (placement, nodes))| HouseSlot {
                house: House {
                    index,
                    name: placement.name.clone(),
                    position: Vec3::new(placement.position.x, 0.0, placement.position.y),
                    color: placement.color,
                },
                door: DoorState::CLOSED,
                pivot: nodes.door_pivot,
                live_angle: 0.0,
            })
            .collect();
        let sites = config.houses.iter().map(|h| h.position).collect();
        tracing::debug!(
            houses = slots.len(),
            nodes = scene.node_count(),
            lights = scene.lights().len(),
            "environment built"
        );
        Self {
            scene,
            slots,
            sites,
            proximity: Box::new(LinearScan),
            fog: scene_fog(config),
            open_angle: config.animation.door_rotation,
            door_speed: config.animation.door_speed,
            door_epsilon: config.animation.door_epsilon,
        }
    }

    /// Replace the nearest-house strategy.
    pub fn with_proximity(mut self, proximity: Box<dyn ProximityIndex>) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn house_count(&self) -> usize {
        self.slots.len()
    }

    pub fn houses(&self) -> impl ExactSizeIterator<Item = &House> + '_ {
        self.slots.iter().map(|slot| &slot.house)
    }

    pub fn house(&self, index: usize) -> Option<&House> {
        self.slots.get(index).map(|slot| &slot.house)
    }

    /// Logical door state, by value.
    pub fn door_state(&self, index: usize) -> Option<DoorState> {
        self.slots.get(index).map(|slot| slot.door)
    }

    /// Current visible hinge rotation in radians.
    pub fn door_angle(&self, index: usize) -> Option<f32> {
        self.slots.get(index).map(|slot| slot.live_angle)
    }

    /// Flip a door. Returns the new open flag.
    pub fn toggle_door(&mut self, index: usize) -> Result<bool, KernelError> {
        let open_angle = self.open_angle;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(KernelError::UnknownHouse(index))?;
        let open = slot.door.toggle(open_angle);
        tracing::debug!(house = %slot.house.name, open, "door toggled");
        Ok(open)
    }

    /// Close every door logically; the visible angles ease back.
    pub fn close_all_doors(&mut self) {
        for slot in &mut self.slots {
            slot.door.reset();
        }
    }

    /// One easing step for every door that is not at rest.
    pub fn animate_doors(&mut self) -> Result<(), KernelError> {
        for slot in &mut self.slots {
            let target = slot.door.target_angle();
            if slot.live_angle == target {
                continue;
            }
            slot.live_angle = ease_toward(slot.live_angle, target, self.door_speed, self.door_epsilon);
            self.scene
                .set_rotation(slot.pivot, Quat::from_rotation_y(slot.live_angle))?;
        }
        Ok(())
    }

    /// Nearest house strictly within `max_distance` on the ground plane.
    pub fn nearest_house(&self, position: Vec3, max_distance: f32) -> Option<&House> {
        let point = Vec2::new(position.x, position.z);
        self.proximity
            .nearest(&self.sites, point, max_distance)
            .and_then(|index| self.house(index))
    }

    pub fn set_fog_enabled(&mut self, enabled: bool) {
        self.scene.set_fog(enabled.then_some(self.fog));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn env() -> Environment {
        Environment::new(&GameConfig::default())
    }

    #[test]
    fn houses_follow_config_order() {
        let env = env();
        let names: Vec<&str> = env.houses().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Red House", "Blue House", "Yellow House"]);
        assert_eq!(env.house(2).unwrap().position, Vec3::new(-10.0, 0.0, -25.0));
        for (i, house) in env.houses().enumerate() {
            assert_eq!(house.index, i);
            assert_eq!(env.door_state(i), Some(DoorState::CLOSED));
        }
    }

    #[test]
    fn toggle_unknown_house_fails() {
        let mut env = env();
        assert_eq!(env.toggle_door(3), Err(KernelError::UnknownHouse(3)));
    }

    #[test]
    fn toggle_retargets_only_that_door() {
        let mut env = env();
        assert_eq!(env.toggle_door(1), Ok(true));
        assert_eq!(env.door_state(1).unwrap().target_angle(), -FRAC_PI_2);
        assert!(!env.door_state(0).unwrap().is_open());
        assert_eq!(env.door_angle(1), Some(0.0));
    }

    #[test]
    fn animation_swings_the_pivot() {
        let mut env = env();
        env.toggle_door(0).unwrap();
        for _ in 0..500 {
            env.animate_doors().unwrap();
        }
        assert_eq!(env.door_angle(0), Some(-FRAC_PI_2));

        let pivot = env.slots[0].pivot;
        let rotation = env.scene().node(pivot).unwrap().transform.rotation;
        assert!(rotation.abs_diff_eq(Quat::from_rotation_y(-FRAC_PI_2), 1e-6));
    }

    #[test]
    fn close_all_eases_back() {
        let mut env = env();
        env.toggle_door(0).unwrap();
        env.toggle_door(2).unwrap();
        for _ in 0..30 {
            env.animate_doors().unwrap();
        }
        env.close_all_doors();
        assert!(env.houses().all(|h| !env.door_state(h.index).unwrap().is_open()));
        let swung = env.door_angle(0).unwrap();
        assert!(swung < 0.0);
        env.animate_doors().unwrap();
        assert!(env.door_angle(0).unwrap() > swung);
    }

    #[test]
    fn nearest_house_uses_ground_distance() {
        let env = env();
        assert!(env.nearest_house(Vec3::new(0.0, 1.6, 0.0), 6.0).is_none());
        let near = env.nearest_house(Vec3::new(-10.0, 1.6, -8.0), 6.0).unwrap();
        assert_eq!(near.index, 0);
    }

    #[derive(Debug)]
    struct AlwaysLast;

    impl ProximityIndex for AlwaysLast {
        fn nearest(&self, sites: &[Vec2], _: Vec2, _: f32) -> Option<usize> {
            sites.len().checked_sub(1)
        }
    }

    #[test]
    fn proximity_strategy_is_pluggable() {
        let env = env().with_proximity(Box::new(AlwaysLast));
        let house = env.nearest_house(Vec3::ZERO, 6.0).unwrap();
        assert_eq!(house.name, "Yellow House");
    }

    #[test]
    fn fog_toggle() {
        let mut env = env();
        assert!(env.scene().fog().is_some());
        env.set_fog_enabled(false);
        assert!(env.scene().fog().is_none());
        env.set_fog_enabled(true);
        assert_eq!(env.scene().fog().map(|f| f.far), Some(750.0));
    }
}
