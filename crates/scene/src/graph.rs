use glam::{Mat4, Quat};
use hamlet_common::{Color, Transform};
use serde::{Deserialize, Serialize};

use crate::components::{Fog, Light, Renderable};

/// Dense index of a node in a `SceneGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene node {0:?} not found")]
    NodeNotFound(NodeId),
}

/// A group or renderable placed relative to its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub parent: Option<NodeId>,
    pub label: String,
    pub transform: Transform,
    pub renderable: Option<Renderable>,
}

/// The opaque "add things to the scene" surface used by scene construction.
pub trait SceneSink {
    /// Add an empty transform node (a pivot or a grouping of parts).
    fn add_group(&mut self, parent: Option<NodeId>, label: &str, transform: Transform) -> NodeId;

    /// Add a drawable node.
    fn add_renderable(
        &mut self,
        parent: Option<NodeId>,
        label: &str,
        transform: Transform,
        renderable: Renderable,
    ) -> NodeId;

    fn add_light(&mut self, light: Light);

    fn set_background(&mut self, color: Color);

    fn set_fog(&mut self, fog: Option<Fog>);
}

/// In-memory scene graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    lights: Vec<Light>,
    background: Color,
    fog: Option<Fog>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            lights: Vec::new(),
            background: Color::BLACK,
            fog: None,
        }
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn renderable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.renderable.is_some()).count()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn fog(&self) -> Option<Fog> {
        self.fog
    }

    /// Replace the local rotation of a node (used for door pivots).
    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(id.0 as usize)
            .ok_or(SceneError::NodeNotFound(id))?;
        node.transform.rotation = rotation;
        Ok(())
    }

    /// Local-to-world matrix of a node, composed through its ancestors.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut node = self.node(id).ok_or(SceneError::NodeNotFound(id))?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.node(parent).ok_or(SceneError::NodeNotFound(parent))?;
            matrix = node.transform.matrix() * matrix;
        }
        Ok(matrix)
    }

    /// World matrices for every node, in id order.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut out: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let world = match node.parent {
                // Parents always precede children, so the parent is already resolved.
                Some(parent) => out.get(parent.0 as usize).map_or(local, |p| *p * local),
                None => local,
            };
            out.push(world);
        }
        out
    }

    /// Every drawable node with its world matrix.
    pub fn renderables(&self) -> impl Iterator<Item = (NodeId, &Renderable, Mat4)> + '_ {
        let worlds = self.world_matrices();
        self.nodes
            .iter()
            .enumerate()
            .filter_map(move |(i, node)| {
                node.renderable
                    .as_ref()
                    .map(|r| (NodeId(i as u32), r, worlds[i]))
            })
    }

    /// A parent that is not already in the graph is dropped and the node
    /// becomes a root.
    fn push(&mut self, mut node: SceneNode) -> NodeId {
        if let Some(parent) = node.parent.filter(|p| p.0 as usize >= self.nodes.len()) {
            tracing::warn!(?parent, label = %node.label, "unknown parent, adding as root");
            node.parent = None;
        }
        let id = NodeId(self.nodes.len() as u32);
        tracing::trace!(?id, label = %node.label, "scene node added");
        self.nodes.push(node);
        id
    }
}

impl SceneSink for SceneGraph {
    fn add_group(&mut self, parent: Option<NodeId>, label: &str, transform: Transform) -> NodeId {
        self.push(SceneNode {
            parent,
            label: label.into(),
            transform,
            renderable: None,
        })
    }

    fn add_renderable(
        &mut self,
        parent: Option<NodeId>,
        label: &str,
        transform: Transform,
        renderable: Renderable,
    ) -> NodeId {
        self.push(SceneNode {
            parent,
            label: label.into(),
            transform,
            renderable: Some(renderable),
        })
    }

    fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn set_fog(&mut self, fog: Option<Fog>) {
        self.fog = fog;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Material, Primitive};
    use glam::Vec3;

    fn cube() -> Renderable {
        Renderable::new(
            Primitive::Cuboid { size: Vec3::ONE },
            Material::lit(Color::WHITE),
        )
    }

    #[test]
    fn ids_are_dense() {
        let mut scene = SceneGraph::new();
        let a = scene.add_group(None, "a", Transform::default());
        let b = scene.add_renderable(Some(a), "b", Transform::default(), cube());
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.renderable_count(), 1);
    }

    #[test]
    fn child_inherits_parent_transform() {
        let mut scene = SceneGraph::new();
        let group = scene.add_group(None, "house", Transform::from_xyz(10.0, 0.0, -10.0));
        let body = scene.add_renderable(Some(group), "body", Transform::from_xyz(0.0, 1.5, 0.0), cube());

        let m = scene.world_matrix(body).unwrap();
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(10.0, 1.5, -10.0)).length() < 1e-5);
    }

    #[test]
    fn batch_matrices_match_single_lookup() {
        let mut scene = SceneGraph::new();
        let root = scene.add_group(
            None,
            "root",
            Transform::from_xyz(1.0, 2.0, 3.0).with_rotation_y(0.7),
        );
        let mid = scene.add_group(Some(root), "mid", Transform::from_xyz(-2.0, 0.0, 0.5));
        let leaf = scene.add_renderable(Some(mid), "leaf", Transform::from_xyz(0.0, 1.0, 0.0), cube());

        let all = scene.world_matrices();
        let single = scene.world_matrix(leaf).unwrap();
        assert!(all[leaf.0 as usize].abs_diff_eq(single, 1e-5));
    }

    #[test]
    fn rotating_a_pivot_swings_children() {
        let mut scene = SceneGraph::new();
        let pivot = scene.add_group(None, "hinge", Transform::default());
        let door = scene.add_renderable(Some(pivot), "door", Transform::from_xyz(1.0, 0.0, 0.0), cube());

        scene
            .set_rotation(pivot, Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2))
            .unwrap();
        let p = scene.world_matrix(door).unwrap().transform_point3(Vec3::ZERO);
        // -90 deg about Y takes +X to +Z.
        assert!((p - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let mut scene = SceneGraph::new();
        assert_eq!(
            scene.set_rotation(NodeId(3), Quat::IDENTITY),
            Err(SceneError::NodeNotFound(NodeId(3)))
        );
        assert!(scene.world_matrix(NodeId(0)).is_err());
    }

    #[test]
    fn unknown_parent_is_detached() {
        let mut scene = SceneGraph::new();
        let orphan = scene.add_renderable(
            Some(NodeId(7)),
            "orphan",
            Transform::from_xyz(0.0, 2.0, 0.0),
            cube(),
        );
        assert_eq!(scene.node(orphan).and_then(|n| n.parent), None);
        let all = scene.world_matrices();
        assert!((all[0].w_axis.y - 2.0).abs() < 1e-6);
        assert!(scene.world_matrix(orphan).is_ok());
    }

    #[test]
    fn renderables_skip_groups() {
        let mut scene = SceneGraph::new();
        let g = scene.add_group(None, "g", Transform::default());
        scene.add_renderable(Some(g), "r", Transform::from_xyz(0.0, 5.0, 0.0), cube());
        let items: Vec<_> = scene.renderables().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, NodeId(1));
        assert!((items[0].2.w_axis.y - 5.0).abs() < 1e-6);
    }

    #[test]
    fn lights_fog_background() {
        let mut scene = SceneGraph::new();
        scene.add_light(Light::Ambient {
            color: Color::WHITE,
            intensity: 0.6,
        });
        scene.set_background(Color::from_hex(0x87ceeb));
        scene.set_fog(Some(Fog {
            color: Color::from_hex(0x87ceeb),
            near: 0.0,
            far: 750.0,
        }));
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.background(), Color::from_hex(0x87ceeb));
        assert_eq!(scene.fog().map(|f| f.far), Some(750.0));
    }
}
