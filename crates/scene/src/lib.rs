//! Scene graph: static renderables, lights and fog, independent of any GPU API.
//!
//! Nodes are stored in insertion order and a node's parent is always inserted
//! before it, so world matrices resolve in a single forward pass.
//!
//! # Invariants
//! - Node ids are dense indices and never reused.
//! - After construction only node transforms (door pivots) and fog change.
//! - Backends read the graph; they never mutate it.

mod components;
mod graph;

pub use components::{Fog, Light, Material, Primitive, Renderable, Shading, Side};
pub use graph::{NodeId, SceneError, SceneGraph, SceneNode, SceneSink};

pub fn crate_info() -> &'static str {
    "hamlet-scene v2.0.0"
}
