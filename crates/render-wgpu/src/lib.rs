//! wgpu render backend for the village.
//!
//! Tessellates every distinct primitive once, then draws the scene graph as
//! instanced batches: opaque first, translucent after with depth writes off.
//!
//! # Invariants
//! - The renderer never mutates the scene graph.
//! - Meshes are keyed by exact primitive parameters; node transforms carry
//!   placement only.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{MAX_POINT_LIGHTS, WgpuRenderer};
pub use mesh::{MeshData, MeshKey, Vertex, tessellate};
