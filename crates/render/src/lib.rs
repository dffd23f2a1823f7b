//! Rendering adapter: renderer-agnostic view and output.
//!
//! # Invariants
//! - Renderers read the scene graph; they never mutate it.
//! - Render state derives from the scene and the player's camera pose.
//!
//! The GPU backend lives in `hamlet-render-wgpu`; `DebugTextRenderer`
//! implements the same trait for headless use and tests.

mod minimap;
mod text;
mod view;

pub use minimap::{Minimap, MinimapFrame, MinimapMark};
pub use text::DebugTextRenderer;
pub use view::RenderView;

use hamlet_scene::SceneGraph;

/// Renderer-agnostic interface.
pub trait Renderer {
    type Output;

    /// Render one frame of `scene` as seen from `view`.
    fn render(&self, scene: &SceneGraph, view: &RenderView) -> Self::Output;
}

pub fn crate_info() -> &'static str {
    "hamlet-render v2.0.0"
}
