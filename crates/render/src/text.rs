use std::collections::BTreeMap;
use std::fmt::Write;

use hamlet_scene::{Light, NodeId, SceneGraph};

use crate::{RenderView, Renderer};

/// Text renderer for headless runs: a summary of the scene and camera.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (nodes={}, renderables={}) ===",
            scene.node_count(),
            scene.renderable_count()
        );
        let _ = writeln!(out, "Background: {}", scene.background());
        match scene.fog() {
            Some(fog) => {
                let _ = writeln!(out, "Fog: {} {:.0}..{:.0}", fog.color, fog.near, fog.far);
            }
            None => out.push_str("Fog: off\n"),
        }
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) yaw={:.2} pitch={:.2} fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.yaw, view.pitch, view.fov_degrees
        );

        for light in scene.lights() {
            match light {
                Light::Ambient { color, intensity } => {
                    let _ = writeln!(out, "  light ambient {color} x{intensity:.2}");
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    ..
                } => {
                    let _ = writeln!(
                        out,
                        "  light sun {color} x{intensity:.2} from ({:.0}, {:.0}, {:.0})",
                        position.x, position.y, position.z
                    );
                }
                Light::Point {
                    color,
                    intensity,
                    range,
                    position,
                } => {
                    let _ = writeln!(
                        out,
                        "  light point {color} x{intensity:.2} r={range:.0} at ({:.1}, {:.1}, {:.1})",
                        position.x, position.y, position.z
                    );
                }
            }
        }

        let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, renderable, _) in scene.renderables() {
            *kinds.entry(renderable.primitive.kind()).or_default() += 1;
        }
        for (kind, count) in kinds {
            let _ = writeln!(out, "  {kind}: {count}");
        }

        // Root groups are the placed objects: houses and trees.
        for i in 0..scene.node_count() as u32 {
            let Some(node) = scene.node(NodeId(i)) else {
                continue;
            };
            if node.parent.is_none() && node.renderable.is_none() {
                let p = node.transform.position;
                let _ = writeln!(out, "  [{}] pos=({:.1}, {:.1}, {:.1})", node.label, p.x, p.y, p.z);
            }
        }

        out
    }
}
