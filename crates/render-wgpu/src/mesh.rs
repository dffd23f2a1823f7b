use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use hamlet_scene::Primitive;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// CPU-side triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.iter().map(|&corner| Vertex::new(corner, normal)));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Triangle fan around `center`, ring points in order.
    fn push_fan(&mut self, center: Vec3, ring: &[Vec3], normal: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(center, normal));
        self.vertices
            .extend(ring.iter().map(|&p| Vertex::new(p, normal)));
        for i in 0..ring.len() as u32 {
            let next = (i + 1) % ring.len() as u32;
            self.indices.extend_from_slice(&[base, base + 1 + i, base + 1 + next]);
        }
    }
}

/// Identity of a tessellated primitive: a tag plus the exact parameter bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshKey([u32; 5]);

impl MeshKey {
    pub fn of(primitive: &Primitive) -> Self {
        let b = f32::to_bits;
        Self(match *primitive {
            Primitive::Cuboid { size } => [0, b(size.x), b(size.y), b(size.z), 0],
            Primitive::Plane { width, height } => [1, b(width), b(height), 0, 0],
            Primitive::Disc { radius, segments } => [2, b(radius), segments, 0, 0],
            Primitive::Cone {
                radius,
                height,
                segments,
            } => [3, b(radius), b(height), segments, 0],
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => [4, b(radius_top), b(radius_bottom), b(height), segments],
            Primitive::Sphere {
                radius,
                width_segments,
                height_segments,
            } => [5, b(radius), width_segments, height_segments, 0],
        })
    }
}

/// Triangulate a primitive in its local frame.
pub fn tessellate(primitive: &Primitive) -> MeshData {
    match *primitive {
        Primitive::Cuboid { size } => cuboid(size / 2.0),
        Primitive::Plane { width, height } => plane(width / 2.0, height / 2.0),
        Primitive::Disc { radius, segments } => disc(radius, segments.max(3)),
        Primitive::Cone {
            radius,
            height,
            segments,
        } => frustum(0.0, radius, height, segments.max(3)),
        Primitive::Cylinder {
            radius_top,
            radius_bottom,
            height,
            segments,
        } => frustum(radius_top, radius_bottom, height, segments.max(3)),
        Primitive::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere(radius, width_segments.max(3), height_segments.max(2)),
    }
}

fn cuboid(h: Vec3) -> MeshData {
    let mut mesh = MeshData::default();
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    for (normal, u, v) in faces {
        let c = normal * h;
        let du = u * h;
        let dv = v * h;
        mesh.push_quad([c - du - dv, c + du - dv, c + du + dv, c - du + dv], normal);
    }
    mesh
}

fn plane(hw: f32, hh: f32) -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        Vec3::Z,
    );
    mesh
}

fn disc(radius: f32, segments: u32) -> MeshData {
    let ring: Vec<Vec3> = (0..segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            Vec3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
        })
        .collect();
    let mut mesh = MeshData::default();
    mesh.push_fan(Vec3::ZERO, &ring, Vec3::Z);
    mesh
}

/// Point on a ring about Y. Angle zero is +Z, increasing toward +X.
fn around_y(radius: f32, theta: f32, y: f32) -> Vec3 {
    Vec3::new(radius * theta.sin(), y, radius * theta.cos())
}

/// Cylinder or cone centred on the origin, flat shaded per side.
fn frustum(top: f32, bottom: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let half = height / 2.0;
    let step = TAU / segments as f32;
    for i in 0..segments {
        let a = i as f32 * step;
        let b = a + step;
        let mid = a + step / 2.0;
        let slope = if height > 0.0 {
            (bottom - top) / height
        } else {
            0.0
        };
        let normal = Vec3::new(mid.sin(), slope, mid.cos()).normalize();
        mesh.push_quad(
            [
                around_y(bottom, a, -half),
                around_y(bottom, b, -half),
                around_y(top, b, half),
                around_y(top, a, half),
            ],
            normal,
        );
    }
    if top > 0.0 {
        let ring: Vec<Vec3> = (0..segments)
            .map(|i| around_y(top, i as f32 * step, half))
            .collect();
        mesh.push_fan(Vec3::new(0.0, half, 0.0), &ring, Vec3::Y);
    }
    if bottom > 0.0 {
        let ring: Vec<Vec3> = (0..segments)
            .rev()
            .map(|i| around_y(bottom, i as f32 * step, -half))
            .collect();
        mesh.push_fan(Vec3::new(0.0, -half, 0.0), &ring, Vec3::NEG_Y);
    }
    mesh
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let columns = width_segments + 1;
    for row in 0..=height_segments {
        let phi = row as f32 / height_segments as f32 * std::f32::consts::PI;
        for col in 0..=width_segments {
            let theta = col as f32 / width_segments as f32 * TAU;
            let normal = Vec3::new(
                phi.sin() * theta.sin(),
                phi.cos(),
                phi.sin() * theta.cos(),
            );
            mesh.vertices.push(Vertex::new(normal * radius, normal));
        }
    }
    for row in 0..height_segments {
        for col in 0..width_segments {
            let a = row * columns + col;
            let b = a + columns;
            mesh.indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(mesh: &MeshData) -> (Vec3, Vec3) {
        mesh.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec3::from_array(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    fn indices_in_range(mesh: &MeshData) -> bool {
        mesh.indices.len() % 3 == 0
            && mesh
                .indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertices.len())
    }

    #[test]
    fn cuboid_matches_size() {
        let mesh = tessellate(&Primitive::Cuboid {
            size: Vec3::new(4.0, 3.0, 4.0),
        });
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let (lo, hi) = bounds(&mesh);
        assert_eq!(lo, Vec3::new(-2.0, -1.5, -2.0));
        assert_eq!(hi, Vec3::new(2.0, 1.5, 2.0));
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn cuboid_normals_face_out() {
        let mesh = tessellate(&Primitive::Cuboid { size: Vec3::ONE });
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!(p.dot(n) > 0.0);
        }
    }

    #[test]
    fn disc_fan() {
        let mesh = tessellate(&Primitive::Disc {
            radius: 2.0,
            segments: 6,
        });
        assert_eq!(mesh.vertices.len(), 7);
        assert_eq!(mesh.indices.len(), 18);
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn four_sided_cone_has_no_top_cap() {
        let mesh = tessellate(&Primitive::Cone {
            radius: 3.0,
            height: 2.0,
            segments: 4,
        });
        // 4 side quads + bottom fan of 4.
        assert_eq!(mesh.indices.len(), 4 * 6 + 4 * 3);
        let (lo, hi) = bounds(&mesh);
        assert!((hi.y - 1.0).abs() < 1e-6 && (lo.y + 1.0).abs() < 1e-6);
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn sphere_vertices_on_radius() {
        let mesh = tessellate(&Primitive::Sphere {
            radius: 1.5,
            width_segments: 8,
            height_segments: 8,
        });
        assert_eq!(mesh.vertices.len(), 81);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 1.5).abs() < 1e-4);
        }
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn keys_distinguish_parameters() {
        let a = MeshKey::of(&Primitive::Disc {
            radius: 1.0,
            segments: 6,
        });
        let b = MeshKey::of(&Primitive::Disc {
            radius: 1.5,
            segments: 6,
        });
        let c = MeshKey::of(&Primitive::Plane {
            width: 1.0,
            height: 6.0,
        });
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(
            a,
            MeshKey::of(&Primitive::Disc {
                radius: 1.0,
                segments: 6
            })
        );
    }
}
