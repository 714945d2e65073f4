//! Torus surface tessellation.

use crate::vertex::Vertex;
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Triangulated surface: vertex buffer plus index buffer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// Position on the torus surface for ring angle `u` and tube angle `v`
pub fn torus_point(major_radius: f32, minor_radius: f32, u: f32, v: f32) -> Vec3 {
    let (sin_u, cos_u) = u.sin_cos();
    let (sin_v, cos_v) = v.sin_cos();
    let ring = major_radius + minor_radius * cos_v;
    Vec3::new(ring * cos_u, ring * sin_u, minor_radius * sin_v)
}

/// Unit outward normal of the torus surface at (`u`, `v`)
pub fn torus_normal(u: f32, v: f32) -> Vec3 {
    let (sin_u, cos_u) = u.sin_cos();
    let (sin_v, cos_v) = v.sin_cos();
    Vec3::new(cos_v * cos_u, cos_v * sin_u, sin_v)
}

/// Builds a torus mesh.
///
/// Produces `(radial_segments + 1) * (tubular_segments + 1)` vertices; the
/// seam vertices are duplicated so UVs run the full [0, 1] range. Every
/// quad is split into two triangles wound counter-clockwise when seen from
/// outside the surface.
///
/// Inputs are not validated: radii must be positive and segment counts at
/// least 3.
pub fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> Mesh {
    let columns = tubular_segments + 1;
    let mut vertices =
        Vec::with_capacity(((radial_segments + 1) * (tubular_segments + 1)) as usize);
    let mut indices = Vec::with_capacity((radial_segments * tubular_segments * 2) as usize);

    for i in 0..=radial_segments {
        let s = i as f32 / radial_segments as f32;
        let u = s * TAU;
        for j in 0..=tubular_segments {
            let t = j as f32 / tubular_segments as f32;
            let v = t * TAU;
            vertices.push(Vertex {
                position: torus_point(major_radius, minor_radius, u, v),
                normal: torus_normal(u, v),
                uv: Vec2::new(s, t),
            });
        }
    }

    for i in 0..radial_segments {
        for j in 0..tubular_segments {
            let a = i * columns + j;
            let b = (i + 1) * columns + j;
            let c = i * columns + j + 1;
            let d = (i + 1) * columns + j + 1;
            indices.push([a, b, d]);
            indices.push([a, d, c]);
        }
    }

    Mesh { vertices, indices }
}
