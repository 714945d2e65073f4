//! Tests for torus tessellation: counts, determinism, geometry, and winding.

use glam::Vec3;
use std::f32::consts::TAU;
use torusflow::mesh::{generate_torus, torus_normal, torus_point, Mesh};

fn triangle_positions(mesh: &Mesh, tri: [u32; 3]) -> [Vec3; 3] {
    tri.map(|i| mesh.vertices[i as usize].position)
}

mod counts {
    use super::*;

    #[test]
    fn default_settings_yield_1681_vertices_and_3200_triangles() {
        let mesh = generate_torus(1.0, 1.0, 40, 40);
        assert_eq!(mesh.vertex_count(), 1681);
        assert_eq!(mesh.triangle_count(), 3200);
    }

    #[test]
    fn lowest_tessellation_yields_16_vertices_and_18_triangles() {
        let mesh = generate_torus(1.0, 1.0, 3, 3);
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 18);
    }

    #[test]
    fn counts_follow_segment_formula() {
        for (radial, tubular) in [(3, 100), (100, 3), (7, 11), (100, 100)] {
            let mesh = generate_torus(2.0, 0.5, radial, tubular);
            assert_eq!(
                mesh.vertex_count(),
                ((radial + 1) * (tubular + 1)) as usize
            );
            assert_eq!(mesh.triangle_count(), (radial * tubular * 2) as usize);
        }
    }

    #[test]
    fn indices_stay_in_bounds() {
        let mesh = generate_torus(2.0, 0.5, 9, 5);
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().flatten().all(|&i| i < count));
    }
}

mod geometry {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = generate_torus(1.7, 0.3, 24, 13);
        let b = generate_torus(1.7, 0.3, 24, 13);
        assert_eq!(a, b);
    }

    #[test]
    fn positions_follow_parametrization() {
        let (major, minor) = (2.0, 0.75);
        let mesh = generate_torus(major, minor, 8, 6);
        for vertex in &mesh.vertices {
            let expected = torus_point(major, minor, vertex.uv.x * TAU, vertex.uv.y * TAU);
            assert!((vertex.position - expected).length() < 1e-5);
        }
        // u = v = 0 lies on the outer equator
        assert!((mesh.vertices[0].position - Vec3::new(major + minor, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn normals_are_unit_and_analytic() {
        let mesh = generate_torus(1.5, 0.5, 12, 12);
        for vertex in &mesh.vertices {
            assert!((vertex.normal.length() - 1.0).abs() < 1e-5);
            let expected = torus_normal(vertex.uv.x * TAU, vertex.uv.y * TAU);
            assert!((vertex.normal - expected).length() < 1e-5);
        }
    }

    #[test]
    fn uvs_cover_unit_square() {
        let mesh = generate_torus(1.0, 0.5, 5, 4);
        let first = mesh.vertices.first().unwrap().uv;
        let last = mesh.vertices.last().unwrap().uv;
        assert_eq!(first.to_array(), [0.0, 0.0]);
        assert_eq!(last.to_array(), [1.0, 1.0]);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (0.0..=1.0).contains(&v.uv.x) && (0.0..=1.0).contains(&v.uv.y)));
    }

    #[test]
    fn seam_vertices_coincide() {
        let (radial, tubular) = (6, 4);
        let mesh = generate_torus(2.0, 0.5, radial, tubular);
        let columns = (tubular + 1) as usize;
        for j in 0..columns {
            let start = mesh.vertices[j].position;
            let end = mesh.vertices[radial as usize * columns + j].position;
            assert!((start - end).length() < 1e-5);
        }
    }

    #[test]
    fn lowest_tessellation_has_no_degenerate_triangles() {
        let mesh = generate_torus(1.0, 1.0, 3, 3);
        for &tri in &mesh.indices {
            let [a, b, c] = triangle_positions(&mesh, tri);
            let area = (b - a).cross(c - a).length() * 0.5;
            assert!(area > 1e-3, "zero-area triangle {:?}", tri);
        }
    }

    #[test]
    fn triangles_wind_outward() {
        let mesh = generate_torus(2.0, 0.5, 16, 12);
        for &tri in &mesh.indices {
            let [a, b, c] = triangle_positions(&mesh, tri);
            let face_normal = (b - a).cross(c - a);
            let vertex_normal = mesh.vertices[tri[0] as usize].normal;
            assert!(face_normal.dot(vertex_normal) > 0.0, "inward triangle {:?}", tri);
        }
    }
}
