use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scene_viewer::geometry::*;
use scene_viewer::scenes::heart_shape;

fn primitives() -> Vec<(&'static str, Geometry)> {
    vec![
        ("box", box_geometry(1.0, 2.0, 3.0)),
        ("plane", plane_geometry(2.0, 1.0, 4, 2)),
        ("circle", circle_geometry(1.0, 24)),
        ("sphere", sphere_geometry(1.0, 16, 12)),
        ("cylinder", cylinder_geometry(0.5, 1.0, 2.0, 12, 3, false)),
        ("cone", cone_geometry(1.0, 2.0, 16, 1, false)),
        ("ring", ring_geometry(0.5, 1.0, 24, 2)),
        ("torus", torus_geometry(1.0, 0.3, 12, 32)),
        ("heart", shape_geometry(&heart_shape())),
        ("extrude", extrude_geometry(&heart_shape(), 2.0)),
        (
            "lathe",
            lathe_geometry(
                &[Vec2::new(0.5, -1.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)],
                16,
                0.0,
                TAU,
            ),
        ),
        ("tube", tube_geometry(|t| Vec3::new(t.cos(), t.sin(), t), 20, 0.2, 8, false)),
    ]
}

#[cfg(test)]
mod geometry_tests {
    use super::*;

    #[test]
    fn test_attribute_arrays_line_up() {
        for (name, mesh) in primitives() {
            assert_eq!(mesh.positions.len(), mesh.normals.len(), "{}", name);
            assert_eq!(mesh.positions.len(), mesh.uvs.len(), "{}", name);
            assert_eq!(mesh.indices.len() % 3, 0, "{}", name);
            assert!(mesh.triangle_count() > 0, "{} has no triangles", name);
        }
    }

    #[test]
    fn test_indices_in_range() {
        for (name, mesh) in primitives() {
            let count = mesh.vertex_count() as u32;
            assert!(mesh.indices.iter().all(|&i| i < count), "{} indexes past its vertices", name);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        for (name, mesh) in primitives() {
            for n in &mesh.normals {
                let length = Vec3::from_array(*n).length();
                assert!((length - 1.0).abs() < 1e-3, "{} normal has length {}", name, length);
            }
        }
    }

    #[test]
    fn test_box_extents() {
        let mesh = box_geometry(1.0, 2.0, 3.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let max = mesh
            .positions
            .iter()
            .fold(Vec3::splat(f32::MIN), |acc, p| acc.max(Vec3::from_array(*p)));
        assert_eq!(max, Vec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = sphere_geometry(2.5, 20, 20);
        for p in &mesh.positions {
            assert!((Vec3::from_array(*p).length() - 2.5).abs() < 1e-4);
        }
        assert!((mesh.bounding_radius() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_torus_tube_radius() {
        let mesh = torus_geometry(3.0, 1.0, 16, 100);
        for p in &mesh.positions {
            let p = Vec3::from_array(*p);
            let ring = Vec3::new(p.x, p.y, 0.0).normalize() * 3.0;
            assert!((p.distance(ring) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_box_wireframe_has_five_edges_per_face() {
        // Faces do not share vertices, so each quad contributes its 4 sides plus a diagonal
        let wire = LineGeometry::wireframe(&box_geometry(1.0, 1.0, 1.0));
        assert_eq!(wire.mode, LineMode::Segments);
        assert_eq!(wire.segment_count(), 30);
    }

    #[test]
    fn test_extruded_heart_depth() {
        let mesh = extrude_geometry(&heart_shape(), 5.0);
        let zs: Vec<f32> = mesh.positions.iter().map(|p| p[2]).collect();
        assert_eq!(zs.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(zs.iter().cloned().fold(f32::MIN, f32::max), 5.0);
    }

    #[test]
    fn test_half_lathe_stays_on_one_side() {
        let profile = [Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0)];
        let mesh = lathe_geometry(&profile, 12, 0.0, PI);
        assert!(mesh.positions.iter().all(|p| p[0] >= -1e-4));
    }

    #[test]
    fn test_seeded_scatter_is_reproducible() {
        let a = PointGeometry::scatter(100, 10.0, &mut StdRng::seed_from_u64(0x5eed));
        let b = PointGeometry::scatter(100, 10.0, &mut StdRng::seed_from_u64(0x5eed));
        assert_eq!(a, b);
    }
}
