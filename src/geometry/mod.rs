//! Shape descriptions for scene nodes
//!
//! Mesh geometry is plain indexed triangle data with per-vertex normals and UVs,
//! generated on the CPU. The renderer uploads it once per node.

mod lines;
mod primitives;
mod shape;
mod sweep;
mod text;

use std::collections::HashSet;

use glam::Vec3;

pub use lines::{LineGeometry, LineMode, PointGeometry};
pub use primitives::{
    box_geometry, box_segmented_geometry, circle_arc_geometry, circle_geometry,
    cone_arc_geometry, cone_geometry, cylinder_arc_geometry, cylinder_geometry, plane_geometry,
    ring_arc_geometry, ring_geometry, sphere_arc_geometry, sphere_geometry, torus_arc_geometry,
    torus_geometry, ArcSpan,
};
pub use shape::{
    extrude_geometry, extrude_shape, shape_geometry, Bevel, ExtrudeOptions, Shape, ShapePath,
};
pub use sweep::{lathe_geometry, torus_knot_geometry, tube_geometry};
pub use text::{text_geometry, Font, TextOptions};

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Merge another mesh into this one, offsetting indices
    pub fn merge(&mut self, other: &Geometry) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Smooth normals accumulated from adjacent faces
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = Vec3::from_array(self.positions[i0]);
            let p1 = Vec3::from_array(self.positions[i1]);
            let p2 = Vec3::from_array(self.positions[i2]);
            let normal = (p1 - p0).cross(p2 - p0);
            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }

        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
    }

    /// Unique triangle edges as a line list, used to draw wireframes
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();

        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.extend_from_slice(&[a, b]);
                }
            }
        }

        edges
    }

    /// Distance from the local origin to the farthest vertex
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| Vec3::from_array(*p).length())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> Geometry {
        let mut g = Geometry::default();
        let a = g.push_vertex(Vec3::ZERO, Vec3::ZERO, [0.0, 0.0]);
        let b = g.push_vertex(Vec3::X, Vec3::ZERO, [1.0, 0.0]);
        let c = g.push_vertex(Vec3::Y, Vec3::ZERO, [0.0, 1.0]);
        g.push_triangle(a, b, c);
        g
    }

    #[test]
    fn test_counts() {
        let g = single_triangle();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.triangle_count(), 1);
    }

    #[test]
    fn test_compute_normals_ccw_faces_z() {
        let mut g = single_triangle();
        g.compute_normals();
        for n in &g.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = single_triangle();
        let b = single_triangle();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(&a.indices[3..], &[3, 4, 5]);
    }

    #[test]
    fn test_edge_indices_shared_edge_once() {
        let mut g = single_triangle();
        let d = g.push_vertex(Vec3::new(1.0, 1.0, 0.0), Vec3::Z, [1.0, 1.0]);
        g.push_triangle(1, d, 2);
        // 2 triangles sharing edge 1-2: 5 unique edges
        assert_eq!(g.edge_indices().len(), 10);
    }

    #[test]
    fn test_bounding_radius() {
        let g = single_triangle();
        assert!((g.bounding_radius() - 1.0).abs() < 1e-6);
    }
}
