use std::f32::consts::PI;

use glam::Vec3;

use super::common::{axes, key_light, outlined};
use crate::geometry::{
    box_segmented_geometry, circle_arc_geometry, cone_arc_geometry, cylinder_arc_geometry,
    plane_geometry, ring_arc_geometry, sphere_arc_geometry, torus_arc_geometry,
    torus_knot_geometry, ArcSpan, Geometry,
};
use crate::scene::SceneNode;
use crate::traits::{SceneProvider, SceneSetup};

const SPACING: f32 = 3.0;
const COLUMNS: usize = 3;

fn primitives() -> Vec<(&'static str, Geometry)> {
    let half = ArcSpan::new(0.0, PI);
    let quarter = ArcSpan::new(0.0, PI / 2.0);
    vec![
        ("box", box_segmented_geometry(1.0, 1.0, 1.0, 2, 2, 2)),
        ("circle", circle_arc_geometry(0.9, 20, ArcSpan::FULL)),
        ("cone", cone_arc_geometry(0.5, 1.5, 20, 3, false, ArcSpan::FULL)),
        ("cylinder", cylinder_arc_geometry(0.5, 0.5, 0.3, 20, 3, true, half)),
        ("sphere", sphere_arc_geometry(0.8, 20, 20, quarter, quarter)),
        ("ring", ring_arc_geometry(0.7, 1.2, 10, 2, half)),
        ("plane", plane_geometry(1.0, 2.0, 3, 2)),
        ("torus", torus_arc_geometry(1.0, 0.3, 10, 20, half)),
        ("torus-knot", torus_knot_geometry(0.6, 0.1, 64, 20, 2, 3)),
    ]
}

/// Every primitive constructor laid out on a grid, each with a wireframe overlay
pub struct GeometryScene;

impl SceneProvider for GeometryScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        setup.camera.position = Vec3::new(0.0, 0.0, 8.0);
        setup.graph.add_light(key_light());

        let root = setup.graph.root();
        axes(setup.graph, root, 6.0);

        let shapes = primitives();
        let rows = shapes.len().div_ceil(COLUMNS);
        for (i, (name, mesh)) in shapes.into_iter().enumerate() {
            let column = (i % COLUMNS) as f32 - (COLUMNS as f32 - 1.0) / 2.0;
            let row = (rows as f32 - 1.0) / 2.0 - (i / COLUMNS) as f32;
            let group = SceneNode::group()
                .named(name)
                .at(column * SPACING, row * SPACING, 0.0);
            let id = outlined(setup.graph, root, group, mesh);
            setup.animations.spin(setup.graph, id, Vec3::new(0.3, 0.5, 0.0));
        }
    }

    fn wants_controls(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "geometry"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_primitive_has_triangles() {
        for (name, mesh) in primitives() {
            assert!(mesh.triangle_count() > 0, "{} is empty", name);
        }
    }

    #[test]
    fn test_grid_uses_partial_sweeps() {
        let shapes = primitives();
        let mesh = |name: &str| &shapes.iter().find(|(n, _)| *n == name).unwrap().1;

        assert_eq!(mesh("box").triangle_count(), 6 * 8);
        assert_eq!(mesh("torus").triangle_count(), 10 * 20 * 2);
        let lowest = mesh("ring").positions.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
        assert!(lowest > -1e-5, "half ring stays above the X axis");
    }
}
