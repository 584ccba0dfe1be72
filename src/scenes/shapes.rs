use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::common::{key_light, outlined};
use crate::geometry::{extrude_geometry, lathe_geometry, shape_geometry, tube_geometry, Shape};
use crate::scene::SceneNode;
use crate::traits::{SceneProvider, SceneSetup};

/// Heart outline about 11 units wide, drawn with six cubic curves
pub fn heart_shape() -> Shape {
    let (x, y) = (-2.5, -5.0);
    let mut shape = Shape::new();
    shape
        .move_to(x + 2.5, y + 2.5)
        .bezier_curve_to(x + 2.5, y + 2.5, x + 2.0, y, x, y)
        .bezier_curve_to(x - 3.0, y, x - 3.0, y + 3.5, x - 3.0, y + 3.5)
        .bezier_curve_to(x - 3.0, y + 5.5, x - 1.5, y + 7.7, x + 2.5, y + 9.5)
        .bezier_curve_to(x + 6.0, y + 7.7, x + 8.0, y + 4.5, x + 8.0, y + 3.5)
        .bezier_curve_to(x + 8.0, y + 3.5, x + 8.0, y, x + 5.0, y)
        .bezier_curve_to(x + 3.5, y, x + 2.5, y + 2.5, x + 2.5, y + 2.5);
    shape
}

/// Vase-like profile for the lathe
fn lathe_profile() -> Vec<Vec2> {
    (0..10)
        .map(|i| Vec2::new((i as f32 * 0.2).sin() * 3.0 + 3.0, (i as f32 - 5.0) * 0.8))
        .collect()
}

/// One period of a sine wave, scaled by 4
fn sine_curve(t: f32) -> Vec3 {
    Vec3::new(t * 3.0 - 1.5, (TAU * t).sin(), 0.0) * 4.0
}

/// Filled heart, extruded heart, half lathe and sine tube on a 2x2 grid
pub struct ShapesScene;

impl SceneProvider for ShapesScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        setup.camera.position = Vec3::new(-10.0, 0.0, 30.0);
        setup.graph.add_light(key_light());

        let heart = heart_shape();
        let meshes = [
            ("heart", shape_geometry(&heart)),
            ("extrude", extrude_geometry(&heart, 5.0)),
            ("lathe", lathe_geometry(&lathe_profile(), 20, 0.0, PI)),
            ("tube", tube_geometry(sine_curve, 30, 0.5, 20, true)),
        ];

        let root = setup.graph.root();
        for (i, (name, mesh)) in meshes.into_iter().enumerate() {
            let x = if i % 2 == 0 { -8.0 } else { 8.0 };
            let y = if i < 2 { 7.0 } else { -7.0 };
            let group = SceneNode::group().named(name).at(x, y, 0.0);
            let id = outlined(setup.graph, root, group, mesh);
            setup.animations.spin(setup.graph, id, Vec3::new(0.0, 0.4, 0.0));
        }
    }

    fn wants_controls(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "shapes"
    }
}
