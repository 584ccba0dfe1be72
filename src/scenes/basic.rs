use std::sync::Arc;

use glam::Vec3;

use super::common::key_light;
use crate::geometry::box_geometry;
use crate::math::Color;
use crate::scene::{MeshMaterial, SceneNode};
use crate::traits::{SceneProvider, SceneSetup};

/// A single Phong cube turning about X and Y at one radian per second
pub struct BasicScene;

impl SceneProvider for BasicScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        setup.camera.position = Vec3::new(0.0, 0.0, 2.0);
        setup.graph.add_light(key_light());

        let cube = setup.graph.add_to_root(
            SceneNode::mesh(
                Arc::new(box_geometry(1.0, 1.0, 1.0)),
                MeshMaterial::phong(Color::from_hex(0x44aa88)),
            )
            .named("cube"),
        );
        setup.animations.spin(setup.graph, cube, Vec3::new(1.0, 1.0, 0.0));
    }

    fn name(&self) -> &str {
        "basic"
    }
}
