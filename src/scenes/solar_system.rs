use std::sync::Arc;

use glam::Vec3;

use super::common::axes;
use crate::geometry::{sphere_geometry, LineGeometry};
use crate::math::Color;
use crate::scene::{Light, LineMaterial, MeshMaterial, SceneNode};
use crate::traits::{SceneProvider, SceneSetup};

const AXIAL_TILT_DEGREES: f32 = 23.5;

/// Sun, earth and moon as a node hierarchy.
///
/// The system group turns at t/2, the sun on its own axis at t/4 and the
/// earth's orbit group at 2t, so the moon inherits all three rotations.
pub struct SolarSystemScene;

impl SceneProvider for SolarSystemScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        setup.camera.position = Vec3::new(10.0, 5.0, 20.0);
        setup.graph.add_light(Light::point(Color::WHITE, 2.0, Vec3::ZERO));
        setup.graph.add_light(Light::ambient(Color::from_hex(0x555555), 1.0));

        let root = setup.graph.root();
        axes(setup.graph, root, 15.0);

        let sphere = Arc::new(sphere_geometry(1.0, 20, 20));
        let sun_map = setup.texture("sun.png");
        let earth_map = setup.texture("earth.png");
        let moon_map = setup.texture("moon.png");

        let graph = &mut *setup.graph;
        let system = graph.add_to_root(SceneNode::group().named("solar_system"));

        let sun = graph.add(
            system,
            SceneNode::mesh(
                sphere.clone(),
                MeshMaterial::standard(Color::from_hex(0xffff00))
                    .emissive(Color::from_hex(0x555500), 2.0)
                    .emissive_map(sun_map),
            )
            .named("sun")
            .with_scale(Vec3::splat(3.0)),
        );

        let earth_orbit = graph.add(
            system,
            SceneNode::group()
                .named("earth_orbit")
                .at(10.0, 0.0, 0.0)
                .with_rotation(Vec3::new(0.0, 0.0, -AXIAL_TILT_DEGREES.to_radians())),
        );
        graph.add(
            earth_orbit,
            SceneNode::mesh(sphere.clone(), MeshMaterial::phong(Color::WHITE).map(earth_map))
                .named("earth"),
        );
        graph.add(
            earth_orbit,
            SceneNode::line(
                Arc::new(LineGeometry::strip(vec![
                    Vec3::new(0.0, -3.0, 0.0),
                    Vec3::new(0.0, 3.0, 0.0),
                ])),
                LineMaterial::new(Color::from_hex(0x00ff00)),
            )
            .named("earth_axis"),
        );

        let moon_orbit = graph.add(
            earth_orbit,
            SceneNode::group().named("moon_orbit").at(2.0, 0.0, 0.0),
        );
        graph.add(
            moon_orbit,
            SceneNode::mesh(sphere, MeshMaterial::phong(Color::WHITE).map(moon_map))
                .named("moon")
                .with_scale(Vec3::splat(0.5)),
        );

        setup.animations.spin(setup.graph, sun, Vec3::new(0.0, 0.25, 0.0));
        setup.animations.spin(setup.graph, system, Vec3::new(0.0, 0.5, 0.0));
        setup.animations.spin(setup.graph, earth_orbit, Vec3::new(0.0, 2.0, 0.0));
    }

    fn wants_controls(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "solar-system"
    }
}
