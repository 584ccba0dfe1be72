use std::sync::Arc;

use glam::Vec3;

use super::common::key_light;
use crate::geometry::{plane_geometry, sphere_geometry};
use crate::math::Color;
use crate::scene::{Drawable, Light, MeshMaterial, SceneGraph, SceneNode, Shading, Side};
use crate::traits::{SceneProvider, SceneSetup};

const GLOW: &str = "glow";

/// Emissive intensity of the glowing sphere at `elapsed` seconds
pub fn glow_intensity(elapsed: f32) -> f32 {
    0.75 + 0.75 * (elapsed * 2.0).sin()
}

/// A row of spheres, one per material kind, and an image plane that appears
/// once its texture has loaded
pub struct MaterialsScene;

impl SceneProvider for MaterialsScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        setup.camera.position = Vec3::new(0.0, 1.0, 9.0);
        setup.graph.add_light(Light::ambient(Color::from_hex(0x404040), 1.0));
        setup.graph.add_light(key_light());
        setup.graph.add_light(
            Light::point(Color::from_hex(0xffeedd), 1.5, Vec3::new(0.0, 3.0, 3.0))
                .with_range(12.0, 2.0),
        );

        let checker = setup.texture("checker.png");
        let base = Color::from_hex(0x2194ce);
        let materials = [
            ("basic", MeshMaterial::basic(base)),
            ("phong", MeshMaterial::phong(base)),
            (
                "standard",
                MeshMaterial::standard(base).shading(Shading::Standard {
                    roughness: 0.4,
                    metalness: 0.6,
                }),
            ),
            ("transparent", MeshMaterial::phong(base).transparent(0.4).side(Side::Double)),
            (GLOW, MeshMaterial::standard(Color::BLACK).emissive(Color::from_hex(0xff4400), 1.0)),
            ("textured", MeshMaterial::phong(Color::WHITE).map(checker)),
        ];

        let sphere = Arc::new(sphere_geometry(0.6, 32, 16));
        let spacing = 1.5;
        let offset = (materials.len() as f32 - 1.0) * spacing / 2.0;
        for (i, (name, material)) in materials.into_iter().enumerate() {
            let node = setup.graph.add_to_root(
                SceneNode::mesh(sphere.clone(), material)
                    .named(name)
                    .at(i as f32 * spacing - offset, 1.0, 0.0),
            );
            setup.animations.spin(setup.graph, node, Vec3::new(0.0, 0.5, 0.0));
        }

        let root = setup.graph.root();
        let pending = setup.loader.load_texture("checker.png");
        setup.assets.insert_when_ready(pending, root, |texture, image| {
            let height = 2.0;
            SceneNode::mesh(
                Arc::new(plane_geometry(height * image.aspect(), height, 1, 1)),
                MeshMaterial::basic(Color::WHITE).map(texture).side(Side::Double),
            )
            .named("image")
            .at(0.0, -1.5, 0.0)
        });
    }

    fn update(&self, graph: &mut SceneGraph, elapsed: f32) {
        let Some(id) = graph.find(GLOW) else {
            return;
        };
        if let Some(Drawable::Mesh { material, .. }) =
            graph.get_mut(id).and_then(|node| node.drawable.as_mut())
        {
            material.emissive_intensity = glow_intensity(elapsed);
        }
    }

    fn wants_controls(&self) -> bool {
        true
    }

    fn clear_color(&self) -> Option<Color> {
        Some(Color::from_hex(0x202020))
    }

    fn name(&self) -> &str {
        "materials"
    }
}
