use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec3;

use crate::geometry::LineGeometry;
use crate::math::Color;
use crate::scene::{LineMaterial, SceneNode};
use crate::traits::{SceneProvider, SceneSetup};

fn sine_wave(samples: usize) -> Vec<Vec3> {
    (0..=samples)
        .map(|i| {
            let t = i as f32 / samples as f32;
            Vec3::new(t * 4.0 - 2.0, (t * TAU * 2.0).sin() * 0.5, 0.0)
        })
        .collect()
}

fn polygon(sides: usize, radius: f32) -> Vec<Vec3> {
    (0..sides)
        .map(|i| {
            let angle = i as f32 / sides as f32 * TAU;
            Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
        })
        .collect()
}

fn spiral(turns: f32, samples: usize) -> Vec<Vec3> {
    (0..=samples)
        .map(|i| {
            let t = i as f32 / samples as f32;
            let angle = t * turns * TAU;
            let radius = 0.2 + t;
            Vec3::new(angle.cos() * radius, t * 2.0 - 1.0, angle.sin() * radius)
        })
        .collect()
}

/// Line strip, nested closed polygons and a dashed spiral
pub struct LinesScene;

impl SceneProvider for LinesScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        setup.camera.position = Vec3::new(0.0, 0.0, 6.0);

        let graph = &mut *setup.graph;
        graph.add_to_root(
            SceneNode::line(
                Arc::new(LineGeometry::strip(sine_wave(64))),
                LineMaterial::new(Color::from_hex(0xffff00)),
            )
            .named("wave")
            .at(0.0, 1.5, 0.0),
        );

        let mut polygons = Vec::new();
        for (i, sides) in (3..=8).enumerate() {
            let hue = i as f32 / 6.0;
            let id = graph.add_to_root(
                SceneNode::line(
                    Arc::new(LineGeometry::closed(polygon(sides, 0.3 + 0.15 * i as f32))),
                    LineMaterial::new(Color::from_hsv(hue, 0.8, 1.0)),
                )
                .named(format!("polygon_{}", sides))
                .at(-1.8, -1.0, 0.0),
            );
            polygons.push((id, 0.2 + 0.1 * i as f32));
        }

        let helix = graph.add_to_root(
            SceneNode::line(
                Arc::new(LineGeometry::strip(spiral(4.0, 256))),
                LineMaterial::dashed(Color::from_hex(0xff00ff), 0.1, 0.05, 1.0),
            )
            .named("spiral")
            .at(1.8, -1.0, 0.0),
        );

        for (id, rate) in polygons {
            setup.animations.spin(setup.graph, id, Vec3::new(0.0, 0.0, rate));
        }
        setup.animations.spin(setup.graph, helix, Vec3::new(0.0, 0.8, 0.0));
    }

    fn wants_controls(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "lines"
    }
}
