use std::sync::Arc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::geometry::PointGeometry;
use crate::math::Color;
use crate::scene::{PointsMaterial, SceneNode};
use crate::traits::{SceneProvider, SceneSetup};

const COUNT: usize = 10_000;
const SPREAD: f32 = 10.0;
const SEED: u64 = 0x5eed;

/// A slowly turning cube of random sprite particles
pub struct PointsScene;

impl SceneProvider for PointsScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        setup.camera.position = Vec3::new(0.0, 0.0, 7.0);

        let sprite = setup.texture("disc.png");
        let mut rng = StdRng::seed_from_u64(SEED);
        let cloud = PointGeometry::scatter(COUNT, SPREAD, &mut rng);

        let points = setup.graph.add_to_root(
            SceneNode::points(
                Arc::new(cloud),
                PointsMaterial::new(Color::from_hex(0xffaa00), 0.1).sprite(sprite, 0.5),
            )
            .named("particles"),
        );
        setup.animations.spin(setup.graph, points, Vec3::new(0.0, 0.2, 0.0));
    }

    fn wants_controls(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "points"
    }
}
