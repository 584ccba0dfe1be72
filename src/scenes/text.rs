use glam::Vec3;

use super::common::{key_light, outlined};
use crate::geometry::{text_geometry, Bevel, TextOptions};
use crate::scene::SceneNode;
use crate::traits::{SceneProvider, SceneSetup};

/// Font shipped under the asset directory
pub const FONT_PATH: &str = "fonts/DejaVuSansMono-Bold.ttf";

pub const TEXT: &str = "HELLO";

/// Five units tall, 1.5 deep, with a two-step rounded bevel
pub fn text_options() -> TextOptions {
    TextOptions {
        size: 5.0,
        depth: 1.5,
        curve_segments: 4,
        bevel: Some(Bevel {
            thickness: 0.7,
            size: 0.7,
            segments: 2,
        }),
    }
}

/// Extruded text with its wireframe, added once the font has loaded
pub struct TextScene;

impl SceneProvider for TextScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        setup.camera.position = Vec3::new(-10.0, 0.0, 15.0);
        setup.graph.add_light(key_light());

        let root = setup.graph.root();
        let pending = setup.loader.load_font(FONT_PATH);
        setup.assets.insert_with_font(pending, root, |font, graph, parent| {
            let mesh = text_geometry(font, TEXT, &text_options());
            outlined(graph, parent, SceneNode::group().named("text"), mesh)
        });
    }

    fn wants_controls(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "text"
    }
}
