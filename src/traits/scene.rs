use std::path::Path;

use crate::camera::PerspectiveCamera;
use crate::loaders::{AssetLoader, AssetQueue};
use crate::math::Color;
use crate::scene::{Animations, SceneGraph, TextureId};

/// Mutable view of a freshly created viewer handed to scene builders
pub struct SceneSetup<'a> {
    pub graph: &'a mut SceneGraph,
    pub camera: &'a mut PerspectiveCamera,
    pub animations: &'a mut Animations,
    pub assets: &'a mut AssetQueue,
    pub loader: &'a AssetLoader,
}

impl SceneSetup<'_> {
    /// Texture slot that fills in once `path` has loaded
    pub fn texture(&mut self, path: impl AsRef<Path>) -> TextureId {
        self.assets.texture(self.graph, self.loader, path)
    }
}

/// Scene construction and modification abstraction
pub trait SceneProvider {
    /// Populate the graph, place the camera and register animations
    fn build(&self, setup: &mut SceneSetup<'_>);

    /// Extra time-driven changes beyond registered animations; must depend only on `elapsed`
    fn update(&self, _graph: &mut SceneGraph, _elapsed: f32) {}

    /// Whether orbit controls suit this scene
    fn wants_controls(&self) -> bool {
        false
    }

    fn clear_color(&self) -> Option<Color> {
        None
    }

    /// Get scene name for debugging
    fn name(&self) -> &str {
        "Scene"
    }
}
