pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod error;
pub mod geometry;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod traits;
pub mod viewer;

pub use camera::PerspectiveCamera;
pub use config::ViewerConfig;
pub use controls::OrbitControls;
pub use error::{AssetError, ViewerError};
pub use traits::{FrameScene, SceneProvider, SceneRenderer, SceneSetup, SurfaceSize};
pub use viewer::Viewer;
