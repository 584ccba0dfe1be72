use winit::event::WindowEvent;

use crate::camera::PerspectiveCamera;
use crate::controls::{OrbitControls, OrbitInput};
use crate::config::ViewerConfig;
use crate::core::input_adapter::WinitController;
use crate::error::{AssetError, Result};
use crate::loaders::{AssetLoader, AssetQueue};
use crate::math::Color;
use crate::scene::{Animations, SceneGraph};
use crate::traits::{FrameScene, SceneProvider, SceneRenderer, SceneSetup, SurfaceSize};

/// Owns the render surface, scene graph, camera and controls, and runs one
/// render/update alternation per frame.
pub struct Viewer<R: SceneRenderer> {
    renderer: R,
    config: ViewerConfig,
    size: SurfaceSize,
    camera: PerspectiveCamera,
    graph: SceneGraph,
    animations: Animations,
    assets: AssetQueue,
    loader: AssetLoader,
    controls: Option<OrbitControls>,
    input: WinitController,
    scene: Box<dyn SceneProvider>,
    clear_color: Color,
    elapsed: f32,
}

impl<R: SceneRenderer> Viewer<R> {
    /// Create the render surface with `create_renderer` and populate the scene.
    ///
    /// The only fatal error is a renderer that cannot be created. The camera
    /// aspect is set from `size` before returning.
    pub fn initialize<F>(
        size: SurfaceSize,
        config: ViewerConfig,
        scene: Box<dyn SceneProvider>,
        create_renderer: F,
    ) -> Result<Self>
    where
        F: FnOnce(SurfaceSize, &ViewerConfig) -> Result<R>,
    {
        config.validate()?;
        let renderer = create_renderer(size, &config)?;

        let camera = PerspectiveCamera::new(
            config.fov_degrees,
            size.aspect(),
            config.near,
            config.far,
        );
        let loader = AssetLoader::new(config.asset_dir.clone());
        let clear_color = scene.clear_color().unwrap_or(config.clear_color);

        let mut viewer = Self {
            renderer,
            size,
            camera,
            graph: SceneGraph::new(),
            animations: Animations::new(),
            assets: AssetQueue::new(),
            loader,
            controls: None,
            input: WinitController::new(),
            scene,
            clear_color,
            elapsed: 0.0,
            config,
        };

        viewer.scene.build(&mut SceneSetup {
            graph: &mut viewer.graph,
            camera: &mut viewer.camera,
            animations: &mut viewer.animations,
            assets: &mut viewer.assets,
            loader: &viewer.loader,
        });

        if viewer.config.controls.unwrap_or_else(|| viewer.scene.wants_controls()) {
            viewer.attach_controls();
        }

        viewer.apply_size(size);
        viewer.update(0.0);

        log::info!(
            "Scene '{}' ready: {} nodes, {} lights, {} pending assets",
            viewer.scene.name(),
            viewer.graph.node_count(),
            viewer.graph.lights().len(),
            viewer.assets.pending_count()
        );

        Ok(viewer)
    }

    /// Enable orbit controls around the camera's current target
    pub fn attach_controls(&mut self) -> &mut OrbitControls {
        self.controls.get_or_insert_with(|| {
            log::debug!("Orbit controls attached");
            OrbitControls::new()
        })
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.controls.as_ref()
    }

    /// New container size in logical pixels; zero-sized containers are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized resize {}x{}", width, height);
            return;
        }
        self.apply_size(SurfaceSize::new(width, height).with_pixel_ratio(self.size.pixel_ratio));
    }

    /// New window size in physical pixels, passed to the renderer unchanged
    pub fn resize_physical(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized resize {}x{}", width, height);
            return;
        }
        if pixel_ratio.is_nan() || pixel_ratio <= 0.0 {
            log::warn!("Ignoring invalid pixel ratio {}", pixel_ratio);
            return;
        }
        self.apply_size(SurfaceSize::from_physical(width, height, pixel_ratio));
    }

    /// Device pixel ratio; changes the backing store but not the aspect
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        if pixel_ratio.is_nan() || pixel_ratio <= 0.0 {
            log::warn!("Ignoring invalid pixel ratio {}", pixel_ratio);
            return;
        }
        self.size = self.size.with_pixel_ratio(pixel_ratio);
        let (physical_width, physical_height) = self.size.physical();
        self.renderer.resize(physical_width, physical_height);
    }

    fn apply_size(&mut self, size: SurfaceSize) {
        self.size = size;
        if size.is_empty() {
            return;
        }
        let (physical_width, physical_height) = size.physical();
        self.camera.set_aspect(physical_width, physical_height);
        self.renderer.resize(physical_width, physical_height);
    }

    /// Feed a window event to the controls' input state
    pub fn handle_input(&mut self, event: &WindowEvent) {
        if self.controls.is_some() {
            self.input.process_event(event);
        }
    }

    pub fn input_mut(&mut self) -> &mut WinitController {
        &mut self.input
    }

    /// Move the camera by the input gathered since the last frame
    pub fn apply_controls(&mut self) {
        if let Some(controls) = &self.controls {
            let input = OrbitInput::from_controller(&self.input);
            let viewport_height = self.size.physical().1 as f32;
            controls.update(&mut self.camera, input, viewport_height);
        }
        self.input.reset_deltas();
    }

    /// Set node transforms for `elapsed` seconds since start
    pub fn update(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
        self.animations.apply(&mut self.graph, elapsed);
        self.scene.update(&mut self.graph, elapsed);
    }

    /// Move finished background loads into the scene graph
    pub fn apply_assets(&mut self) -> usize {
        self.assets.apply(&mut self.graph)
    }

    /// Draw the current state; failures are logged and the next frame tries again
    pub fn render_frame(&mut self) {
        let frame = FrameScene {
            graph: &self.graph,
            camera: &self.camera,
            clear_color: self.clear_color,
        };
        if let Err(e) = self.renderer.render(&frame) {
            log::warn!("Frame skipped: {}", e);
        }
    }

    /// One loop iteration: render, then mutate for the next frame
    pub fn frame(&mut self, elapsed: f32) {
        self.apply_controls();
        self.render_frame();
        self.apply_assets();
        self.update(elapsed);
    }

    pub fn on_asset_error(&mut self, hook: impl FnMut(&str, &AssetError) + 'static) {
        self.assets.on_error(hook);
    }

    /// Release the surface; loads still in flight finish into the void
    pub fn teardown(self) {
        let pending = self.assets.pending_count();
        if pending > 0 {
            log::info!("Tearing down with {} asset loads in flight", pending);
        }
        drop(self);
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn assets_mut(&mut self) -> &mut AssetQueue {
        &mut self.assets
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn scene_name(&self) -> &str {
        self.scene.name()
    }
}
