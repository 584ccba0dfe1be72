use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use scene_viewer::cli::Cli;
use scene_viewer::config::ViewerConfig;
use scene_viewer::core::{Button, FrameClock, WinitController};
use scene_viewer::renderer::WgpuRenderer;
use scene_viewer::scenes::{scene_by_name, SCENE_NAMES};
use scene_viewer::traits::SurfaceSize;
use scene_viewer::viewer::Viewer;

// === Application ===

struct App {
    cli: Cli,
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    viewer: Option<Viewer<WgpuRenderer>>,
    clock: FrameClock,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, config: ViewerConfig) -> Self {
        Self {
            cli,
            config,
            window: None,
            viewer: None,
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn create_viewer(&self, window: &Arc<Window>) -> anyhow::Result<Viewer<WgpuRenderer>> {
        let scene = scene_by_name(&self.cli.scene)
            .with_context(|| format!("Unknown scene '{}'", self.cli.scene))?;

        let physical = window.inner_size();
        let size = SurfaceSize::from_physical(
            physical.width,
            physical.height,
            window.scale_factor() as f32,
        );

        let mut viewer = Viewer::initialize(size, self.config.clone(), scene, |size, config| {
            pollster::block_on(WgpuRenderer::new(window.clone(), size.physical(), config))
        })
        .context("Failed to initialize viewer")?;

        viewer.on_asset_error(|label, err| {
            log::error!("Asset '{}' unavailable, rendering without it: {}", label, err);
        });
        Ok(viewer)
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(viewer) = self.viewer.take() {
            viewer.teardown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(format!("Scene Viewer - {}", self.cli.scene))
                .with_inner_size(LogicalSize::new(self.cli.width, self.cli.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.error = Some(anyhow::Error::new(e).context("Failed to create window"));
                event_loop.exit();
                return;
            }
        };

        match self.create_viewer(&window) {
            Ok(viewer) => {
                self.viewer = Some(viewer);
                self.clock = FrameClock::new();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(viewer) = &mut self.viewer {
            viewer.handle_input(&event);
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } if WinitController::button_for_key(code) == Some(Button::Escape) => {
                self.shutdown(event_loop)
            }
            WindowEvent::Resized(physical) => {
                if let (Some(viewer), Some(window)) = (&mut self.viewer, &self.window) {
                    let scale_factor = window.scale_factor() as f32;
                    viewer.resize_physical(physical.width, physical.height, scale_factor);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let (Some(viewer), Some(window)) = (&mut self.viewer, &self.window) {
                    let physical = window.inner_size();
                    viewer.resize_physical(physical.width, physical.height, scale_factor as f32);
                }
            }
            WindowEvent::RedrawRequested => {
                let frame = self.clock.tick();
                if let Some(viewer) = &mut self.viewer {
                    viewer.frame(frame.elapsed);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.list_scenes {
        for name in SCENE_NAMES {
            println!("{}", name);
        }
        return Ok(());
    }
    if scene_by_name(&cli.scene).is_none() {
        anyhow::bail!(
            "Unknown scene '{}', expected one of: {}",
            cli.scene,
            SCENE_NAMES.join(", ")
        );
    }

    let config = cli.viewer_config().context("Failed to load viewer config")?;
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(cli, config);

    log::info!("Controls: drag to orbit, right drag to pan, wheel to zoom, Escape to quit");
    event_loop.run_app(&mut app).context("Event loop failed")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
