use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use scene_viewer::core::Button;
use scene_viewer::error::{AssetError, Result, ViewerError};
use scene_viewer::geometry::{box_geometry, plane_geometry};
use scene_viewer::loaders::PendingAsset;
use scene_viewer::math::Color;
use scene_viewer::scene::{MeshMaterial, SceneNode, TextureData, TextureState};
use scene_viewer::scenes::{scene_by_name, TextScene, FONT_PATH, SCENE_NAMES};
use scene_viewer::{
    FrameScene, SceneProvider, SceneRenderer, SceneSetup, SurfaceSize, Viewer, ViewerConfig,
};

// Mock renderer recording what the viewer asks of it
struct MockRenderer {
    size: (u32, u32),
    resizes: Vec<(u32, u32)>,
    frames: usize,
    drawn_nodes: usize,
    fail: bool,
}

impl MockRenderer {
    fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            resizes: Vec::new(),
            frames: 0,
            drawn_nodes: 0,
            fail: false,
        }
    }
}

impl SceneRenderer for MockRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.resizes.push((width, height));
    }

    fn render(&mut self, frame: &FrameScene<'_>) -> Result<()> {
        self.frames += 1;
        self.drawn_nodes = frame.graph.draw_list().len();
        if self.fail {
            return Err(ViewerError::Render(wgpu::SurfaceError::Timeout));
        }
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

// One cube spinning about Y at one radian per second
struct SpinScene {
    texture: Option<&'static str>,
    controls: bool,
}

impl SceneProvider for SpinScene {
    fn build(&self, setup: &mut SceneSetup<'_>) {
        let mut material = MeshMaterial::phong(Color::from_hex(0x44aa88));
        if let Some(path) = self.texture {
            material = material.map(setup.texture(path));
        }
        let cube = setup.graph.add_to_root(
            SceneNode::mesh(Arc::new(box_geometry(1.0, 1.0, 1.0)), material).named("cube"),
        );
        setup.animations.spin(setup.graph, cube, Vec3::new(0.0, 1.0, 0.0));
    }

    fn wants_controls(&self) -> bool {
        self.controls
    }

    fn name(&self) -> &str {
        "spin"
    }
}

fn config() -> ViewerConfig {
    ViewerConfig {
        asset_dir: std::env::temp_dir().join("scene-viewer-missing-assets"),
        ..ViewerConfig::default()
    }
}

fn viewer_with(scene: SpinScene, size: SurfaceSize) -> Viewer<MockRenderer> {
    Viewer::initialize(size, config(), Box::new(scene), |size, _| {
        Ok(MockRenderer::new(size.physical()))
    })
    .unwrap()
}

fn spin_viewer() -> Viewer<MockRenderer> {
    viewer_with(
        SpinScene {
            texture: None,
            controls: false,
        },
        SurfaceSize::new(800, 600),
    )
}

fn cube_rotation(viewer: &Viewer<MockRenderer>) -> Vec3 {
    let id = viewer.graph().find("cube").unwrap();
    viewer.graph().get(id).unwrap().transform.rotation
}

#[cfg(test)]
mod viewer_tests {
    use super::*;

    #[test]
    fn test_initialize_sets_aspect_from_container() {
        let viewer = spin_viewer();
        assert_relative_eq!(viewer.camera().aspect, 800.0 / 600.0);
        assert_relative_eq!(viewer.camera().fov_degrees, 75.0);
        assert_relative_eq!(viewer.camera().near, 0.1);
        assert_relative_eq!(viewer.camera().far, 100.0);
        assert_eq!(viewer.renderer().size(), (800, 600));
        assert_eq!(viewer.graph().node_count(), 2, "root plus cube");
    }

    #[test]
    fn test_renderer_creation_failure_is_fatal() {
        let result = Viewer::<MockRenderer>::initialize(
            SurfaceSize::new(800, 600),
            config(),
            Box::new(SpinScene {
                texture: None,
                controls: false,
            }),
            |_, _| Err(ViewerError::Adapter("no adapter".to_string())),
        );
        assert!(matches!(result, Err(ViewerError::Adapter(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = ViewerConfig {
            near: 10.0,
            far: 1.0,
            ..config()
        };
        let result = Viewer::initialize(
            SurfaceSize::new(800, 600),
            bad,
            Box::new(SpinScene {
                texture: None,
                controls: false,
            }),
            |size, _| Ok(MockRenderer::new(size.physical())),
        );
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_last_resize_wins() {
        let mut viewer = spin_viewer();
        viewer.resize(1024, 768);
        viewer.resize(300, 300);
        viewer.resize(400, 300);

        assert_relative_eq!(viewer.camera().aspect, 400.0 / 300.0);
        assert_eq!(viewer.renderer().size(), (400, 300));
        assert_eq!(viewer.renderer().resizes.last(), Some(&(400, 300)));
    }

    #[test]
    fn test_zero_resize_is_ignored() {
        let mut viewer = spin_viewer();
        let calls = viewer.renderer().resizes.len();

        viewer.resize(0, 600);
        viewer.resize(800, 0);

        assert_relative_eq!(viewer.camera().aspect, 800.0 / 600.0);
        assert_eq!(viewer.renderer().size(), (800, 600));
        assert_eq!(viewer.renderer().resizes.len(), calls);
    }

    #[test]
    fn test_pixel_ratio_scales_surface_not_aspect() {
        let mut viewer = viewer_with(
            SpinScene {
                texture: None,
                controls: false,
            },
            SurfaceSize::new(800, 600).with_pixel_ratio(2.0),
        );
        assert_eq!(viewer.renderer().size(), (1600, 1200));
        assert_relative_eq!(viewer.camera().aspect, 800.0 / 600.0);

        viewer.set_pixel_ratio(1.5);
        assert_eq!(viewer.renderer().size(), (1200, 900));
        assert_relative_eq!(viewer.camera().aspect, 800.0 / 600.0);

        viewer.set_pixel_ratio(0.0);
        assert_eq!(viewer.renderer().size(), (1200, 900), "invalid ratio ignored");
    }

    #[test]
    fn test_fractional_scale_keeps_window_pixels() {
        let mut viewer = spin_viewer();
        for scale in [1.25_f32, 1.5] {
            for width in 990..=1010 {
                viewer.resize_physical(width, 700, scale);
                assert_eq!(viewer.renderer().size(), (width, 700), "scale {}", scale);
                assert_relative_eq!(viewer.camera().aspect, width as f32 / 700.0);
            }
        }

        viewer.resize_physical(0, 700, 1.5);
        viewer.resize_physical(1000, 700, f32::NAN);
        assert_eq!(viewer.renderer().size(), (1010, 700));
    }

    #[test]
    fn test_update_is_absolute_in_elapsed_time() {
        let mut viewer = spin_viewer();
        assert_relative_eq!(cube_rotation(&viewer).y, 0.0);

        viewer.update(1.0);
        assert_relative_eq!(cube_rotation(&viewer).y, 1.0);

        viewer.update(2.0);
        assert_relative_eq!(cube_rotation(&viewer).y, 2.0);

        viewer.update(2.0);
        assert_relative_eq!(cube_rotation(&viewer).y, 2.0, epsilon = 0.0);
        assert_relative_eq!(viewer.elapsed(), 2.0);
    }

    #[test]
    fn test_frame_renders_then_updates() {
        let mut viewer = spin_viewer();
        viewer.frame(0.5);
        assert_eq!(viewer.renderer().frames, 1);
        assert_relative_eq!(cube_rotation(&viewer).y, 0.5);

        viewer.frame(1.5);
        assert_eq!(viewer.renderer().frames, 2);
        assert_relative_eq!(cube_rotation(&viewer).y, 1.5);
    }

    #[test]
    fn test_render_errors_do_not_stop_the_loop() {
        let mut viewer = Viewer::initialize(
            SurfaceSize::new(800, 600),
            config(),
            Box::new(SpinScene {
                texture: None,
                controls: false,
            }),
            |size, _| {
                let mut renderer = MockRenderer::new(size.physical());
                renderer.fail = true;
                Ok(renderer)
            },
        )
        .unwrap();

        for i in 0..5 {
            viewer.frame(i as f32);
        }
        assert_eq!(viewer.renderer().frames, 5);
        assert_relative_eq!(cube_rotation(&viewer).y, 4.0);
    }

    #[test]
    fn test_inserted_nodes_appear_on_next_frame() {
        let mut viewer = spin_viewer();
        let root = viewer.graph().root();
        let (sender, pending) = PendingAsset::channel("image.png");
        viewer.assets_mut().insert_when_ready(pending, root, |texture, image| {
            SceneNode::mesh(
                Arc::new(plane_geometry(image.aspect(), 1.0, 1, 1)),
                MeshMaterial::basic(Color::WHITE).map(texture),
            )
            .named("image")
        });

        let mut counts = Vec::new();
        viewer.frame(0.0);
        counts.push(viewer.graph().node_count());

        assert!(sender.complete(Ok(TextureData::new(2, 1, vec![255; 8]))));
        viewer.frame(0.1);
        counts.push(viewer.graph().node_count());
        assert_eq!(viewer.renderer().drawn_nodes, 1, "insert lands after this frame's draw");

        viewer.frame(0.2);
        counts.push(viewer.graph().node_count());
        assert_eq!(viewer.renderer().drawn_nodes, 2);

        assert_eq!(counts, vec![2, 3, 3]);
        assert!(counts.windows(2).all(|w| w[0] <= w[1]), "node count never decreases");
        assert!(viewer.graph().find("image").is_some());
    }

    #[test]
    fn test_missing_texture_reports_failure_and_keeps_rendering() {
        let mut viewer = viewer_with(
            SpinScene {
                texture: Some("missing.png"),
                controls: false,
            },
            SurfaceSize::new(800, 600),
        );
        let failures = Rc::new(RefCell::new(Vec::new()));
        let sink = failures.clone();
        viewer.on_asset_error(move |label, _| sink.borrow_mut().push(label.to_string()));

        let mut elapsed = 0.0;
        for _ in 0..500 {
            viewer.frame(elapsed);
            elapsed += 0.01;
            if !failures.borrow().is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(failures.borrow().len(), 1);
        assert!(failures.borrow()[0].ends_with("missing.png"));

        let frames = viewer.renderer().frames;
        viewer.frame(elapsed);
        assert_eq!(viewer.renderer().frames, frames + 1);
        assert_eq!(viewer.renderer().drawn_nodes, 1);

        let slot = viewer.graph().textures.get(texture_id(&viewer)).unwrap();
        assert!(matches!(slot.state, TextureState::Failed));
    }

    fn texture_id(viewer: &Viewer<MockRenderer>) -> scene_viewer::scene::TextureId {
        let id = viewer.graph().find("cube").unwrap();
        match &viewer.graph().get(id).unwrap().drawable {
            Some(scene_viewer::scene::Drawable::Mesh { material, .. }) => material.map.unwrap(),
            _ => panic!("cube is a mesh"),
        }
    }

    #[test]
    fn test_teardown_with_load_in_flight_is_harmless() {
        let mut viewer = spin_viewer();
        let root = viewer.graph().root();
        let (sender, pending) = PendingAsset::channel("late.png");
        viewer
            .assets_mut()
            .insert_when_ready(pending, root, |_, _| SceneNode::group());

        viewer.teardown();
        assert!(!sender.complete(Ok(TextureData::solid([0, 0, 0, 255]))));
    }

    #[test]
    fn test_controls_follow_scene_and_config() {
        let with_controls = viewer_with(
            SpinScene {
                texture: None,
                controls: true,
            },
            SurfaceSize::new(800, 600),
        );
        assert!(with_controls.controls().is_some());

        let disabled = Viewer::initialize(
            SurfaceSize::new(800, 600),
            ViewerConfig {
                controls: Some(false),
                ..config()
            },
            Box::new(SpinScene {
                texture: None,
                controls: true,
            }),
            |size, _| Ok(MockRenderer::new(size.physical())),
        )
        .unwrap();
        assert!(disabled.controls().is_none());

        assert!(spin_viewer().controls().is_none());
    }

    #[test]
    fn test_drag_orbits_camera_at_constant_distance() {
        let mut viewer = viewer_with(
            SpinScene {
                texture: None,
                controls: true,
            },
            SurfaceSize::new(800, 600),
        );
        let start = viewer.camera().position;
        let distance = viewer.camera().distance();

        let input = viewer.input_mut();
        input.press(Button::MouseLeft);
        input.move_cursor(Vec2::new(100.0, 100.0));
        input.move_cursor(Vec2::new(160.0, 100.0));
        viewer.frame(0.0);

        assert_ne!(viewer.camera().position, start);
        assert_relative_eq!(viewer.camera().distance(), distance, epsilon = 1e-4);

        // Deltas are consumed by the frame that applied them
        let moved = viewer.camera().position;
        viewer.frame(0.1);
        assert_eq!(viewer.camera().position, moved);
    }

    #[test]
    fn test_every_example_scene_builds_and_runs() {
        let bundled = ViewerConfig {
            asset_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"),
            ..ViewerConfig::default()
        };
        for name in SCENE_NAMES {
            let scene = scene_by_name(name).unwrap();
            let mut viewer =
                Viewer::initialize(SurfaceSize::new(640, 480), bundled.clone(), scene, |size, _| {
                    Ok(MockRenderer::new(size.physical()))
                })
                .unwrap();
            let failures = Rc::new(RefCell::new(Vec::new()));
            let sink = failures.clone();
            viewer.on_asset_error(move |label, _| sink.borrow_mut().push(label.to_string()));

            assert_eq!(viewer.scene_name(), *name);
            let mut frames = 0;
            while frames < 3 || !viewer.assets_mut().is_idle() {
                assert!(frames < 2000, "{} assets never finished loading", name);
                viewer.frame(frames as f32 * 0.5);
                frames += 1;
                std::thread::sleep(Duration::from_millis(1));
            }
            // The last frame may have applied a load after drawing
            viewer.frame(frames as f32 * 0.5);

            assert!(failures.borrow().is_empty(), "{} failed {:?}", name, failures.borrow());
            assert!(viewer.graph().node_count() > 1, "{} has no nodes", name);
            assert_eq!(viewer.renderer().frames, frames + 1);
            assert!(viewer.renderer().drawn_nodes > 0, "{} draws nothing", name);
        }
    }

    #[test]
    fn test_missing_font_reports_failure_and_keeps_rendering() {
        let mut viewer = Viewer::initialize(
            SurfaceSize::new(800, 600),
            config(),
            Box::new(TextScene),
            |size, _| Ok(MockRenderer::new(size.physical())),
        )
        .unwrap();
        let failures = Rc::new(RefCell::new(Vec::new()));
        let sink = failures.clone();
        viewer.on_asset_error(move |label, err| {
            sink.borrow_mut().push((label.to_string(), matches!(err, AssetError::Io { .. })));
        });

        let mut elapsed = 0.0;
        for _ in 0..500 {
            viewer.frame(elapsed);
            elapsed += 0.01;
            if viewer.assets_mut().is_idle() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(failures.borrow().len(), 1);
        let (label, io) = failures.borrow()[0].clone();
        assert!(label.ends_with(FONT_PATH));
        assert!(io);

        let frames = viewer.renderer().frames;
        viewer.frame(elapsed);
        viewer.frame(elapsed + 0.01);
        assert_eq!(viewer.renderer().frames, frames + 2);
        assert!(viewer.graph().find("text").is_none());
        assert_eq!(viewer.graph().node_count(), 1, "only the root");
    }
}
