use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;
use crate::core::controller::{Button, Controller};

/// Polar angle margin keeping the camera off the poles
const POLE_EPSILON: f32 = 0.01;

/// Per-frame pointer gesture
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitInput {
    /// Drag in pixels to orbit around the target
    pub rotate: Vec2,
    /// Drag in pixels to slide camera and target together
    pub pan: Vec2,
    /// Wheel lines; positive moves closer
    pub zoom: f32,
}

impl OrbitInput {
    /// Left drag orbits; right or middle drag pans, as does left drag with
    /// shift or control held. The wheel zooms.
    pub fn from_controller(controller: &dyn Controller) -> Self {
        let delta = controller.pointer_delta();
        let left = controller.is_down(Button::MouseLeft);
        let modified = controller.is_down(Button::Shift) || controller.is_down(Button::Control);
        let panning = controller.is_down(Button::MouseRight)
            || controller.is_down(Button::MouseMiddle)
            || (left && modified);

        let mut input = Self {
            zoom: controller.scroll_delta(),
            ..Self::default()
        };
        if panning {
            input.pan = delta;
        } else if left {
            input.rotate = delta;
        }
        input
    }

    pub fn is_idle(&self) -> bool {
        self.rotate == Vec2::ZERO && self.pan == Vec2::ZERO && self.zoom == 0.0
    }
}

/// Camera orbit, zoom and pan around a target point
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.1,
            max_distance: f32::INFINITY,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
        self
    }

    /// Apply one frame of input; `viewport_height` is in the same pixels as the input
    pub fn update(&self, camera: &mut PerspectiveCamera, input: OrbitInput, viewport_height: f32) {
        if !self.enabled || input.is_idle() {
            return;
        }
        let height = viewport_height.max(1.0);

        if input.rotate != Vec2::ZERO {
            // A drag across the full viewport height turns once around
            let rotate = input.rotate * TAU / height * self.rotate_speed;
            self.orbit(camera, rotate.x, -rotate.y);
        }
        if input.pan != Vec2::ZERO {
            self.pan(camera, input.pan, height);
        }
        if input.zoom != 0.0 {
            self.zoom(camera, input.zoom);
        }
    }

    /// Rotate the camera around its target; angles in radians
    pub fn orbit(&self, camera: &mut PerspectiveCamera, delta_azimuth: f32, delta_polar: f32) {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let theta = offset.z.atan2(offset.x);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let theta = theta + delta_azimuth;
        let phi = (phi + delta_polar).clamp(POLE_EPSILON, PI - POLE_EPSILON);

        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            );
    }

    /// Scale the distance to the target; positive `lines` moves closer
    pub fn zoom(&self, camera: &mut PerspectiveCamera, lines: f32) {
        let offset = camera.position - camera.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }

        let scale = 0.95f32.powf(self.zoom_speed * lines);
        let new_distance = (distance * scale).clamp(self.min_distance, self.max_distance);
        camera.position = camera.target + offset / distance * new_distance;
    }

    /// Move camera and target together in the view plane
    pub fn pan(&self, camera: &mut PerspectiveCamera, drag: Vec2, viewport_height: f32) {
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);

        // World units visible per pixel at the target's depth
        let half_fov = (camera.fov_degrees.to_radians() * 0.5).tan();
        let per_pixel = 2.0 * camera.distance() * half_fov / viewport_height * self.pan_speed;

        let offset = -right * drag.x * per_pixel + up * drag.y * per_pixel;
        camera.position += offset;
        camera.target += offset;
    }
}
