use glam::{Mat4, Vec3};

pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;

/// Perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            aspect,
            near,
            far,
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    /// Recompute aspect from a surface size; zero sizes are ignored
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(-Vec3::Z)
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Depth of a world-space point along the view direction
    pub fn view_depth(&self, point: Vec3) -> f32 {
        (point - self.position).dot(self.forward())
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(DEFAULT_FOV_DEGREES, 1.0, DEFAULT_NEAR, DEFAULT_FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let camera = PerspectiveCamera::default();
        assert_eq!(camera.fov_degrees, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 100.0);
    }

    #[test]
    fn test_set_aspect_exact() {
        let mut camera = PerspectiveCamera::default();
        camera.set_aspect(1920, 1080);
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
        camera.set_aspect(0, 1080);
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = PerspectiveCamera::default();
        camera.position = Vec3::new(3.0, 4.0, 5.0);
        camera.look_at(Vec3::new(1.0, 0.0, -1.0));
        let clip = camera.view_projection() * camera.target.extend(1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_depth() {
        let camera = PerspectiveCamera::default();
        assert_relative_eq!(camera.view_depth(Vec3::ZERO), 5.0);
        assert_relative_eq!(camera.view_depth(Vec3::new(0.0, 0.0, 2.0)), 3.0);
    }
}
