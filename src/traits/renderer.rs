use crate::camera::PerspectiveCamera;
use crate::error::ViewerError;
use crate::math::Color;
use crate::scene::SceneGraph;

/// Container size in logical pixels plus the device pixel ratio.
///
/// A size built from the window's physical pixels keeps them exactly, since
/// logical sizes do not round-trip under fractional scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    exact: Option<(u32, u32)>,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            exact: None,
        }
    }

    /// Size reported by the windowing system in physical pixels
    pub fn from_physical(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let logical = |v: u32| match v {
            0 => 0,
            v => ((v as f32 / pixel_ratio).round() as u32).max(1),
        };
        Self {
            width: logical(width),
            height: logical(height),
            pixel_ratio,
            exact: Some((width, height)),
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self.exact = None;
        self
    }

    /// Backing store size in physical pixels, never zero
    pub fn physical(&self) -> (u32, u32) {
        if let Some((width, height)) = self.exact {
            return (width.max(1), height.max(1));
        }
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    /// Width over height of the backing store; 1 for an empty container
    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            return 1.0;
        }
        let (width, height) = self.physical();
        width as f32 / height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameScene<'a> {
    pub graph: &'a SceneGraph,
    pub camera: &'a PerspectiveCamera,
    pub clear_color: Color,
}

/// Render surface driven by the viewer
pub trait SceneRenderer {
    /// Resize the backing store, in physical pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Draw the scene; transient surface loss is handled internally
    fn render(&mut self, frame: &FrameScene<'_>) -> Result<(), ViewerError>;

    /// Current backing store size in physical pixels
    fn size(&self) -> (u32, u32);
}
