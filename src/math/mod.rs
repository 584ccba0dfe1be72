mod color;
mod transform;

pub use color::{hsv_to_rgb, Color};
pub use transform::Transform;
