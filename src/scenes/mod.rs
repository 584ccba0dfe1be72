//! The tutorial examples, one [`SceneProvider`] each

mod basic;
mod common;
mod geometry;
mod lines;
mod materials;
mod points;
mod shapes;
mod solar_system;
mod text;

use crate::traits::SceneProvider;

pub use basic::BasicScene;
pub use geometry::GeometryScene;
pub use lines::LinesScene;
pub use materials::{glow_intensity, MaterialsScene};
pub use points::PointsScene;
pub use shapes::{heart_shape, ShapesScene};
pub use solar_system::SolarSystemScene;
pub use text::{text_options, TextScene, FONT_PATH, TEXT};

pub const SCENE_NAMES: &[&str] = &[
    "basic",
    "geometry",
    "shapes",
    "solar-system",
    "points",
    "lines",
    "materials",
    "text",
];

/// Look up an example by its command-line name
pub fn scene_by_name(name: &str) -> Option<Box<dyn SceneProvider>> {
    let scene: Box<dyn SceneProvider> = match name {
        "basic" => Box::new(BasicScene),
        "geometry" => Box::new(GeometryScene),
        "shapes" => Box::new(ShapesScene),
        "solar-system" => Box::new(SolarSystemScene),
        "points" => Box::new(PointsScene),
        "lines" => Box::new(LinesScene),
        "materials" => Box::new(MaterialsScene),
        "text" => Box::new(TextScene),
        _ => return None,
    };
    Some(scene)
}
