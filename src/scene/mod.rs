//! Scene graph: nodes, drawables, materials, lights and textures

mod animation;
mod graph;
mod light;
mod material;
mod node;
mod texture;

pub use animation::{Animations, Spin};
pub use graph::{DrawItem, SceneGraph};
pub use light::Light;
pub use material::{Dash, LineMaterial, MeshMaterial, PointsMaterial, Shading, Side};
pub use node::{Drawable, NodeId, SceneNode};
pub use texture::{TextureData, TextureId, TextureRegistry, TextureSlot, TextureState};
