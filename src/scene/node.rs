use std::sync::Arc;

use glam::Vec3;

use crate::geometry::{Geometry, LineGeometry, PointGeometry};
use crate::math::Transform;

use super::material::{LineMaterial, MeshMaterial, PointsMaterial};

/// Handle to a node in a [`super::SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node draws, if anything. Geometry is shared between nodes.
#[derive(Debug, Clone)]
pub enum Drawable {
    Mesh {
        geometry: Arc<Geometry>,
        material: MeshMaterial,
    },
    Line {
        geometry: Arc<LineGeometry>,
        material: LineMaterial,
    },
    Points {
        geometry: Arc<PointGeometry>,
        material: PointsMaterial,
    },
}

impl Drawable {
    pub fn is_transparent(&self) -> bool {
        match self {
            Drawable::Mesh { material, .. } => material.transparent,
            Drawable::Line { material, .. } => material.opacity < 1.0,
            Drawable::Points { material, .. } => material.transparent,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Drawable::Mesh { .. } => "mesh",
            Drawable::Line { .. } => "line",
            Drawable::Points { .. } => "points",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub drawable: Option<Drawable>,
    /// Hidden nodes hide their whole subtree
    pub visible: bool,
}

impl SceneNode {
    /// Node without a drawable, used to group and offset children
    pub fn group() -> Self {
        Self {
            name: None,
            transform: Transform::IDENTITY,
            drawable: None,
            visible: true,
        }
    }

    pub fn mesh(geometry: Arc<Geometry>, material: MeshMaterial) -> Self {
        Self::group().with_drawable(Drawable::Mesh { geometry, material })
    }

    pub fn line(geometry: Arc<LineGeometry>, material: LineMaterial) -> Self {
        Self::group().with_drawable(Drawable::Line { geometry, material })
    }

    pub fn points(geometry: Arc<PointGeometry>, material: PointsMaterial) -> Self {
        Self::group().with_drawable(Drawable::Points { geometry, material })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vec3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_drawable(mut self, drawable: Drawable) -> Self {
        self.drawable = Some(drawable);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::group()
    }
}
