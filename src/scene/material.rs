use crate::math::Color;

use super::texture::TextureId;

/// Lighting model used for a mesh surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Unlit, colour and map only
    Basic,
    /// Lambert diffuse plus Blinn-Phong specular
    Phong { shininess: f32, specular: Color },
    /// Roughness / metalness approximation
    Standard { roughness: f32, metalness: f32 },
}

impl Shading {
    pub(crate) fn code(&self) -> f32 {
        match self {
            Shading::Basic => 0.0,
            Shading::Phong { .. } => 1.0,
            Shading::Standard { .. } => 2.0,
        }
    }
}

/// Which triangle faces are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// Surface appearance of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshMaterial {
    pub shading: Shading,
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub side: Side,
    pub depth_test: bool,
    pub depth_write: bool,
    pub visible: bool,
    pub map: Option<TextureId>,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub emissive_map: Option<TextureId>,
}

impl MeshMaterial {
    fn with_shading(shading: Shading, color: Color) -> Self {
        Self {
            shading,
            color,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Front,
            depth_test: true,
            depth_write: true,
            visible: true,
            map: None,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            emissive_map: None,
        }
    }

    pub fn basic(color: Color) -> Self {
        Self::with_shading(Shading::Basic, color)
    }

    pub fn phong(color: Color) -> Self {
        Self::with_shading(
            Shading::Phong {
                shininess: 30.0,
                specular: Color::from_hex(0x111111),
            },
            color,
        )
    }

    pub fn standard(color: Color) -> Self {
        Self::with_shading(
            Shading::Standard {
                roughness: 1.0,
                metalness: 0.0,
            },
            color,
        )
    }

    /// Enables blending with the given opacity
    pub fn transparent(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn depth(mut self, test: bool, write: bool) -> Self {
        self.depth_test = test;
        self.depth_write = write;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn map(mut self, texture: TextureId) -> Self {
        self.map = Some(texture);
        self
    }

    pub fn emissive(mut self, color: Color, intensity: f32) -> Self {
        self.emissive = color;
        self.emissive_intensity = intensity;
        self
    }

    pub fn emissive_map(mut self, texture: TextureId) -> Self {
        self.emissive_map = Some(texture);
        self
    }

    /// Overrides the shading model parameters, keeping everything else
    pub fn shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }
}

impl Default for MeshMaterial {
    fn default() -> Self {
        Self::basic(Color::WHITE)
    }
}

/// Dash pattern in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub dash_size: f32,
    pub gap_size: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineMaterial {
    pub color: Color,
    pub opacity: f32,
    pub dash: Option<Dash>,
}

impl LineMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            dash: None,
        }
    }

    pub fn dashed(color: Color, dash_size: f32, gap_size: f32, scale: f32) -> Self {
        Self {
            dash: Some(Dash {
                dash_size,
                gap_size,
                scale,
            }),
            ..Self::new(color)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointsMaterial {
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    /// World units when attenuated, pixels otherwise
    pub size: f32,
    pub size_attenuation: bool,
    pub map: Option<TextureId>,
    /// Fragments with alpha at or below this are discarded
    pub alpha_test: f32,
}

impl PointsMaterial {
    pub fn new(color: Color, size: f32) -> Self {
        Self {
            color,
            opacity: 1.0,
            transparent: false,
            size,
            size_attenuation: true,
            map: None,
            alpha_test: 0.0,
        }
    }

    pub fn sprite(mut self, texture: TextureId, alpha_test: f32) -> Self {
        self.map = Some(texture);
        self.alpha_test = alpha_test;
        self
    }

    pub fn size_attenuation(mut self, attenuate: bool) -> Self {
        self.size_attenuation = attenuate;
        self
    }
}
