use glam::{Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::math::Color;
use crate::scene::{Drawable, Light, LineMaterial, MeshMaterial, PointsMaterial, Shading};

pub const MAX_LIGHTS: usize = 8;

const LIGHT_DIRECTIONAL: f32 = 1.0;
const LIGHT_POINT: f32 = 2.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// xyz position or direction-from, w kind
    pub position: [f32; 4],
    /// rgb radiance, w range (0 = unlimited)
    pub color: [f32; 4],
    /// x decay
    pub params: [f32; 4],
}

/// Per-frame data shared by every draw
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// rgb ambient radiance, w light count
    pub ambient: [f32; 4],
    /// physical width, height, unused, unused
    pub viewport: [f32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
}

impl GlobalsUniform {
    pub fn new(camera: &PerspectiveCamera, lights: &[Light], viewport: (u32, u32)) -> Self {
        let mut globals = Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            ambient: [0.0; 4],
            viewport: [viewport.0 as f32, viewport.1 as f32, 0.0, 0.0],
            lights: [LightUniform::default(); MAX_LIGHTS],
        };

        let mut ambient = Vec3::ZERO;
        let mut count = 0;
        for light in lights {
            if light.is_ambient() {
                ambient += Vec3::from_array(light.radiance().to_array());
                continue;
            }
            if count == MAX_LIGHTS {
                log::warn!("More than {} lights in scene, extra lights ignored", MAX_LIGHTS);
                break;
            }
            globals.lights[count] = pack_light(light);
            count += 1;
        }
        globals.ambient = ambient.extend(count as f32).to_array();
        globals
    }

    pub fn light_count(&self) -> usize {
        self.ambient[3] as usize
    }
}

fn pack_light(light: &Light) -> LightUniform {
    let radiance = light.radiance();
    match *light {
        Light::Directional { position, .. } => LightUniform {
            position: position.extend(LIGHT_DIRECTIONAL).to_array(),
            color: radiance.to_vec4(0.0),
            params: [0.0; 4],
        },
        Light::Point {
            position,
            distance,
            decay,
            ..
        } => LightUniform {
            position: position.extend(LIGHT_POINT).to_array(),
            color: radiance.to_vec4(distance),
            params: [decay, 0.0, 0.0, 0.0],
        },
        Light::Ambient { .. } => LightUniform::default(),
    }
}

/// Per-node transform and material parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    /// rgb, w opacity
    pub color: [f32; 4],
    /// rgb premultiplied by intensity, w 1 when an emissive map is bound
    pub emissive: [f32; 4],
    /// shading code, shininess or roughness, metalness, 1 when a colour map is bound
    pub material: [f32; 4],
    /// rgb specular colour, w alpha test
    pub specular: [f32; 4],
    /// dash size, gap size, scale, 1 when dashed
    pub dash: [f32; 4],
    /// point size, 1 when attenuated, unused, unused
    pub point: [f32; 4],
}

impl DrawUniform {
    fn with_model(model: Mat4) -> Self {
        let normal = model.inverse().transpose();
        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            color: [1.0; 4],
            emissive: [0.0; 4],
            material: [0.0; 4],
            specular: [0.0; 4],
            dash: [0.0; 4],
            point: [0.0; 4],
        }
    }

    pub fn new(model: Mat4, drawable: &Drawable, maps: MapFlags) -> Self {
        match drawable {
            Drawable::Mesh { material, .. } => Self::mesh(model, material, maps),
            Drawable::Line { material, .. } => Self::line(model, material),
            Drawable::Points { material, .. } => Self::points(model, material, maps),
        }
    }

    fn mesh(model: Mat4, material: &MeshMaterial, maps: MapFlags) -> Self {
        let mut uniform = Self::with_model(model);
        uniform.color = material.color.to_vec4(material.opacity);
        uniform.emissive = material
            .emissive
            .scaled(material.emissive_intensity)
            .to_vec4(flag(maps.emissive));

        let (p1, p2, specular) = match material.shading {
            Shading::Basic => (0.0, 0.0, Color::BLACK),
            Shading::Phong {
                shininess,
                specular,
            } => (shininess, 0.0, specular),
            Shading::Standard {
                roughness,
                metalness,
            } => (roughness, metalness, Color::BLACK),
        };
        uniform.material = [material.shading.code(), p1, p2, flag(maps.color)];
        uniform.specular = specular.to_vec4(0.0);
        uniform
    }

    fn line(model: Mat4, material: &LineMaterial) -> Self {
        let mut uniform = Self::with_model(model);
        uniform.color = material.color.to_vec4(material.opacity);
        if let Some(dash) = material.dash {
            uniform.dash = [dash.dash_size, dash.gap_size, dash.scale, 1.0];
        }
        uniform
    }

    fn points(model: Mat4, material: &PointsMaterial, maps: MapFlags) -> Self {
        let mut uniform = Self::with_model(model);
        uniform.color = material.color.to_vec4(material.opacity);
        uniform.material = [0.0, 0.0, 0.0, flag(maps.color)];
        uniform.specular = [0.0, 0.0, 0.0, material.alpha_test];
        uniform.point = [material.size, flag(material.size_attenuation), 0.0, 0.0];
        uniform
    }
}

/// Which texture slots hold real images this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapFlags {
    pub color: bool,
    pub emissive: bool,
}

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}
