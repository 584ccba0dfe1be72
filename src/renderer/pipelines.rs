use std::collections::HashMap;

use crate::geometry::LineMode;
use crate::scene::{Drawable, Side};

use super::resources::{LineVertex, MeshVertex, PointInstance};
use super::uniforms::{DrawUniform, GlobalsUniform};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Primitive assembly for a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Mesh,
    Wireframe,
    LineList,
    LineStrip,
    Points,
}

/// Fixed-function state that selects a render pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub kind: DrawKind,
    pub side: Side,
    pub blend: bool,
    pub depth_test: bool,
    pub depth_write: bool,
}

impl PipelineKey {
    pub fn for_drawable(drawable: &Drawable) -> Self {
        match drawable {
            Drawable::Mesh { material, .. } => Self {
                kind: if material.wireframe {
                    DrawKind::Wireframe
                } else {
                    DrawKind::Mesh
                },
                side: material.side,
                blend: material.transparent,
                depth_test: material.depth_test,
                depth_write: material.depth_write,
            },
            Drawable::Line { geometry, material } => Self {
                kind: match geometry.mode {
                    LineMode::Segments => DrawKind::LineList,
                    LineMode::Strip | LineMode::Loop => DrawKind::LineStrip,
                },
                side: Side::Double,
                blend: material.opacity < 1.0,
                depth_test: true,
                depth_write: true,
            },
            Drawable::Points { material, .. } => Self {
                kind: DrawKind::Points,
                side: Side::Double,
                blend: material.transparent,
                depth_test: true,
                depth_write: !material.transparent,
            },
        }
    }

    fn topology(&self) -> wgpu::PrimitiveTopology {
        match self.kind {
            DrawKind::Mesh | DrawKind::Points => wgpu::PrimitiveTopology::TriangleList,
            DrawKind::Wireframe | DrawKind::LineList => wgpu::PrimitiveTopology::LineList,
            DrawKind::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        }
    }

    fn cull_mode(&self) -> Option<wgpu::Face> {
        match (self.kind, self.side) {
            (DrawKind::Mesh, Side::Front) => Some(wgpu::Face::Back),
            (DrawKind::Mesh, Side::Back) => Some(wgpu::Face::Front),
            _ => None,
        }
    }

    fn entry_points(&self) -> (&'static str, &'static str) {
        match self.kind {
            DrawKind::Mesh | DrawKind::Wireframe => ("vs_mesh", "fs_mesh"),
            DrawKind::LineList | DrawKind::LineStrip => ("vs_line", "fs_line"),
            DrawKind::Points => ("vs_points", "fs_points"),
        }
    }

    fn vertex_layout(&self) -> wgpu::VertexBufferLayout<'static> {
        match self.kind {
            DrawKind::Mesh | DrawKind::Wireframe => MeshVertex::layout(),
            DrawKind::LineList | DrawKind::LineStrip => LineVertex::layout(),
            DrawKind::Points => PointInstance::layout(),
        }
    }
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size as u64),
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Shader, bind group layouts and lazily built pipelines
pub struct Pipelines {
    shader: wgpu::ShaderModule,
    pub globals_layout: wgpu::BindGroupLayout,
    pub node_layout: wgpu::BindGroupLayout,
    pub material_layout: wgpu::BindGroupLayout,
    layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    cache: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[uniform_entry(0, std::mem::size_of::<GlobalsUniform>())],
        });
        let node_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("node_bind_group_layout"),
            entries: &[uniform_entry(0, std::mem::size_of::<DrawUniform>())],
        });
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &node_layout, &material_layout],
            push_constant_ranges: &[],
        });

        Self {
            shader,
            globals_layout,
            node_layout,
            material_layout,
            layout,
            color_format,
            sample_count,
            cache: HashMap::new(),
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Build the pipeline for `key` unless it exists
    pub fn prepare(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.cache.contains_key(&key) {
            return;
        }
        log::debug!("Creating pipeline {:?}", key);
        let pipeline = self.create(device, key);
        self.cache.insert(key, pipeline);
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.cache.get(key)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn create(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        let (vs_entry, fs_entry) = key.entry_points();
        let blend = if key.blend {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&self.layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some(vs_entry),
                buffers: &[key.vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(fs_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: key.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: key.cull_mode(),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: key.depth_write,
                depth_compare: if key.depth_test {
                    wgpu::CompareFunction::LessEqual
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: self.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec3;

    use super::*;
    use crate::geometry::{box_geometry, LineGeometry, PointGeometry};
    use crate::math::Color;
    use crate::scene::{LineMaterial, MeshMaterial, PointsMaterial};

    #[test]
    fn test_mesh_keys() {
        let geometry = Arc::new(box_geometry(1.0, 1.0, 1.0));
        let solid = Drawable::Mesh {
            geometry: geometry.clone(),
            material: MeshMaterial::basic(Color::WHITE).side(Side::Double),
        };
        let wire = Drawable::Mesh {
            geometry,
            material: MeshMaterial::basic(Color::WHITE).wireframe(true).transparent(0.5),
        };

        let solid_key = PipelineKey::for_drawable(&solid);
        assert_eq!(solid_key.kind, DrawKind::Mesh);
        assert_eq!(solid_key.cull_mode(), None);

        let wire_key = PipelineKey::for_drawable(&wire);
        assert_eq!(wire_key.kind, DrawKind::Wireframe);
        assert_eq!(wire_key.topology(), wgpu::PrimitiveTopology::LineList);
        assert!(wire_key.blend);
        assert_ne!(solid_key, wire_key);
    }

    #[test]
    fn test_front_side_culls_back_faces() {
        let drawable = Drawable::Mesh {
            geometry: Arc::new(box_geometry(1.0, 1.0, 1.0)),
            material: MeshMaterial::phong(Color::WHITE),
        };
        assert_eq!(PipelineKey::for_drawable(&drawable).cull_mode(), Some(wgpu::Face::Back));
    }

    #[test]
    fn test_line_and_point_keys() {
        let segments = Drawable::Line {
            geometry: Arc::new(LineGeometry::segments(vec![Vec3::ZERO, Vec3::X])),
            material: LineMaterial::new(Color::WHITE),
        };
        let strip = Drawable::Line {
            geometry: Arc::new(LineGeometry::closed(vec![Vec3::ZERO, Vec3::X, Vec3::Y])),
            material: LineMaterial::new(Color::WHITE),
        };
        let points = Drawable::Points {
            geometry: Arc::new(PointGeometry::new(vec![Vec3::ZERO])),
            material: PointsMaterial::new(Color::WHITE, 0.1),
        };

        assert_eq!(PipelineKey::for_drawable(&segments).kind, DrawKind::LineList);
        assert_eq!(PipelineKey::for_drawable(&strip).kind, DrawKind::LineStrip);
        let key = PipelineKey::for_drawable(&points);
        assert_eq!(key.entry_points(), ("vs_points", "fs_points"));
        assert_eq!(key.topology(), wgpu::PrimitiveTopology::TriangleList);
    }
}
