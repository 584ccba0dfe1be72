//! wgpu backend for the viewer
//!
//! Each frame runs in two phases. The prepare phase uploads whatever the draw
//! list needs (geometry buffers, node uniforms, textures, pipelines) and the
//! pass phase records draws against those cached resources.

mod pipelines;
mod resources;
mod uniforms;

use std::sync::Arc;

use winit::window::Window;

use crate::camera::PerspectiveCamera;
use crate::config::ViewerConfig;
use crate::core::gpu_context::GpuContext;
use crate::error::{Result, ViewerError};
use crate::scene::{DrawItem, Drawable, NodeId, TextureData, TextureId};
use crate::traits::renderer::{FrameScene, SceneRenderer};

pub use pipelines::{DrawKind, PipelineKey, Pipelines, DEPTH_FORMAT};
pub use resources::{GpuResources, LineVertex, MapKey, MeshVertex, PointInstance};
pub use uniforms::{DrawUniform, GlobalsUniform, LightUniform, MapFlags, MAX_LIGHTS};

/// Indices into `items`: opaque draws in tree order, then transparent draws back to front
pub fn draw_order(items: &[DrawItem<'_>], camera: &PerspectiveCamera) -> Vec<usize> {
    let (mut transparent, opaque): (Vec<usize>, Vec<usize>) =
        (0..items.len()).partition(|&i| items[i].drawable.is_transparent());

    let depth = |i: usize| camera.view_depth(items[i].world.w_axis.truncate());
    transparent.sort_by(|&a, &b| depth(b).total_cmp(&depth(a)));

    let mut order = opaque;
    order.extend(transparent);
    order
}

#[derive(Debug, Clone, Copy)]
enum GeometryRef {
    Mesh(usize),
    Wireframe(usize),
    Line(usize),
    Points(usize),
}

#[derive(Debug, Clone, Copy)]
struct PreparedDraw {
    node: NodeId,
    key: PipelineKey,
    geometry: GeometryRef,
    maps: MapKey,
}

fn is_empty(drawable: &Drawable) -> bool {
    match drawable {
        Drawable::Mesh { geometry, .. } => geometry.indices.is_empty(),
        Drawable::Line { geometry, .. } => geometry.segment_count() == 0,
        Drawable::Points { geometry, .. } => geometry.is_empty(),
    }
}

/// Scene renderer drawing into a window surface
pub struct WgpuRenderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    resources: GpuResources,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    placeholder: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
}

impl WgpuRenderer {
    /// Create a renderer for `window` with a backing store of `size` physical pixels
    pub async fn new(window: Arc<Window>, size: (u32, u32), config: &ViewerConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let caps = surface.get_capabilities(gpu.adapter());
        // Colours and textures are authored in display space, so avoid the sRGB encode
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| ViewerError::Adapter("surface reports no formats".to_string()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let requested = config.sample_count();
        let sample_count = gpu.supported_sample_count(format, requested);
        if sample_count != requested {
            log::warn!(
                "{}x MSAA unsupported for {:?}, using {}x",
                requested,
                format,
                sample_count
            );
        }

        let device = gpu.device();
        let pipelines = Pipelines::new(device, format, sample_count);

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Uniform"),
            size: std::mem::size_of::<GlobalsUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &pipelines.globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let placeholder = resources::upload_texture(
            device,
            gpu.queue(),
            &TextureData::solid([255, 255, 255, 255]),
            "Placeholder Texture",
        );

        let (depth_view, msaa_view) = create_targets(device, &surface_config, sample_count);

        log::info!(
            "Renderer ready: {}x{} {:?}, {}x MSAA",
            surface_config.width,
            surface_config.height,
            format,
            sample_count
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            pipelines,
            resources: GpuResources::default(),
            globals_buffer,
            globals_bind_group,
            sampler,
            placeholder,
            depth_view,
            msaa_view,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    pub fn sample_count(&self) -> u32 {
        self.pipelines.sample_count()
    }

    fn reconfigure(&mut self) {
        let device = self.gpu.device();
        self.surface.configure(device, &self.surface_config);
        let (depth_view, msaa_view) =
            create_targets(device, &self.surface_config, self.pipelines.sample_count());
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
    }

    /// Upload everything the frame draws and return the draws in submission order
    fn prepare(&mut self, frame: &FrameScene<'_>) -> Vec<PreparedDraw> {
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let graph = frame.graph;

        let globals = GlobalsUniform::new(
            frame.camera,
            graph.lights(),
            (self.surface_config.width, self.surface_config.height),
        );
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let items = graph.draw_list();
        let mut draws = Vec::with_capacity(items.len());

        for index in draw_order(&items, frame.camera) {
            let item = &items[index];
            if is_empty(item.drawable) {
                continue;
            }

            let key = PipelineKey::for_drawable(item.drawable);
            self.pipelines.prepare(device, key);

            let (geometry, color_map, emissive_map) = match item.drawable {
                Drawable::Mesh { geometry, material } => {
                    let mesh = self.resources.mesh(device, geometry, material.wireframe);
                    let geometry = if material.wireframe {
                        GeometryRef::Wireframe(mesh)
                    } else {
                        GeometryRef::Mesh(mesh)
                    };
                    (geometry, material.map, material.emissive_map)
                }
                Drawable::Line { geometry, .. } => {
                    (GeometryRef::Line(self.resources.line(device, geometry)), None, None)
                }
                Drawable::Points { geometry, material } => (
                    GeometryRef::Points(self.resources.points(device, geometry)),
                    material.map,
                    None,
                ),
            };

            let maps: MapKey = (
                self.resources.texture(device, queue, &graph.textures, color_map),
                self.resources.texture(device, queue, &graph.textures, emissive_map),
            );
            if !self.resources.has_material_group(&maps) {
                let group = self.create_material_group(&maps);
                self.resources.insert_material_group(maps, group);
            }

            let flags = MapFlags {
                color: maps.0.is_some(),
                emissive: maps.1.is_some(),
            };
            let uniform = DrawUniform::new(item.world, item.drawable, flags);
            self.resources
                .node(device, queue, &self.pipelines.node_layout, item.node, &uniform);

            draws.push(PreparedDraw {
                node: item.node,
                key,
                geometry,
                maps,
            });
        }

        draws
    }

    fn create_material_group(&self, maps: &MapKey) -> wgpu::BindGroup {
        let view = |slot: Option<(TextureId, u64)>| {
            slot.and_then(|(id, _)| self.resources.texture_view(id))
                .unwrap_or(&self.placeholder)
        };
        self.gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &self.pipelines.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view(maps.0)),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view(maps.1)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    fn record(&self, pass: &mut wgpu::RenderPass<'_>, draws: &[PreparedDraw]) {
        pass.set_bind_group(0, &self.globals_bind_group, &[]);

        for draw in draws {
            let (Some(pipeline), Some(node), Some(material)) = (
                self.pipelines.get(&draw.key),
                self.resources.get_node(draw.node),
                self.resources.material_group(&draw.maps),
            ) else {
                continue;
            };

            pass.set_pipeline(pipeline);
            pass.set_bind_group(1, &node.bind_group, &[]);
            pass.set_bind_group(2, material, &[]);

            match draw.geometry {
                GeometryRef::Mesh(key) => {
                    if let Some(mesh) = self.resources.get_mesh(key) {
                        pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                        pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                    }
                }
                GeometryRef::Wireframe(key) => {
                    if let Some(mesh) = self.resources.get_mesh(key) {
                        if let Some((edges, count)) = &mesh.edges {
                            pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                            pass.set_index_buffer(edges.slice(..), wgpu::IndexFormat::Uint32);
                            pass.draw_indexed(0..*count, 0, 0..1);
                        }
                    }
                }
                GeometryRef::Line(key) => {
                    if let Some(line) = self.resources.get_line(key) {
                        pass.set_vertex_buffer(0, line.vertices.slice(..));
                        pass.draw(0..line.vertex_count, 0..1);
                    }
                }
                GeometryRef::Points(key) => {
                    if let Some(points) = self.resources.get_points(key) {
                        pass.set_vertex_buffer(0, points.instances.slice(..));
                        pass.draw(0..6, 0..points.count);
                    }
                }
            }
        }
    }
}

impl SceneRenderer for WgpuRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.surface_config.width && height == self.surface_config.height {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
        log::debug!("Surface resized to {}x{}", width, height);
    }

    fn render(&mut self, frame: &FrameScene<'_>) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Surface texture timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let draws = self.prepare(frame);

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let (target, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.record(&mut pass, &draws);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
}

fn create_targets(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
    let size = wgpu::Extent3d {
        width: config.width.max(1),
        height: config.height.max(1),
        depth_or_array_layers: 1,
    };
    let target = |label: &str, format: wgpu::TextureFormat| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    };

    let depth = target("Depth Texture", DEPTH_FORMAT);
    let msaa = (sample_count > 1).then(|| target("MSAA Color Texture", config.format));
    (depth, msaa)
}
