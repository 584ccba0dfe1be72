use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::geometry::{Geometry, LineGeometry, LineMode, PointGeometry};
use crate::scene::{NodeId, TextureData, TextureId, TextureRegistry};

use super::uniforms::DrawUniform;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    /// Distance along the line from its start
    pub distance: f32,
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One point sprite, expanded to a quad in the vertex shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
}

impl PointInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub fn mesh_vertices(geometry: &Geometry) -> Vec<MeshVertex> {
    geometry
        .positions
        .iter()
        .zip(&geometry.normals)
        .zip(&geometry.uvs)
        .map(|((position, normal), uv)| MeshVertex {
            position: *position,
            normal: *normal,
            uv: *uv,
        })
        .collect()
}

pub fn line_vertices(line: &LineGeometry) -> Vec<LineVertex> {
    line.draw_points()
        .iter()
        .zip(line.line_distances())
        .map(|(p, distance)| LineVertex {
            position: p.to_array(),
            distance,
        })
        .collect()
}

pub fn point_instances(points: &PointGeometry) -> Vec<PointInstance> {
    points
        .positions
        .iter()
        .map(|p| PointInstance {
            position: p.to_array(),
        })
        .collect()
}

fn arc_key<T>(value: &Arc<T>) -> usize {
    Arc::as_ptr(value) as usize
}

pub struct GpuMesh {
    /// Keeps the source alive so its address stays a valid cache key
    _source: Arc<Geometry>,
    pub vertices: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_count: u32,
    pub edges: Option<(wgpu::Buffer, u32)>,
}

pub struct GpuLine {
    _source: Arc<LineGeometry>,
    pub vertices: wgpu::Buffer,
    pub vertex_count: u32,
    pub mode: LineMode,
}

pub struct GpuPoints {
    _source: Arc<PointGeometry>,
    pub instances: wgpu::Buffer,
    pub count: u32,
}

pub struct NodeBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

/// Key for a material texture bind group: slot and image generation for each map
pub type MapKey = (Option<(TextureId, u64)>, Option<(TextureId, u64)>);

/// GPU copies of scene data, created on first use and kept for the renderer's lifetime
#[derive(Default)]
pub struct GpuResources {
    meshes: HashMap<usize, GpuMesh>,
    lines: HashMap<usize, GpuLine>,
    points: HashMap<usize, GpuPoints>,
    nodes: HashMap<NodeId, NodeBinding>,
    textures: HashMap<TextureId, (u64, wgpu::TextureView)>,
    material_groups: HashMap<MapKey, wgpu::BindGroup>,
}

impl GpuResources {
    pub fn mesh(
        &mut self,
        device: &wgpu::Device,
        geometry: &Arc<Geometry>,
        wireframe: bool,
    ) -> usize {
        let key = arc_key(geometry);
        let mesh = self.meshes.entry(key).or_insert_with(|| GpuMesh {
            _source: geometry.clone(),
            vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertices"),
                contents: bytemuck::cast_slice(&mesh_vertices(geometry)),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Indices"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: geometry.indices.len() as u32,
            edges: None,
        });

        if wireframe && mesh.edges.is_none() {
            let edges = geometry.edge_indices();
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Wireframe Indices"),
                contents: bytemuck::cast_slice(&edges),
                usage: wgpu::BufferUsages::INDEX,
            });
            mesh.edges = Some((buffer, edges.len() as u32));
        }
        key
    }

    pub fn line(&mut self, device: &wgpu::Device, geometry: &Arc<LineGeometry>) -> usize {
        let key = arc_key(geometry);
        self.lines.entry(key).or_insert_with(|| {
            let vertices = line_vertices(geometry);
            GpuLine {
                _source: geometry.clone(),
                vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Line Vertices"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                vertex_count: vertices.len() as u32,
                mode: geometry.mode,
            }
        });
        key
    }

    pub fn points(&mut self, device: &wgpu::Device, geometry: &Arc<PointGeometry>) -> usize {
        let key = arc_key(geometry);
        self.points.entry(key).or_insert_with(|| {
            let instances = point_instances(geometry);
            GpuPoints {
                _source: geometry.clone(),
                instances: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Point Instances"),
                    contents: bytemuck::cast_slice(&instances),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                count: instances.len() as u32,
            }
        });
        key
    }

    pub fn get_mesh(&self, key: usize) -> Option<&GpuMesh> {
        self.meshes.get(&key)
    }

    pub fn get_line(&self, key: usize) -> Option<&GpuLine> {
        self.lines.get(&key)
    }

    pub fn get_points(&self, key: usize) -> Option<&GpuPoints> {
        self.points.get(&key)
    }

    /// Write the node's uniform, creating its buffer on first use
    pub fn node(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        node: NodeId,
        uniform: &DrawUniform,
    ) {
        let binding = self.nodes.entry(node).or_insert_with(|| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Node Uniform"),
                size: std::mem::size_of::<DrawUniform>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("node_bind_group"),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            NodeBinding { buffer, bind_group }
        });
        queue.write_buffer(&binding.buffer, 0, bytemuck::bytes_of(uniform));
    }

    pub fn get_node(&self, node: NodeId) -> Option<&NodeBinding> {
        self.nodes.get(&node)
    }

    /// Upload the texture if it is ready and newer than the GPU copy; returns its cache key
    pub fn texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        registry: &TextureRegistry,
        id: Option<TextureId>,
    ) -> Option<(TextureId, u64)> {
        let id = id?;
        let (data, generation) = registry.ready(id)?;

        let stale = self
            .textures
            .get(&id)
            .map_or(true, |(uploaded, _)| *uploaded != generation);
        if stale {
            let view = upload_texture(device, queue, data, "Material Texture");
            self.textures.insert(id, (generation, view));
            self.material_groups
                .retain(|(color, emissive), _| {
                    color.map_or(true, |(t, _)| t != id) && emissive.map_or(true, |(t, _)| t != id)
                });
        }
        Some((id, generation))
    }

    pub fn texture_view(&self, id: TextureId) -> Option<&wgpu::TextureView> {
        self.textures.get(&id).map(|(_, view)| view)
    }

    pub fn material_group(&self, key: &MapKey) -> Option<&wgpu::BindGroup> {
        self.material_groups.get(key)
    }

    pub fn insert_material_group(&mut self, key: MapKey, group: wgpu::BindGroup) {
        self.material_groups.insert(key, group);
    }

    pub fn has_material_group(&self, key: &MapKey) -> bool {
        self.material_groups.contains_key(key)
    }
}

pub fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    data: &TextureData,
    label: &str,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: data.width.max(1),
        height: data.height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size.width),
            rows_per_image: Some(size.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::geometry::box_geometry;

    #[test]
    fn test_vertex_strides() {
        assert_eq!(MeshVertex::layout().array_stride, 32);
        assert_eq!(LineVertex::layout().array_stride, 16);
        assert_eq!(PointInstance::layout().step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn test_mesh_vertices_interleave() {
        let geometry = box_geometry(2.0, 2.0, 2.0);
        let vertices = mesh_vertices(&geometry);
        assert_eq!(vertices.len(), geometry.vertex_count());
        assert_eq!(vertices[3].normal, geometry.normals[3]);
        assert_eq!(vertices[3].uv, geometry.uvs[3]);
    }

    #[test]
    fn test_line_vertices_carry_distance() {
        let line = LineGeometry::closed(vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)]);
        let vertices = line_vertices(&line);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[1].distance, 1.0);
        assert_eq!(vertices[3].position, [0.0, 0.0, 0.0]);
    }
}
