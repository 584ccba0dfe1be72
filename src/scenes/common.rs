use std::sync::Arc;

use glam::Vec3;

use crate::geometry::{Geometry, LineGeometry};
use crate::math::Color;
use crate::scene::{Light, LineMaterial, MeshMaterial, NodeId, SceneGraph, SceneNode, Side};

pub const FILL_COLOR: Color = Color::from_hex(0x515151);
pub const WIRE_COLOR: Color = Color::from_hex(0xffff00);

/// White light from the upper left, in front of the origin
pub fn key_light() -> Light {
    Light::directional(Color::WHITE, 1.0, Vec3::new(-1.0, 2.0, 4.0))
}

/// `group` holding a grey fill of `mesh` with its yellow wireframe drawn over it
pub fn outlined(
    graph: &mut SceneGraph,
    parent: NodeId,
    group: SceneNode,
    mesh: Geometry,
) -> NodeId {
    let wire = LineGeometry::wireframe(&mesh);
    let group = graph.add(parent, group);
    graph.add(
        group,
        SceneNode::mesh(Arc::new(mesh), MeshMaterial::phong(FILL_COLOR).side(Side::Double)),
    );
    graph.add(group, SceneNode::line(Arc::new(wire), LineMaterial::new(WIRE_COLOR)));
    group
}

/// Red X, green Y and blue Z axis lines of `length` from the origin of `parent`
pub fn axes(graph: &mut SceneGraph, parent: NodeId, length: f32) {
    for (direction, color) in [
        (Vec3::X, 0xff0000),
        (Vec3::Y, 0x00ff00),
        (Vec3::Z, 0x0000ff),
    ] {
        let line = LineGeometry::strip(vec![Vec3::ZERO, direction * length]);
        graph.add(
            parent,
            SceneNode::line(Arc::new(line), LineMaterial::new(Color::from_hex(color))),
        );
    }
}
