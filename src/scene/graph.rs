use glam::Mat4;

use super::light::Light;
use super::node::{Drawable, NodeId, SceneNode};
use super::texture::TextureRegistry;

#[derive(Debug, Clone)]
struct Entry {
    node: SceneNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A drawable node resolved to world space
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub node: NodeId,
    pub world: Mat4,
    pub drawable: &'a Drawable,
}

/// Append-only node tree rooted at an empty group.
///
/// Nodes are stored in insertion order and a child is always inserted after
/// its parent, so one forward pass over the arena resolves every world
/// transform. Nodes are never removed.
#[derive(Debug)]
pub struct SceneGraph {
    entries: Vec<Entry>,
    lights: Vec<Light>,
    pub textures: TextureRegistry,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            entries: vec![Entry {
                node: SceneNode::group().named("root"),
                parent: None,
                children: Vec::new(),
            }],
            lights: Vec::new(),
            textures: TextureRegistry::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Attach `node` under `parent`; unknown parents fall back to the root
    pub fn add(&mut self, parent: NodeId, node: SceneNode) -> NodeId {
        let parent = if parent.0 < self.entries.len() {
            parent
        } else {
            log::warn!("Unknown parent node {}, attaching to root", parent.0);
            self.root()
        };

        let id = NodeId(self.entries.len());
        self.entries.push(Entry {
            node,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.entries[parent.0].children.push(id);
        id
    }

    pub fn add_to_root(&mut self, node: SceneNode) -> NodeId {
        self.add(self.root(), node)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.entries.get(id.0).map(|e| &e.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.entries.get_mut(id.0).map(|e| &mut e.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(id.0).and_then(|e| e.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entries
            .get(id.0)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    /// First node with the given name, in insertion order
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .position(|e| e.node.name.as_deref() == Some(name))
            .map(NodeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (NodeId(i), &e.node))
    }

    /// World matrix of every node, indexed by `NodeId::index`
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut worlds: Vec<Mat4> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let local = entry.node.transform.matrix();
            let world = match entry.parent {
                Some(parent) => worlds[parent.0] * local,
                None => local,
            };
            worlds.push(world);
        }
        worlds
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current {
            let Some(entry) = self.entries.get(node.0) else {
                break;
            };
            matrix = entry.node.transform.matrix() * matrix;
            current = entry.parent;
        }
        matrix
    }

    /// Drawables whose node and ancestors are all visible, in tree order
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let worlds = self.world_matrices();
        let mut shown = vec![false; self.entries.len()];
        let mut items = Vec::new();

        for (i, entry) in self.entries.iter().enumerate() {
            let parent_shown = entry.parent.map_or(true, |p| shown[p.0]);
            shown[i] = parent_shown && entry.node.visible;
            if !shown[i] {
                continue;
            }
            if let Some(drawable) = &entry.node.drawable {
                if let Drawable::Mesh { material, .. } = drawable {
                    if !material.visible {
                        continue;
                    }
                }
                items.push(DrawItem {
                    node: NodeId(i),
                    world: worlds[i],
                    drawable,
                });
            }
        }

        items
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec3;

    use super::*;
    use crate::geometry::box_geometry;
    use crate::math::Color;
    use crate::scene::MeshMaterial;

    fn cube() -> SceneNode {
        SceneNode::mesh(
            Arc::new(box_geometry(1.0, 1.0, 1.0)),
            MeshMaterial::basic(Color::from_hex(0x00ff00)),
        )
    }

    #[test]
    fn test_new_graph_has_root_only() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.parent(graph.root()), None);
        assert!(graph.draw_list().is_empty());
    }

    #[test]
    fn test_children_are_ordered() {
        let mut graph = SceneGraph::new();
        let a = graph.add_to_root(cube().named("a"));
        let b = graph.add_to_root(cube().named("b"));
        let c = graph.add(a, cube().named("c"));

        assert_eq!(graph.children(graph.root()), &[a, b]);
        assert_eq!(graph.children(a), &[c]);
        assert_eq!(graph.parent(c), Some(a));
        assert_eq!(graph.find("c"), Some(c));
        assert_eq!(graph.find("missing"), None);
    }

    #[test]
    fn test_world_matrix_composes_parent() {
        let mut graph = SceneGraph::new();
        let orbit = graph.add_to_root(
            SceneNode::group().with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0)),
        );
        let planet = graph.add(orbit, cube().at(10.0, 0.0, 0.0));

        let worlds = graph.world_matrices();
        let p = worlds[planet.index()].transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-5);
        assert!(worlds[planet.index()].abs_diff_eq(graph.world_matrix(planet), 1e-6));
    }

    #[test]
    fn test_hidden_parent_hides_subtree() {
        let mut graph = SceneGraph::new();
        let group = graph.add_to_root(SceneNode::group().hidden());
        graph.add(group, cube());
        graph.add_to_root(cube());

        assert_eq!(graph.draw_list().len(), 1);
    }

    #[test]
    fn test_unknown_parent_falls_back_to_root() {
        let mut graph = SceneGraph::new();
        let id = graph.add(NodeId(42), cube());
        assert_eq!(graph.parent(id), Some(graph.root()));
    }
}
