use glam::Vec3;

use super::graph::SceneGraph;
use super::node::NodeId;

/// Rotation driven directly by elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub node: NodeId,
    /// Rotation at `t = 0`
    pub base: Vec3,
    /// Radians per second around each axis
    pub rate: Vec3,
}

impl Spin {
    pub fn rotation_at(&self, elapsed: f32) -> Vec3 {
        self.base + self.rate * elapsed
    }
}

/// Time-driven transform updates applied by the viewer's update step.
///
/// Every animation is a function of absolute elapsed time, so applying the
/// same time twice leaves the graph unchanged.
#[derive(Debug, Clone, Default)]
pub struct Animations {
    spins: Vec<Spin>,
}

impl Animations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spin `node` from its current rotation
    pub fn spin(&mut self, graph: &SceneGraph, node: NodeId, rate: Vec3) {
        let base = graph
            .get(node)
            .map(|n| n.transform.rotation)
            .unwrap_or(Vec3::ZERO);
        self.spins.push(Spin { node, base, rate });
    }

    pub fn push(&mut self, spin: Spin) {
        self.spins.push(spin);
    }

    pub fn apply(&self, graph: &mut SceneGraph, elapsed: f32) {
        for spin in &self.spins {
            if let Some(node) = graph.get_mut(spin.node) {
                node.transform.rotation = spin.rotation_at(elapsed);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.spins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }
}
