use std::path::Path;

use crate::error::AssetError;
use crate::geometry::Font;
use crate::scene::{NodeId, SceneGraph, SceneNode, TextureData, TextureId};

use super::loader::AssetLoader;
use super::pending::PendingAsset;

/// Builds a node from a freshly loaded texture
pub type NodeBuilder = Box<dyn FnOnce(TextureId, &TextureData) -> SceneNode>;

/// Adds nodes built from a freshly loaded font under the given parent and
/// returns the root of what it added
pub type FontNodeBuilder = Box<dyn FnOnce(&Font, &mut SceneGraph, NodeId) -> NodeId>;

/// Called once per failed load
pub type FailureHook = Box<dyn FnMut(&str, &AssetError)>;

/// What happens to the scene graph when a texture load finishes
pub enum Completion {
    /// Fill a reserved texture slot
    Texture(TextureId),
    /// Register the texture and attach a node built from it
    Insert { parent: NodeId, build: NodeBuilder },
}

enum Job {
    Texture {
        pending: PendingAsset<TextureData>,
        completion: Completion,
    },
    Font {
        pending: PendingAsset<Font>,
        parent: NodeId,
        build: FontNodeBuilder,
    },
}

enum Step {
    Waiting(Job),
    Applied,
    Failed(String, AssetError),
}

impl Job {
    /// Apply the result to `graph` if it has arrived
    fn step(self, graph: &mut SceneGraph) -> Step {
        match self {
            Job::Texture {
                mut pending,
                completion,
            } => {
                let Some(result) = pending.try_take() else {
                    return Step::Waiting(Job::Texture {
                        pending,
                        completion,
                    });
                };
                match (result, completion) {
                    (Ok(data), Completion::Texture(id)) => graph.textures.fulfill(id, data),
                    (Ok(data), Completion::Insert { parent, build }) => {
                        let texture = graph.textures.insert(pending.label(), data.clone());
                        let node = graph.add(parent, build(texture, &data));
                        log::debug!("Inserted node {} for {}", node.index(), pending.label());
                    }
                    (Err(e), completion) => {
                        if let Completion::Texture(id) = completion {
                            graph.textures.fail(id);
                        }
                        return Step::Failed(pending.label().to_string(), e);
                    }
                }
                Step::Applied
            }
            Job::Font {
                mut pending,
                parent,
                build,
            } => {
                let Some(result) = pending.try_take() else {
                    return Step::Waiting(Job::Font {
                        pending,
                        parent,
                        build,
                    });
                };
                match result {
                    Ok(font) => {
                        let node = build(&font, graph, parent);
                        log::debug!("Inserted node {} for {}", node.index(), pending.label());
                        Step::Applied
                    }
                    Err(e) => Step::Failed(pending.label().to_string(), e),
                }
            }
        }
    }
}

/// Loads in flight, drained by the viewer's mutation step.
///
/// The graph is only touched from [`AssetQueue::apply`], which runs between
/// frames, so completions never race the update step. Results that arrive
/// after the queue is dropped are discarded.
#[derive(Default)]
pub struct AssetQueue {
    jobs: Vec<Job>,
    on_error: Option<FailureHook>,
}

impl AssetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the callback told about failed loads
    pub fn on_error(&mut self, hook: impl FnMut(&str, &AssetError) + 'static) {
        self.on_error = Some(Box::new(hook));
    }

    /// Reserve a texture slot in `graph` and fill it once `path` has loaded
    pub fn texture(
        &mut self,
        graph: &mut SceneGraph,
        loader: &AssetLoader,
        path: impl AsRef<Path>,
    ) -> TextureId {
        let pending = loader.load_texture(path);
        let id = graph.textures.reserve(pending.label());
        self.push(pending, Completion::Texture(id));
        id
    }

    /// Attach a node built from the loaded image under `parent`
    pub fn insert_when_ready(
        &mut self,
        pending: PendingAsset<TextureData>,
        parent: NodeId,
        build: impl FnOnce(TextureId, &TextureData) -> SceneNode + 'static,
    ) {
        self.push(
            pending,
            Completion::Insert {
                parent,
                build: Box::new(build),
            },
        );
    }

    /// Attach nodes built from the loaded font under `parent`
    pub fn insert_with_font(
        &mut self,
        pending: PendingAsset<Font>,
        parent: NodeId,
        build: impl FnOnce(&Font, &mut SceneGraph, NodeId) -> NodeId + 'static,
    ) {
        self.jobs.push(Job::Font {
            pending,
            parent,
            build: Box::new(build),
        });
    }

    pub fn push(&mut self, pending: PendingAsset<TextureData>, completion: Completion) {
        self.jobs.push(Job::Texture {
            pending,
            completion,
        });
    }

    /// Apply every finished load to `graph`; returns how many finished
    pub fn apply(&mut self, graph: &mut SceneGraph) -> usize {
        let mut finished = 0;
        let mut remaining = Vec::with_capacity(self.jobs.len());

        for job in self.jobs.drain(..) {
            match job.step(graph) {
                Step::Waiting(job) => {
                    remaining.push(job);
                    continue;
                }
                Step::Applied => {}
                Step::Failed(label, e) => {
                    log::warn!("Asset load failed: {}", e);
                    if let Some(hook) = self.on_error.as_mut() {
                        hook(&label, &e);
                    }
                }
            }
            finished += 1;
        }

        self.jobs = remaining;
        finished
    }

    pub fn pending_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_idle(&self) -> bool {
        self.jobs.is_empty()
    }
}
