mod font;
mod loader;
mod pending;
mod queue;
mod texture;

pub use font::{decode_font, read_font};
pub use loader::AssetLoader;
pub use pending::{AssetResult, AssetSender, PendingAsset};
pub use queue::{AssetQueue, Completion, FailureHook, FontNodeBuilder, NodeBuilder};
pub use texture::{decode_texture, read_texture};
