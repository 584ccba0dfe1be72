use std::path::{Path, PathBuf};

use crate::geometry::Font;
use crate::scene::TextureData;

use super::font::read_font;
use super::pending::{AssetResult, PendingAsset};
use super::texture::read_texture;

/// Loads textures and fonts relative to an asset directory on background threads
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_dir: PathBuf,
}

impl AssetLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Start loading an image; the frame loop picks the result up later
    pub fn load_texture(&self, path: impl AsRef<Path>) -> PendingAsset<TextureData> {
        self.spawn("texture", self.resolve(path), |path| {
            let texture = read_texture(path)?;
            log::info!(
                "Loaded texture {} ({}x{})",
                path.display(),
                texture.width,
                texture.height
            );
            Ok(texture)
        })
    }

    /// Start loading a TrueType or OpenType font
    pub fn load_font(&self, path: impl AsRef<Path>) -> PendingAsset<Font> {
        self.spawn("font", self.resolve(path), |path| {
            let font = read_font(path)?;
            log::info!("Loaded font {}", path.display());
            Ok(font)
        })
    }

    fn spawn<T, F>(&self, kind: &str, full_path: PathBuf, read: F) -> PendingAsset<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> AssetResult<T> + Send + 'static,
    {
        let label = full_path.display().to_string();
        let (sender, pending) = PendingAsset::channel(label.clone());

        let spawned = std::thread::Builder::new()
            .name(format!("{}-load {}", kind, label))
            .spawn(move || {
                let result = read(&full_path);
                if let Err(e) = &result {
                    log::debug!("Load failed: {}", e);
                }
                sender.complete(result);
            });

        // A failed spawn drops the sender, so the pending asset reports cancellation
        if let Err(e) = spawned {
            log::warn!("Could not spawn {} loader thread for {}: {}", kind, label, e);
        }

        pending
    }
}
