use std::path::PathBuf;

use thiserror::Error;

/// Failures creating or driving the render surface
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Window error: {0}")]
    Window(String),

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter: {0}")]
    Adapter(String),

    #[error("Device error: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Render error: {0}")]
    Render(#[from] wgpu::SurfaceError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

/// Failures loading an asset in the background
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to parse font {}: {source}", path.display())]
    Font {
        path: PathBuf,
        source: ttf_parser::FaceParsingError,
    },

    #[error("Loader dropped before {0} completed")]
    Cancelled(String),
}
