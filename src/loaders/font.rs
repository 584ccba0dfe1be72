use std::path::Path;

use crate::error::AssetError;
use crate::geometry::Font;

use super::pending::AssetResult;

pub fn decode_font(path: &Path, bytes: Vec<u8>) -> AssetResult<Font> {
    Font::from_bytes(bytes).map_err(|source| AssetError::Font {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a TrueType or OpenType file
pub fn read_font(path: &Path) -> AssetResult<Font> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_font(path, bytes)
}
