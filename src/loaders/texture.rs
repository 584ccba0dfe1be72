use std::path::Path;

use crate::error::AssetError;
use crate::scene::TextureData;

use super::pending::AssetResult;

/// Decode PNG or JPEG bytes to RGBA8
pub fn decode_texture(path: &Path, bytes: &[u8]) -> AssetResult<TextureData> {
    let img = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    Ok(TextureData::new(rgba.width(), rgba.height(), rgba.into_raw()))
}

pub fn read_texture(path: &Path) -> AssetResult<TextureData> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_texture(path, &bytes)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_png(name: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("scene-viewer-{}-{}", std::process::id(), name));
        let mut img = image::RgbaImage::new(4, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_decode_png() {
        let path = temp_png("decode.png");
        let texture = read_texture(&path).unwrap();
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(&texture.rgba[..4], &[255, 0, 0, 255]);
        assert_eq!(texture.rgba.len(), 4 * 2 * 4);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = decode_texture(Path::new("bad.png"), b"not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }
}
