use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::{DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR};
use crate::error::{Result, ViewerError};
use crate::math::Color;

/// Viewer settings; every field may be omitted from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: Color,
    /// 4x multisampling
    pub antialias: bool,
    /// Overrides the scene's own choice when set
    pub controls: Option<bool>,
    pub asset_dir: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            clear_color: Color::BLACK,
            antialias: true,
            controls: None,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ViewerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ViewerError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ViewerError::Config(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ViewerError::Config(format!(
                "clip planes must satisfy 0 < near < far, got {} / {}",
                self.near, self.far
            )));
        }
        Ok(())
    }

    /// 4 with antialiasing, 1 without
    pub fn sample_count(&self) -> u32 {
        if self.antialias {
            4
        } else {
            1
        }
    }
}
