// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::ViewerConfig;
use crate::error::Result;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-viewer")]
#[command(about = "wgpu 3D scene viewer", long_about = None)]
pub struct Cli {
    /// Example scene to show
    #[arg(long, env = "SCENE", default_value = "basic")]
    pub scene: String,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Directory textures are loaded from
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Disable orbit controls
    #[arg(long = "no-controls", default_value = "false")]
    pub no_controls: bool,

    /// Disable multisampling
    #[arg(long = "no-antialias", default_value = "false")]
    pub no_antialias: bool,

    /// JSON file with viewer settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the available scenes and exit
    #[arg(long = "list-scenes", default_value = "false")]
    pub list_scenes: bool,
}

impl Cli {
    /// Settings from `--config` (or defaults) with command-line flags applied on top
    pub fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };
        if let Some(assets) = &self.assets {
            config.asset_dir = assets.clone();
        }
        if self.no_controls {
            config.controls = Some(false);
        }
        if self.no_antialias {
            config.antialias = false;
        }
        Ok(config)
    }
}
