// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;
use sheet_viewer::config::ViewerConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "sheet-viewer")]
#[command(about = "Spinning sheet viewer with orbit controls", long_about = None)]
pub struct Cli {
    /// JSON configuration file; missing fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Sheet rotation per frame in radians
    #[arg(long = "rotation-step", allow_negative_numbers = true)]
    pub rotation_step: Option<f64>,

    /// Apply control input immediately instead of easing it in
    #[arg(long = "no-damping", default_value = "false")]
    pub no_damping: bool,

    /// Present frames as fast as possible
    #[arg(long = "vsync-off", default_value = "false")]
    pub vsync_off: bool,
}

impl Cli {
    /// Loads the config file, if any, and applies command-line overrides
    pub fn resolve_config(&self) -> Result<ViewerConfig, sheet_viewer::ViewerError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_json_file(path)?,
            None => ViewerConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ViewerConfig) {
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(step) = self.rotation_step {
            config.sheet.rotation_step = step;
        }
        if self.no_damping {
            config.controls.enable_damping = false;
        }
        if self.vsync_off {
            config.renderer.vsync = false;
        }
    }
}
