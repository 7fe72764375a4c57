// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "liminal")]
#[command(about = "Animated spotlight scene", long_about = None)]
pub struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// glTF/GLB model to load into the scene
    #[arg(long, value_name = "FILE", conflicts_with = "no_model")]
    pub model: Option<PathBuf>,

    /// Skip loading a model
    #[arg(long = "no-model", default_value = "false")]
    pub no_model: bool,

    /// Directory holding right/left/top/bottom/front/back.jpg cubemap faces
    #[arg(long, value_name = "DIR")]
    pub skybox: Option<PathBuf>,

    /// Seed for the light animation random source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Rasterizer resolution relative to the window
    #[arg(long = "render-scale")]
    pub render_scale: Option<f32>,

    /// Disable shadow mapping
    #[arg(long = "no-shadows", default_value = "false")]
    pub no_shadows: bool,

    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Render offscreen and write a PNG instead of opening a window
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// Output image for headless mode
    #[arg(long, value_name = "PNG", default_value = "liminal.png")]
    pub output: PathBuf,
}
