//! Application configuration: JSON file layered under command-line flags.

use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::cli::Cli;

/// Half-open numeric interval `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a unit random value onto the interval
    pub fn sample(&self, unit: f32) -> f32 {
        self.min + (self.max - self.min) * unit
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }

    fn validate(&self, name: &str) -> Result<()> {
        ensure!(
            self.min.is_finite() && self.max.is_finite(),
            "{name}: bounds must be finite"
        );
        ensure!(self.min <= self.max, "{name}: min {} exceeds max {}", self.min, self.max);
        Ok(())
    }
}

/// Parameters of the randomized spotlight animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub saturation: f32,
    pub lightness: f32,
    /// Cone angle targets in radians
    pub angle: Range,
    pub penumbra: Range,
    /// Target x and z offsets in world units
    pub position: Range,
    /// Tween duration in milliseconds
    pub duration_ms: Range,
    /// Delay between consecutive cycles of one light
    pub interval_ms: f32,
    /// Random delay before a light's first cycle
    pub stagger_ms: Range,
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            lightness: 0.5,
            angle: Range::new(0.1, 0.8),
            penumbra: Range::new(0.0, 1.0),
            position: Range::new(-5.0, 5.0),
            duration_ms: Range::new(2000.0, 5000.0),
            interval_ms: 5000.0,
            stagger_ms: Range::new(0.0, 5000.0),
            easing: Easing::QuadraticOut,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.saturation) && (0.0..=1.0).contains(&self.lightness),
            "animation: saturation and lightness must lie in [0, 1]"
        );
        self.angle.validate("animation.angle")?;
        ensure!(
            self.angle.min > 0.0 && self.angle.max <= FRAC_PI_2,
            "animation.angle: cone angles must lie in (0, pi/2]"
        );
        self.penumbra.validate("animation.penumbra")?;
        ensure!(
            self.penumbra.min >= 0.0 && self.penumbra.max <= 1.0,
            "animation.penumbra: must lie in [0, 1]"
        );
        self.position.validate("animation.position")?;
        self.duration_ms.validate("animation.duration_ms")?;
        ensure!(self.duration_ms.min > 0.0, "animation.duration_ms: must be positive");
        ensure!(
            self.interval_ms.is_finite() && self.interval_ms > 0.0,
            "animation.interval_ms: must be positive"
        );
        self.stagger_ms.validate("animation.stagger_ms")?;
        ensure!(self.stagger_ms.min >= 0.0, "animation.stagger_ms: must not be negative");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Liminal".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Framebuffer resolution relative to the window
    pub scale: f32,
    pub shadows: bool,
    pub shadow_map_size: u32,
    pub show_stats: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 0.5,
            shadows: true,
            shadow_map_size: 512,
            show_stats: true,
        }
    }
}

impl RenderConfig {
    /// Framebuffer size for an output of `width` x `height` pixels
    pub fn frame_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.scale).round() as u32).max(1);
        (scale(width), scale(height))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub model: Option<PathBuf>,
    /// Directory holding right/left/top/bottom/front/back.jpg
    pub skybox: Option<PathBuf>,
    /// Checkerboard tiles across the ground plane, per axis
    pub ground_repeat: [f32; 2],
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model: Some(PathBuf::from("models/greek.glb")),
            skybox: None,
            ground_repeat: [100.0, 100.0],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub scene: SceneConfig,
    pub animation: AnimationConfig,
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text).context("Invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to load config {}", path.display()))
    }

    /// File config (if any) with command-line overrides applied
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(model) = &cli.model {
            self.scene.model = Some(model.clone());
        }
        if cli.no_model {
            self.scene.model = None;
        }
        if let Some(skybox) = &cli.skybox {
            self.scene.skybox = Some(skybox.clone());
        }
        if let Some(seed) = cli.seed {
            self.scene.seed = Some(seed);
        }
        if let Some(width) = cli.width {
            self.window.width = width;
        }
        if let Some(height) = cli.height {
            self.window.height = height;
        }
        if let Some(scale) = cli.render_scale {
            self.render.scale = scale;
        }
        if cli.no_shadows {
            self.render.shadows = false;
        }
        if cli.no_ui {
            self.render.show_stats = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let [rx, ry] = self.scene.ground_repeat;
        if !(rx > 0.0 && ry > 0.0 && rx.is_finite() && ry.is_finite()) {
            bail!("scene.ground_repeat: tiling factors must be positive, got [{rx}, {ry}]");
        }
        ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window: dimensions must be non-zero"
        );
        ensure!(
            self.render.scale > 0.0 && self.render.scale <= 4.0,
            "render.scale: must lie in (0, 4]"
        );
        ensure!(
            self.render.shadow_map_size.is_power_of_two() && self.render.shadow_map_size >= 16,
            "render.shadow_map_size: must be a power of two of at least 16"
        );
        self.animation.validate()
    }
}
