//! Offscreen rendering to a PNG file.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::frame::FixedStep;
use crate::render::Renderer;
use crate::scene::Scene;

/// Advance the scene `frames` times at 60 Hz and write the last frame to `output`
///
/// Assets are loaded before the first frame so the result does not depend on
/// loader timing; with a configured seed the image is reproducible.
pub fn render_to_png(config: &AppConfig, frames: u32, output: &Path) -> Result<()> {
    let (width, height) = config
        .render
        .frame_size(config.window.width, config.window.height);

    let mut scene = Scene::build(config, width as f32 / height as f32)?;
    scene.wait_for_assets();

    for frame in FixedStep::sixty_hz().take(frames.max(1) as usize) {
        scene.update(frame.time_ms);
    }

    let mut renderer = Renderer::new(width, height, config.render.shadows);
    let pixels = renderer.render(&scene).to_rgba8();
    let stats = renderer.stats();
    log::info!(
        "Rendered frame {} at {}x{}: {} triangles, {} fragments",
        scene.frames(),
        width,
        height,
        stats.triangles,
        stats.fragments
    );

    let image = image::RgbaImage::from_raw(width, height, pixels)
        .context("Framebuffer size does not match its dimensions")?;
    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Wrote {}", output.display());
    Ok(())
}
