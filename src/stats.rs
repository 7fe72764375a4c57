//! Frame-rate meter and the on-screen stats overlay.

use crate::render::RenderStats;
use crate::scene::{AssetStatus, Scene};

/// Seconds between FPS refreshes
pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_count: u32,
    fps_update_timer: f32,
    fps: f32,
    frame_time_ms: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame of `delta` seconds; returns the new rate when it refreshes
    pub fn update_fps(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.fps_update_timer += delta;
        self.frame_time_ms = delta * 1000.0;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }
}

fn status_text(status: &AssetStatus) -> String {
    match status {
        AssetStatus::None => "none".to_string(),
        AssetStatus::Loading => "loading".to_string(),
        AssetStatus::Ready => "ready".to_string(),
        AssetStatus::Failed(reason) => format!("failed: {}", reason),
    }
}

/// Stats window in the top-left corner
pub fn draw_overlay(ctx: &egui::Context, stats: &FrameStats, render: RenderStats, scene: &Scene) {
    egui::Window::new("Stats")
        .title_bar(true)
        .resizable(false)
        .fixed_pos(egui::pos2(10.0, 10.0))
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("{:.0} FPS", stats.fps()))
                    .size(20.0)
                    .color(egui::Color32::from_rgb(74, 158, 255)),
            );
            ui.label(
                egui::RichText::new(format!("{:.2} ms", stats.frame_time_ms()))
                    .color(egui::Color32::GRAY),
            );
            ui.label(format!(
                "{} triangles, {} fragments",
                render.triangles, render.fragments
            ));

            ui.separator();
            ui.label(format!("model: {}", status_text(scene.model_status())));
            ui.label(format!("skybox: {}", status_text(scene.background_status())));

            ui.separator();
            ui.label(
                egui::RichText::new("Lights")
                    .strong()
                    .color(egui::Color32::from_rgb(200, 150, 100)),
            );
            for (i, light) in scene.lights.iter().enumerate() {
                let [r, g, b] = [light.color.r, light.color.g, light.color.b]
                    .map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
                ui.label(
                    egui::RichText::new(format!(
                        "#{} angle {:.2} penumbra {:.2} cycles {}",
                        i,
                        light.angle,
                        light.penumbra,
                        scene.animator().cycles(i)
                    ))
                    .color(egui::Color32::from_rgb(r, g, b)),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_refreshes_once_per_interval() {
        let mut stats = FrameStats::new();
        for _ in 0..59 {
            assert_eq!(stats.update_fps(1.0 / 60.0), None);
        }
        let fps = stats.update_fps(1.0 / 60.0 + 1e-4);
        assert!(fps.is_some_and(|fps| (fps - 60.0).abs() < 0.5));
        assert!((stats.frame_time_ms() - 16.77).abs() < 0.1);
    }

    #[test]
    fn test_status_text_includes_failure_reason() {
        assert_eq!(status_text(&AssetStatus::Failed("gone".into())), "failed: gone");
    }
}
