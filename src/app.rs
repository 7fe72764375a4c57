//! Windowed frame loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::core::{SurfaceRenderer, WinitController};
use crate::frame::FrameIterator;
use crate::render::Renderer;
use crate::scene::Scene;
use crate::stats::{draw_overlay, FrameStats};

/// Build the scene and start its clock; the animator's time zero is the
/// first frame, not process start
fn start_scene(config: &AppConfig, aspect: f32) -> Result<(Scene, FrameIterator)> {
    let scene = Scene::build(config, aspect)?;
    Ok((scene, FrameIterator::new()))
}

struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    presenter: Option<SurfaceRenderer>,
    scene: Option<Scene>,
    renderer: Renderer,
    controller: WinitController,
    /// Started after setup; the first frame is animation time zero
    frames: Option<FrameIterator>,
    stats: FrameStats,
    pixels: Vec<u8>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let (width, height) = config
            .render
            .frame_size(config.window.width, config.window.height);
        let renderer = Renderer::new(width, height, config.render.shadows);
        Self {
            config,
            window: None,
            presenter: None,
            scene: None,
            renderer,
            controller: WinitController::new(),
            frames: None,
            stats: FrameStats::new(),
            pixels: Vec::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(self.config.window.title.clone())
                        .with_inner_size(winit::dpi::LogicalSize::new(
                            self.config.window.width,
                            self.config.window.height,
                        )),
                )
                .context("Failed to create window")?,
        );

        let size = window.inner_size();
        let (width, height) = self.config.render.frame_size(size.width, size.height);
        self.renderer.resize(width, height);

        let presenter = pollster::block_on(SurfaceRenderer::new(
            window.clone(),
            (width, height),
            self.config.render.show_stats,
        ))
        .context("Failed to initialize presentation surface")?;

        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let (scene, frames) = start_scene(&self.config, aspect)?;

        log::info!(
            "Window {}x{}, rendering at {}x{}",
            size.width,
            size.height,
            width,
            height
        );

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.scene = Some(scene);
        self.frames = Some(frames);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(width, height);
        }
        if let Some(scene) = &mut self.scene {
            scene.resize(width, height);
        }
        let (frame_width, frame_height) = self.config.render.frame_size(width, height);
        self.renderer.resize(frame_width, frame_height);
    }

    fn redraw(&mut self) {
        let (Some(scene), Some(presenter), Some(window), Some(frames)) = (
            &mut self.scene,
            &mut self.presenter,
            &self.window,
            &mut self.frames,
        ) else {
            return;
        };

        let Some(frame) = frames.next() else {
            return;
        };
        if let Some(fps) = self.stats.update_fps(frame.delta_secs()) {
            log::debug!("FPS: {:.1}", fps);
        }

        let viewport_height = window.inner_size().height as f32;
        scene
            .controls
            .handle_input(&self.controller, &scene.camera, viewport_height);
        self.controller.reset_deltas();

        scene.update(frame.time_ms);

        let framebuffer = self.renderer.render(scene);
        let (width, height) = framebuffer.dimensions();
        framebuffer.write_rgba8(&mut self.pixels);
        let render_stats = self.renderer.stats();

        let stats = &self.stats;
        let scene = &*scene;
        if let Err(e) = presenter.present(&self.pixels, width, height, |ctx| {
            draw_overlay(ctx, stats, render_stats, scene)
        }) {
            log::error!("Render error: {:#}", e);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let Some(presenter) = &mut self.presenter {
            if presenter.handle_event(&event) {
                return;
            }
        }

        self.controller.process_event(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open a window and run the scene until it is closed
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config);

    log::info!("Controls: left drag rotates, right drag or arrows pan, wheel zooms, Escape quits");
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_with_the_scene() {
        let mut config = AppConfig::default();
        config.scene.model = None;
        config.scene.seed = Some(5);

        let (scene, mut frames) = start_scene(&config, 1.0).unwrap();
        let first = frames.next().unwrap();

        assert_eq!(scene.frames(), 0);
        assert_eq!(first.number, 0);
        assert!(first.time_ms < 50.0, "first frame at {}ms", first.time_ms);
    }
}
