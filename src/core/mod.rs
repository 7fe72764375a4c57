//! Platform plumbing: drawing canvas, input and presentation

mod canvas;
mod controller;
mod gpu_context;
mod input_adapter;
mod surface_renderer;

pub use canvas::{Canvas, DrawOp, Rgba};
pub use controller::{Button, Controller};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use surface_renderer::SurfaceRenderer;
