pub mod animation;
pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod frame;
pub mod geometry;
pub mod headless;
pub mod light;
pub mod loaders;
pub mod material;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod stats;
pub mod texture;

pub use config::AppConfig;
pub use scene::Scene;
pub use texture::generate_checkerboard_texture;
