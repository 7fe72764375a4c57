mod aabb;
mod color;

pub use aabb::Aabb;
pub use color::{hsl_to_rgb, linear_to_srgb, srgb_to_linear, Color};
