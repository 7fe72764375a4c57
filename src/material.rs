use glam::{Vec2, Vec3};

use crate::math::Color;
use crate::texture::Texture;

/// Physically based surface description
#[derive(Debug, Clone)]
pub struct PhysicalMaterial {
    pub color: Color,
    pub map: Option<Texture>,
    pub metalness: f32,
    pub roughness: f32,
    /// Strength of the glossy clear layer on top of the base
    pub clearcoat: f32,
    /// Fraction of light passing through the surface
    pub transmission: f32,
    pub transparent: bool,
}

impl Default for PhysicalMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            map: None,
            metalness: 0.0,
            roughness: 1.0,
            clearcoat: 0.0,
            transmission: 0.0,
            transparent: false,
        }
    }
}

impl PhysicalMaterial {
    /// Base color at a surface UV (v pointing up), modulated by the map
    pub fn albedo(&self, uv: Vec2) -> Vec3 {
        let base = self.color.to_vec3();
        match &self.map {
            Some(map) => base * map.sample_color(Vec2::new(uv.x, 1.0 - uv.y)),
            None => base,
        }
    }

    /// Coverage used when blending a transparent surface
    pub fn opacity(&self) -> f32 {
        if self.transparent {
            (1.0 - self.transmission * 0.85).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
