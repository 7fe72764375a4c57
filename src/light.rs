//! Light sources and fog.

use std::f32::consts::PI;

use glam::Vec3;

use crate::math::Color;

/// What a spotlight points at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightTarget {
    /// Fixed world-space point
    Point(Vec3),
    /// The loaded model's position, once available
    Model,
}

/// Shadow map parameters for a shadow-casting light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    /// Depth offset against self-shadowing, in normalized depth units
    pub bias: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 512,
            near: 0.5,
            far: 500.0,
            bias: 0.000_05,
        }
    }
}

/// Cone light with soft edge and physically based distance decay
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub color: Color,
    /// Luminous intensity in candela
    pub intensity: f32,
    /// Range cutoff; zero means unlimited
    pub distance: f32,
    /// Cone half-angle in radians, at most PI/2
    pub angle: f32,
    /// Soft-edge fraction of the cone in [0, 1]
    pub penumbra: f32,
    pub decay: f32,
    pub position: Vec3,
    pub target: LightTarget,
    pub cast_shadow: bool,
    pub shadow: ShadowSettings,
}

impl SpotLight {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            intensity: 1.0,
            distance: 0.0,
            angle: PI / 3.0,
            penumbra: 0.0,
            decay: 2.0,
            position: Vec3::new(0.0, 1.0, 0.0),
            target: LightTarget::Point(Vec3::ZERO),
            cast_shadow: false,
            shadow: ShadowSettings::default(),
        }
    }

    /// Falloff across the cone edge for the cosine between the light axis and
    /// the direction to the shaded point
    pub fn cone_attenuation(&self, cos_to_point: f32) -> f32 {
        let cone_cos = self.angle.cos();
        let penumbra_cos = (self.angle * (1.0 - self.penumbra)).cos();
        smoothstep(cone_cos, penumbra_cos, cos_to_point)
    }

    /// Inverse-power falloff with an optional smooth range cutoff
    pub fn distance_attenuation(&self, distance: f32) -> f32 {
        let falloff = 1.0 / distance.powf(self.decay).max(0.01);
        if self.distance > 0.0 {
            let ratio = (distance / self.distance).powi(4);
            falloff * (1.0 - ratio).clamp(0.0, 1.0).powi(2)
        } else {
            falloff
        }
    }
}

/// Uniform light applied to every surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color) -> Self {
        Self { color, intensity: 1.0 }
    }

    pub fn radiance(&self) -> Vec3 {
        self.color.to_vec3() * self.intensity
    }
}

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    pub fn new(color: Color, near: f32, far: f32) -> Self {
        Self { color, near, far }
    }

    /// Blend weight of the fog color at view depth `depth`
    pub fn factor(&self, depth: f32) -> f32 {
        smoothstep(self.near, self.far, depth)
    }
}

pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_attenuation_inside_and_outside() {
        let mut light = SpotLight::new(Color::WHITE);
        light.angle = PI / 8.0;
        light.penumbra = 0.0;

        assert_eq!(light.cone_attenuation(1.0), 1.0);
        assert_eq!(light.cone_attenuation((PI / 4.0).cos()), 0.0);
    }

    #[test]
    fn test_full_penumbra_softens_whole_cone() {
        let mut light = SpotLight::new(Color::WHITE);
        light.angle = PI / 8.0;
        light.penumbra = 1.0;

        let halfway = light.cone_attenuation((PI / 16.0).cos());
        assert!(halfway > 0.0 && halfway < 1.0);
        assert_eq!(light.cone_attenuation(1.0), 1.0);
    }

    #[test]
    fn test_distance_attenuation_follows_decay() {
        let light = SpotLight::new(Color::WHITE);
        assert!((light.distance_attenuation(2.0) - 0.25).abs() < 1e-6);
        // Clamped near the source
        assert_eq!(light.distance_attenuation(0.0), 100.0);
    }

    #[test]
    fn test_distance_cutoff_reaches_zero() {
        let mut light = SpotLight::new(Color::WHITE);
        light.distance = 10.0;
        assert_eq!(light.distance_attenuation(10.0), 0.0);
        assert!(light.distance_attenuation(5.0) > 0.0);
    }

    #[test]
    fn test_fog_factor_ramps_between_near_and_far() {
        let fog = Fog::new(Color::BLACK, 1.0, 100.0);
        assert_eq!(fog.factor(0.5), 0.0);
        assert_eq!(fog.factor(150.0), 1.0);
        let mid = fog.factor(50.5);
        assert!((mid - 0.5).abs() < 1e-3);
    }
}
