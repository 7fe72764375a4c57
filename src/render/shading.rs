//! Physically based shading: Lambert diffuse, GGX specular and an optional
//! clear-coat layer, lit by spotlights and an ambient term.

use std::f32::consts::PI;

use glam::Vec3;

use super::rasterizer::Varyings;
use super::shadow::ShadowMap;
use crate::light::{Fog, SpotLight};
use crate::material::PhysicalMaterial;

const MIN_ROUGHNESS: f32 = 0.0525;
const DIELECTRIC_F0: f32 = 0.04;

/// A spotlight resolved for one frame
#[derive(Debug, Clone, Copy)]
pub struct LitSpot<'a> {
    pub light: &'a SpotLight,
    /// Unit vector from the light towards its target
    pub axis: Vec3,
    pub shadow: Option<&'a ShadowMap>,
}

impl<'a> LitSpot<'a> {
    pub fn new(light: &'a SpotLight, target: Vec3, shadow: Option<&'a ShadowMap>) -> Self {
        let axis = (target - light.position).try_normalize().unwrap_or(Vec3::NEG_Y);
        Self { light, axis, shadow }
    }
}

#[derive(Debug, Clone)]
pub struct ShadingContext<'a> {
    pub eye: Vec3,
    /// Unit view direction, used for fog depth
    pub forward: Vec3,
    pub ambient: Vec3,
    pub spots: Vec<LitSpot<'a>>,
    pub fog: Option<Fog>,
}

fn schlick(f0: Vec3, f90: f32, cos: f32) -> Vec3 {
    let fresnel = (1.0 - cos).clamp(0.0, 1.0).powi(5);
    f0 * (1.0 - fresnel) + Vec3::splat(f90 * fresnel)
}

fn brdf_ggx(l: Vec3, v: Vec3, n: Vec3, f0: Vec3, roughness: f32) -> Vec3 {
    let alpha = roughness.clamp(MIN_ROUGHNESS, 1.0).powi(2);
    let a2 = alpha * alpha;
    let h = (l + v).normalize_or_zero();

    let dot_nl = n.dot(l).clamp(0.0, 1.0);
    let dot_nv = n.dot(v).clamp(0.0, 1.0);
    let dot_nh = n.dot(h).clamp(0.0, 1.0);
    let dot_vh = v.dot(h).clamp(0.0, 1.0);

    let f = schlick(f0, 1.0, dot_vh);

    let gv = dot_nl * (a2 + (1.0 - a2) * dot_nv * dot_nv).sqrt();
    let gl = dot_nv * (a2 + (1.0 - a2) * dot_nl * dot_nl).sqrt();
    let visibility = 0.5 / (gv + gl).max(1e-6);

    let denom = dot_nh * dot_nh * (a2 - 1.0) + 1.0;
    let distribution = a2 / (PI * denom * denom);

    f * (visibility * distribution)
}

/// Linear radiance leaving a surface point towards the eye, before fog
pub fn shade(
    ctx: &ShadingContext<'_>,
    material: &PhysicalMaterial,
    varyings: &Varyings,
    front_facing: bool,
    receive_shadow: bool,
) -> Vec3 {
    let albedo = material.albedo(varyings.uv);
    let mut n = varyings.normal.normalize_or_zero();
    if !front_facing {
        n = -n;
    }
    let p = varyings.world;
    let v = (ctx.eye - p).normalize_or_zero();

    let diffuse_color = albedo * (1.0 - material.metalness);
    let f0 = Vec3::splat(DIELECTRIC_F0).lerp(albedo, material.metalness);

    let mut diffuse = ctx.ambient * diffuse_color / PI;
    let mut specular = Vec3::ZERO;
    let mut coat = Vec3::ZERO;

    for spot in &ctx.spots {
        let light = spot.light;
        let to_light = light.position - p;
        let distance = to_light.length();
        if distance <= f32::EPSILON {
            continue;
        }
        let l = to_light / distance;

        let dot_nl = n.dot(l);
        if dot_nl <= 0.0 {
            continue;
        }

        let cone = light.cone_attenuation((-l).dot(spot.axis));
        if cone <= 0.0 {
            continue;
        }

        let mut radiance =
            light.color.to_vec3() * (light.intensity * cone * light.distance_attenuation(distance));
        if receive_shadow && light.cast_shadow {
            if let Some(shadow) = spot.shadow {
                radiance *= shadow.visibility(p);
            }
        }

        let irradiance = radiance * dot_nl;
        diffuse += irradiance * diffuse_color / PI;
        specular += irradiance * brdf_ggx(l, v, n, f0, material.roughness);
        if material.clearcoat > 0.0 {
            coat += irradiance * brdf_ggx(l, v, n, Vec3::splat(DIELECTRIC_F0), 0.0);
        }
    }

    let mut color = diffuse + specular;
    if material.clearcoat > 0.0 {
        let fresnel = schlick(Vec3::splat(DIELECTRIC_F0), 1.0, n.dot(v).clamp(0.0, 1.0));
        color = color * (Vec3::ONE - fresnel * material.clearcoat) + coat * material.clearcoat;
    }
    color
}

/// Blend toward the fog color by view depth
pub fn apply_fog(ctx: &ShadingContext<'_>, color: Vec3, world: Vec3) -> Vec3 {
    match &ctx.fog {
        Some(fog) => {
            let depth = (world - ctx.eye).dot(ctx.forward);
            color.lerp(fog.color.to_vec3(), fog.factor(depth))
        }
        None => color,
    }
}
