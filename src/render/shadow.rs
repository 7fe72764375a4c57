use std::f32::consts::PI;

use glam::{Mat4, Vec3, Vec4Swizzles};

use super::rasterizer::{clip_near, rasterize, ClipVertex, CullMode, Varyings};
use crate::geometry::Geometry;
use crate::light::SpotLight;

/// Depth map rendered from a spotlight's point of view
#[derive(Debug, Clone)]
pub struct ShadowMap {
    size: u32,
    view_projection: Mat4,
    bias: f32,
    depth: Vec<f32>,
}

impl ShadowMap {
    pub fn new(size: u32) -> Self {
        let size = size.max(1);
        Self {
            size,
            view_projection: Mat4::IDENTITY,
            bias: 0.0,
            depth: vec![f32::INFINITY; (size * size) as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Perspective covering the light's cone, looking at `target`
    pub fn light_view_projection(light: &SpotLight, target: Vec3) -> Mat4 {
        let fov = (2.0 * light.angle).clamp(0.01, PI - 0.01);
        let far = if light.distance > 0.0 {
            light.distance
        } else {
            light.shadow.far
        };

        let mut direction = target - light.position;
        if direction.length_squared() < 1e-8 {
            direction = Vec3::NEG_Y;
        }
        let up = if direction.normalize().dot(Vec3::Y).abs() > 0.999 {
            Vec3::Z
        } else {
            Vec3::Y
        };

        Mat4::perspective_rh(fov, 1.0, light.shadow.near, far)
            * Mat4::look_at_rh(light.position, light.position + direction, up)
    }

    /// Render the back faces of every caster into the depth map
    pub fn render<'a>(
        &mut self,
        light: &SpotLight,
        target: Vec3,
        casters: impl IntoIterator<Item = (&'a Geometry, Mat4)>,
    ) {
        self.view_projection = Self::light_view_projection(light, target);
        self.bias = light.shadow.bias;
        self.depth.fill(f32::INFINITY);

        let size = self.size;
        for (geometry, model) in casters {
            let mvp = self.view_projection * model;
            for tri in geometry.triangles() {
                let clip = tri.map(|v| ClipVertex {
                    position: mvp * v.position.extend(1.0),
                    varyings: Varyings::default(),
                });
                for clipped in clip_near(&clip).as_slice() {
                    let depth = &mut self.depth;
                    rasterize(clipped, size, size, CullMode::Front, |f| {
                        let i = (f.y * size + f.x) as usize;
                        if f.depth < depth[i] {
                            depth[i] = f.depth;
                        }
                    });
                }
            }
        }
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        (x < self.size && y < self.size).then(|| self.depth[(y * self.size + x) as usize])
    }

    /// Fraction of a 3x3 texel neighbourhood that sees `world` lit
    ///
    /// Points outside the light frustum count as lit.
    pub fn visibility(&self, world: Vec3) -> f32 {
        let clip = self.view_projection * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return 1.0;
        }
        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || !(0.0..=1.0).contains(&ndc.z) {
            return 1.0;
        }

        let size = self.size as i64;
        let cx = ((ndc.x * 0.5 + 0.5) * self.size as f32).floor() as i64;
        let cy = ((0.5 - ndc.y * 0.5) * self.size as f32).floor() as i64;
        let reference = ndc.z - self.bias;

        let mut lit = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let x = (cx + dx).clamp(0, size - 1);
                let y = (cy + dy).clamp(0, size - 1);
                if reference <= self.depth[(y * size + x) as usize] {
                    lit += 1;
                }
            }
        }
        lit as f32 / 9.0
    }
}
