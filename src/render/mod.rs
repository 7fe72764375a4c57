//! CPU renderer: shadow passes, an opaque pass with depth writes and a
//! back-to-front transparent pass, resolved into an sRGB framebuffer.

mod framebuffer;
mod rasterizer;
mod shading;
mod shadow;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4Swizzles};

pub use framebuffer::Framebuffer;
pub use rasterizer::{clip_near, rasterize, ClipVertex, Clipped, CullMode, Fragment, Varyings};
pub use shading::{apply_fog, shade, LitSpot, ShadingContext};
pub use shadow::ShadowMap;

use crate::math::srgb_to_linear;
use crate::scene::{DrawItem, Scene};
use crate::texture::Cubemap;

/// Counters from the most recent frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub fragments: usize,
    pub shadow_maps: usize,
}

pub struct Renderer {
    framebuffer: Framebuffer,
    shadow_maps: Vec<ShadowMap>,
    shadows: bool,
    stats: RenderStats,
}

impl Renderer {
    pub fn new(width: u32, height: u32, shadows: bool) -> Self {
        Self {
            framebuffer: Framebuffer::new(width.max(1), height.max(1)),
            shadow_maps: Vec::new(),
            shadows,
            stats: RenderStats::default(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.framebuffer.resize(width, height);
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn render(&mut self, scene: &Scene) -> &Framebuffer {
        self.stats = RenderStats::default();
        let items = scene.draw_items();

        self.clear(scene);
        self.render_shadow_maps(scene, &items);

        let camera = &scene.camera;
        let view_projection = camera.view_projection();
        let targets: Vec<Vec3> = scene.lights.iter().map(|l| scene.light_target(l)).collect();
        let ctx = ShadingContext {
            eye: camera.position,
            forward: camera.forward(),
            ambient: scene.ambient.radiance(),
            spots: scene
                .lights
                .iter()
                .zip(&targets)
                .enumerate()
                .map(|(i, (light, &target))| {
                    let shadow = (self.shadows && light.cast_shadow)
                        .then(|| self.shadow_maps.get(i))
                        .flatten();
                    LitSpot::new(light, target, shadow)
                })
                .collect(),
            fog: Some(scene.fog),
        };

        let (opaque, mut transparent): (Vec<_>, Vec<_>) =
            items.iter().partition(|item| item.material.opacity() >= 1.0);

        for item in opaque {
            draw_item(&mut self.framebuffer, &mut self.stats, &ctx, item, &view_projection, None);
        }

        // Farthest first
        let eye = camera.position;
        transparent.sort_by(|a, b| {
            let da = a.geometry.bounds().transformed(&a.model).center().distance_squared(eye);
            let db = b.geometry.bounds().transformed(&b.model).center().distance_squared(eye);
            db.total_cmp(&da)
        });
        for item in transparent {
            let opacity = item.material.opacity();
            draw_item(
                &mut self.framebuffer,
                &mut self.stats,
                &ctx,
                item,
                &view_projection,
                Some(opacity),
            );
        }

        &self.framebuffer
    }

    fn clear(&mut self, scene: &Scene) {
        match scene.background() {
            Some(cubemap) => {
                let inverse = scene.camera.view_projection().inverse();
                fill_background(&mut self.framebuffer, cubemap, &inverse, scene.camera.position);
            }
            None => self.framebuffer.clear(Vec3::ZERO),
        }
    }

    fn render_shadow_maps(&mut self, scene: &Scene, items: &[DrawItem<'_>]) {
        if !self.shadows {
            return;
        }

        self.shadow_maps.resize_with(scene.lights.len(), || ShadowMap::new(1));
        for (light, map) in scene.lights.iter().zip(self.shadow_maps.iter_mut()) {
            if !light.cast_shadow {
                continue;
            }
            if map.size() != light.shadow.map_size {
                *map = ShadowMap::new(light.shadow.map_size);
            }
            let casters = items
                .iter()
                .filter(|item| item.cast_shadow)
                .map(|item| (item.geometry, item.model));
            map.render(light, scene.light_target(light), casters);
            self.stats.shadow_maps += 1;
        }
    }
}

fn fill_background(
    framebuffer: &mut Framebuffer,
    cubemap: &Cubemap,
    inverse_view_projection: &Mat4,
    eye: Vec3,
) {
    framebuffer.clear(Vec3::ZERO);
    let (width, height) = framebuffer.dimensions();
    for y in 0..height {
        for x in 0..width {
            let ndc = Vec2::new(
                (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
                1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
            );
            let far = *inverse_view_projection * ndc.extend(1.0).extend(1.0);
            let direction = far.xyz() / far.w - eye;
            let [r, g, b, _] = cubemap.sample(direction).to_array();
            let decode = |c: u8| srgb_to_linear(c as f32 / 255.0);
            framebuffer.set_color(x, y, Vec3::new(decode(r), decode(g), decode(b)));
        }
    }
}

/// Rasterize one item; `blend` carries the opacity of transparent items,
/// which are depth tested but do not write depth
fn draw_item(
    framebuffer: &mut Framebuffer,
    stats: &mut RenderStats,
    ctx: &ShadingContext<'_>,
    item: &DrawItem<'_>,
    view_projection: &Mat4,
    blend: Option<f32>,
) {
    let normal_matrix = Mat3::from_mat4(item.model).inverse().transpose();
    let transformed: Vec<ClipVertex> = item
        .geometry
        .vertices
        .iter()
        .map(|v| {
            let world = item.model.transform_point3(v.position);
            ClipVertex {
                position: *view_projection * world.extend(1.0),
                varyings: Varyings {
                    world,
                    normal: normal_matrix * v.normal,
                    uv: v.uv,
                },
            }
        })
        .collect();

    let (width, height) = framebuffer.dimensions();
    for tri in item.geometry.indices.chunks_exact(3) {
        let (Some(a), Some(b), Some(c)) = (
            transformed.get(tri[0] as usize),
            transformed.get(tri[1] as usize),
            transformed.get(tri[2] as usize),
        ) else {
            continue;
        };
        stats.triangles += 1;

        for clipped in clip_near(&[*a, *b, *c]).as_slice() {
            rasterize(clipped, width, height, CullMode::Back, |f| {
                if !framebuffer.passes_depth(f.x, f.y, f.depth) {
                    return;
                }
                stats.fragments += 1;
                let lit = shade(
                    ctx,
                    item.material,
                    &f.varyings,
                    f.front_facing,
                    item.receive_shadow,
                );
                let color = apply_fog(ctx, lit, f.varyings.world);
                match blend {
                    Some(alpha) => framebuffer.blend(f.x, f.y, color, alpha),
                    None => {
                        framebuffer.test_and_set(f.x, f.y, f.depth, color);
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SequenceRandom;
    use crate::config::AppConfig;

    fn scene() -> Scene {
        let mut config = AppConfig::default();
        config.scene.model = None;
        config.render.shadow_map_size = 64;
        Scene::with_random(&config, 1.0, Box::new(SequenceRandom::new([0.5]))).unwrap()
    }

    #[test]
    fn test_renders_ground_and_cube() {
        let scene = scene();
        let mut renderer = Renderer::new(64, 64, true);
        renderer.render(&scene);

        let stats = renderer.stats();
        assert_eq!(stats.triangles, 24);
        assert!(stats.fragments > 0);
        assert_eq!(stats.shadow_maps, 3);

        // The ground fills the lower half of the view
        let (_, height) = renderer.framebuffer().dimensions();
        let depth = renderer.framebuffer().depth(32, height - 2).unwrap_or(f32::INFINITY);
        assert!(depth < 1.0);
    }

    #[test]
    fn test_shadows_can_be_disabled() {
        let scene = scene();
        let mut renderer = Renderer::new(32, 32, false);
        renderer.render(&scene);
        assert_eq!(renderer.stats().shadow_maps, 0);
    }

    #[test]
    fn test_resize_changes_output() {
        let mut renderer = Renderer::new(32, 32, false);
        renderer.resize(40, 20);
        assert_eq!(renderer.framebuffer().dimensions(), (40, 20));
        renderer.resize(0, 20);
        assert_eq!(renderer.framebuffer().dimensions(), (40, 20));
    }
}
