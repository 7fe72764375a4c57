//! Scanline-free triangle rasterization over a bounding box using edge
//! functions, with near-plane clipping and perspective-correct varyings.

use std::ops::{Add, Mul};

use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

/// Per-vertex attributes interpolated across a triangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Varyings {
    pub world: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Add for Varyings {
    type Output = Varyings;

    fn add(self, rhs: Varyings) -> Varyings {
        Varyings {
            world: self.world + rhs.world,
            normal: self.normal + rhs.normal,
            uv: self.uv + rhs.uv,
        }
    }
}

impl Mul<f32> for Varyings {
    type Output = Varyings;

    fn mul(self, s: f32) -> Varyings {
        Varyings {
            world: self.world * s,
            normal: self.normal * s,
            uv: self.uv * s,
        }
    }
}

/// Vertex after projection, before the perspective divide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    pub position: Vec4,
    pub varyings: Varyings,
}

impl ClipVertex {
    fn lerp(&self, other: &ClipVertex, t: f32) -> ClipVertex {
        ClipVertex {
            position: self.position.lerp(other.position, t),
            varyings: self.varyings * (1.0 - t) + other.varyings * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub x: u32,
    pub y: u32,
    /// Normalized depth in [0, 1]
    pub depth: f32,
    pub varyings: Varyings,
    pub front_facing: bool,
}

/// Which winding to discard; front faces are counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Back,
    Front,
}

/// Up to two triangles left after clipping one against the near plane
#[derive(Debug, Clone, Copy)]
pub struct Clipped {
    triangles: [[ClipVertex; 3]; 2],
    len: usize,
}

impl Clipped {
    pub fn as_slice(&self) -> &[[ClipVertex; 3]] {
        &self.triangles[..self.len]
    }
}

/// Clip against the near plane (`z >= 0` in clip space)
pub fn clip_near(triangle: &[ClipVertex; 3]) -> Clipped {
    let mut polygon = [triangle[0]; 4];
    let mut count = 0;

    for i in 0..3 {
        let current = &triangle[i];
        let next = &triangle[(i + 1) % 3];
        let dc = current.position.z;
        let dn = next.position.z;

        if dc >= 0.0 {
            polygon[count] = *current;
            count += 1;
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            polygon[count] = current.lerp(next, dc / (dc - dn));
            count += 1;
        }
    }

    let mut clipped = Clipped {
        triangles: [*triangle; 2],
        len: 0,
    };
    if count >= 3 {
        clipped.triangles[0] = [polygon[0], polygon[1], polygon[2]];
        clipped.len = 1;
    }
    if count == 4 {
        clipped.triangles[1] = [polygon[0], polygon[2], polygon[3]];
        clipped.len = 2;
    }
    clipped
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Rasterize one clipped triangle into a `width` x `height` target, calling
/// `shade` for every covered pixel centre
pub fn rasterize(
    triangle: &[ClipVertex; 3],
    width: u32,
    height: u32,
    cull: CullMode,
    mut shade: impl FnMut(Fragment),
) {
    if width == 0 || height == 0 {
        return;
    }

    let mut screen = [Vec2::ZERO; 3];
    let mut depth = [0.0; 3];
    let mut inv_w = [0.0; 3];
    for (i, vertex) in triangle.iter().enumerate() {
        let w = vertex.position.w;
        if w <= f32::EPSILON {
            return;
        }
        inv_w[i] = 1.0 / w;
        let ndc = vertex.position.xyz() * inv_w[i];
        screen[i] = Vec2::new(
            (ndc.x * 0.5 + 0.5) * width as f32,
            (0.5 - ndc.y * 0.5) * height as f32,
        );
        depth[i] = ndc.z;
    }

    // Screen space has y pointing down, which flips the winding
    let area = edge(screen[0], screen[1], screen[2]);
    if area.abs() <= f32::EPSILON {
        return;
    }
    let front_facing = area < 0.0;
    match cull {
        CullMode::Back if !front_facing => return,
        CullMode::Front if front_facing => return,
        _ => {}
    }

    let min = screen[0].min(screen[1]).min(screen[2]);
    let max = screen[0].max(screen[1]).max(screen[2]);
    let min_x = min.x.floor().max(0.0) as i64;
    let min_y = min.y.floor().max(0.0) as i64;
    let max_x = (max.x.ceil() as i64).min(width as i64 - 1);
    let max_y = (max.y.ceil() as i64).min(height as i64 - 1);
    if max_x < min_x || max_y < min_y {
        return;
    }

    let inv_area = 1.0 / area;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let b0 = edge(screen[1], screen[2], p) * inv_area;
            let b1 = edge(screen[2], screen[0], p) * inv_area;
            let b2 = edge(screen[0], screen[1], p) * inv_area;
            if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                continue;
            }

            let z = b0 * depth[0] + b1 * depth[1] + b2 * depth[2];
            if !(0.0..=1.0).contains(&z) {
                continue;
            }

            let p0 = b0 * inv_w[0];
            let p1 = b1 * inv_w[1];
            let p2 = b2 * inv_w[2];
            let norm = 1.0 / (p0 + p1 + p2);
            let varyings = (triangle[0].varyings * p0
                + triangle[1].varyings * p1
                + triangle[2].varyings * p2)
                * norm;

            shade(Fragment {
                x: x as u32,
                y: y as u32,
                depth: z,
                varyings,
                front_facing,
            });
        }
    }
}
