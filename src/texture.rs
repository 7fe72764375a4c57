//! Textures: RGBA images, wrap addressing, the procedural checkerboard and
//! six-face cubemaps.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::core::{Canvas, DrawOp, Rgba};

/// Edge length of the generated checkerboard canvas in pixels
pub const CHECKER_SIZE: u32 = 128;
/// Edge length of one checkerboard quadrant
pub const CHECKER_TILE: u32 = CHECKER_SIZE / 2;

/// Owned RGBA8 image, row-major with the top row first
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Wrap raw RGBA bytes; None if the buffer size does not match
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (width > 0 && height > 0 && pixels.len() == (width * height * 4) as usize)
            .then_some(Self { width, height, pixels })
    }

    pub fn from_canvas(canvas: &Canvas) -> Self {
        let (width, height) = canvas.dimensions();
        Self {
            width,
            height,
            pixels: canvas.pixels().to_vec(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let p = &self.pixels[idx..idx + 4];
        Some(Rgba(p[0], p[1], p[2], p[3]))
    }

    /// Nearest-neighbour lookup at normalized coordinates in [0, 1]
    fn nearest(&self, u: f32, v: f32) -> Rgba {
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        let idx = ((y * self.width + x) * 4) as usize;
        let p = &self.pixels[idx..idx + 4];
        Rgba(p[0], p[1], p[2], p[3])
    }
}

/// Texture coordinate addressing outside [0, 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

impl WrapMode {
    fn apply(self, t: f32) -> f32 {
        match self {
            WrapMode::Repeat => t - t.floor(),
            WrapMode::ClampToEdge => t.clamp(0.0, 1.0),
        }
    }
}

/// Image plus sampling state
#[derive(Debug, Clone)]
pub struct Texture {
    image: Arc<Image>,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub repeat: Vec2,
}

impl Texture {
    /// Texture with clamped addressing and a repeat of one
    pub fn new(image: Image) -> Self {
        Self {
            image: Arc::new(image),
            wrap_s: WrapMode::ClampToEdge,
            wrap_t: WrapMode::ClampToEdge,
            repeat: Vec2::ONE,
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Sample at `uv` (v = 0 is the top row) with nearest filtering
    pub fn sample(&self, uv: Vec2) -> Rgba {
        let scaled = uv * self.repeat;
        let u = self.wrap_s.apply(scaled.x);
        let v = self.wrap_t.apply(scaled.y);
        self.image.nearest(u, v)
    }

    /// Sample and convert to a linear color in [0, 1]
    pub fn sample_color(&self, uv: Vec2) -> Vec3 {
        let Rgba(r, g, b, _) = self.sample(uv);
        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }
}

/// 128x128 canvas: black base, white top-left and bottom-right quadrants
pub fn checkerboard_canvas() -> Canvas {
    Canvas::new(CHECKER_SIZE, CHECKER_SIZE)
        .draw(DrawOp::Clear(Rgba::BLACK))
        .draw(DrawOp::Rect {
            x: 0,
            y: 0,
            width: CHECKER_TILE,
            height: CHECKER_TILE,
            color: Rgba::WHITE,
        })
        .draw(DrawOp::Rect {
            x: CHECKER_TILE,
            y: CHECKER_TILE,
            width: CHECKER_TILE,
            height: CHECKER_TILE,
            color: Rgba::WHITE,
        })
        .execute_ops()
}

/// Tileable checkerboard texture repeating `repeat` times along each axis
pub fn generate_checkerboard_texture(repeat: Vec2) -> Texture {
    let mut texture = Texture::new(Image::from_canvas(&checkerboard_canvas()));
    texture.repeat = repeat;
    texture.wrap_s = WrapMode::Repeat;
    texture.wrap_t = WrapMode::Repeat;
    texture
}

/// Cube face order: +X, -X, +Y, -Y, +Z, -Z
pub const CUBE_FACE_NAMES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

/// Six-image environment box
#[derive(Debug, Clone)]
pub struct Cubemap {
    faces: Arc<[Image; 6]>,
}

impl Cubemap {
    pub fn new(faces: [Image; 6]) -> Self {
        Self { faces: Arc::new(faces) }
    }

    /// Sample the face hit by `direction`
    pub fn sample(&self, direction: Vec3) -> Rgba {
        let abs = direction.abs();
        let (face, sc, tc, ma) = if abs.x >= abs.y && abs.x >= abs.z {
            if direction.x > 0.0 {
                (0, -direction.z, -direction.y, abs.x)
            } else {
                (1, direction.z, -direction.y, abs.x)
            }
        } else if abs.y >= abs.z {
            if direction.y > 0.0 {
                (2, direction.x, direction.z, abs.y)
            } else {
                (3, direction.x, -direction.z, abs.y)
            }
        } else if direction.z > 0.0 {
            (4, direction.x, -direction.y, abs.z)
        } else {
            (5, -direction.x, -direction.y, abs.z)
        };

        if ma <= f32::EPSILON {
            return Rgba::BLACK;
        }

        let u = (sc / ma + 1.0) * 0.5;
        let v = (tc / ma + 1.0) * 0.5;
        self.faces[face].nearest(u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
    }
}
