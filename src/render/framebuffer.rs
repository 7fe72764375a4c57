use glam::Vec3;

use crate::math::linear_to_srgb;

/// Linear color plus depth for every pixel, top row first
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    color: Vec<Vec3>,
    depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            color: vec![Vec3::ZERO; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reallocate for a new size; contents are cleared
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self, color: Vec3) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    pub fn color(&self, x: u32, y: u32) -> Option<Vec3> {
        self.index(x, y).map(|i| self.color[i])
    }

    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    pub fn set_color(&mut self, x: u32, y: u32, color: Vec3) {
        if let Some(i) = self.index(x, y) {
            self.color[i] = color;
        }
    }

    /// Write color and depth if `depth` is nearer than what is stored
    pub fn test_and_set(&mut self, x: u32, y: u32, depth: f32, color: Vec3) -> bool {
        match self.index(x, y) {
            Some(i) if depth < self.depth[i] => {
                self.depth[i] = depth;
                self.color[i] = color;
                true
            }
            _ => false,
        }
    }

    /// Depth test without writing depth
    pub fn passes_depth(&self, x: u32, y: u32, depth: f32) -> bool {
        self.index(x, y).is_some_and(|i| depth < self.depth[i])
    }

    /// Mix `color` over the stored color with coverage `alpha`
    pub fn blend(&mut self, x: u32, y: u32, color: Vec3, alpha: f32) {
        if let Some(i) = self.index(x, y) {
            self.color[i] = self.color[i].lerp(color, alpha);
        }
    }

    /// sRGB encoded RGBA8, opaque
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.color.len() * 4);
        self.write_rgba8(&mut out);
        out
    }

    /// Like [`Framebuffer::to_rgba8`], reusing `out`
    pub fn write_rgba8(&self, out: &mut Vec<u8>) {
        out.clear();
        for c in &self.color {
            let encode = |v: f32| (linear_to_srgb(v.clamp(0.0, 1.0)) * 255.0).round() as u8;
            out.extend_from_slice(&[encode(c.x), encode(c.y), encode(c.z), 255]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut fb = Framebuffer::new(2, 2);
        assert!(fb.test_and_set(0, 0, 0.5, Vec3::X));
        assert!(!fb.test_and_set(0, 0, 0.7, Vec3::Y));
        assert!(fb.test_and_set(0, 0, 0.2, Vec3::Z));
        assert_eq!(fb.color(0, 0), Some(Vec3::Z));
        assert_eq!(fb.depth(0, 0), Some(0.2));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut fb = Framebuffer::new(2, 2);
        assert!(!fb.test_and_set(2, 0, 0.1, Vec3::ONE));
        assert_eq!(fb.color(0, 2), None);
    }

    #[test]
    fn test_rgba8_is_srgb_encoded() {
        let mut fb = Framebuffer::new(1, 1);
        fb.clear(Vec3::new(0.0, 1.0, 0.2140));
        let bytes = fb.to_rgba8();
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 255);
        assert!((bytes[2] as i32 - 127).abs() <= 1);
        assert_eq!(bytes[3], 255);
    }

    #[test]
    fn test_blend_mixes_toward_source() {
        let mut fb = Framebuffer::new(1, 1);
        fb.blend(0, 0, Vec3::ONE, 0.25);
        assert!((fb.color(0, 0).unwrap_or_default() - Vec3::splat(0.25)).length() < 1e-6);
    }
}
