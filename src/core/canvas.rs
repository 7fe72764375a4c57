/// RGBA color used by canvas draw operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);

    pub fn to_array(self) -> [u8; 4] {
        [self.0, self.1, self.2, self.3]
    }
}

/// 2D drawing operations for canvas
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill entire canvas with color
    Clear(Rgba),

    /// Set a single pixel
    Pixel { x: u32, y: u32, color: Rgba },

    /// Fill rectangle, clipped to the canvas
    Rect { x: u32, y: u32, width: u32, height: u32, color: Rgba },
}

/// Canvas state - pixel buffer with pending draw operations
#[derive(Debug, Clone)]
pub struct Canvas {
    /// RGBA pixel buffer, row-major, top row first
    pixels: Vec<u8>,
    operations: Vec<DrawOp>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create new transparent canvas with dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            operations: Vec::new(),
            width,
            height,
        }
    }

    /// Queue draw operation - functional style
    pub fn draw(mut self, op: DrawOp) -> Self {
        self.operations.push(op);
        self
    }

    /// Execute all pending operations and return the resulting canvas
    pub fn execute_ops(&self) -> Self {
        let mut canvas = Self {
            pixels: self.pixels.clone(),
            operations: Vec::new(),
            width: self.width,
            height: self.height,
        };

        for op in &self.operations {
            canvas.execute_op(op);
        }

        canvas
    }

    fn execute_op(&mut self, op: &DrawOp) {
        match *op {
            DrawOp::Clear(color) => self.fill(0, 0, self.width, self.height, color),
            DrawOp::Pixel { x, y, color } => self.fill(x, y, 1, 1, color),
            DrawOp::Rect { x, y, width, height, color } => self.fill(x, y, width, height, color),
        }
    }

    fn fill(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        let rgba = color.to_array();

        for py in y.min(self.height)..y_end {
            for px in x.min(self.width)..x_end {
                let idx = ((py * self.width + px) * 4) as usize;
                self.pixels[idx..idx + 4].copy_from_slice(&rgba);
            }
        }
    }

    /// Pixel at (x, y); None when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let p = &self.pixels[idx..idx + 4];
        Some(Rgba(p[0], p[1], p[2], p[3]))
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of queued, not yet executed operations
    pub fn pending_ops(&self) -> usize {
        self.operations.len()
    }
}
