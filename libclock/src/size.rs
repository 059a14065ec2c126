/// Logical pixels per inch that map one DIP onto one physical pixel.
pub const BASE_DPI: f32 = 96.0;

/// Physical pixel dimensions of a surface or bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size in device independent pixels at the given DPI.
    pub fn to_dips(self, dpi: f32) -> (f32, f32) {
        let scale = BASE_DPI / dpi;
        (self.width as f32 * scale, self.height as f32 * scale)
    }
}
