use tiny_skia::{FilterQuality, PixmapMut, PixmapPaint, Transform};

use super::{Bitmap, Color};
use crate::size::SurfaceSize;

pub const BYTES_PER_PIXEL: usize = 4;

/// Row-major premultiplied RGBA8 pixels.
pub trait PixelBuffer {
    fn size(&self) -> SurfaceSize;
    fn data(&self) -> &[u8];
    fn data_mut(&mut self) -> &mut [u8];

    fn pixel(&self, x: u32, y: u32) -> Option<[u8; BYTES_PER_PIXEL]> {
        let index = pixel_index(self.size(), x, y)?;

        self.data()[index..index + BYTES_PER_PIXEL].try_into().ok()
    }

    fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8; BYTES_PER_PIXEL]> {
        let index = pixel_index(self.size(), x, y)?;

        (&mut self.data_mut()[index..index + BYTES_PER_PIXEL]).try_into().ok()
    }

    fn pixels(&self) -> impl Iterator<Item = &[u8; BYTES_PER_PIXEL]> {
        self.data()
            .chunks_exact(BYTES_PER_PIXEL)
            .filter_map(|chunk| chunk.try_into().ok())
    }

    fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8; BYTES_PER_PIXEL]> {
        self.data_mut()
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .filter_map(|chunk| chunk.try_into().ok())
    }

    fn clear(&mut self, color: Color) {
        let color = color.to_premultiplied();

        for pixel in self.pixels_mut() {
            *pixel = color;
        }
    }

    /// The buffer as a drawing target, `None` when it has no pixels.
    fn as_pixmap(&mut self) -> Option<PixmapMut<'_>> {
        let size = self.size();
        PixmapMut::from_bytes(self.data_mut(), size.width, size.height)
    }

    /// Composites `bitmap` with its top left corner at `(left, top)`, clipped to this buffer.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, left: i32, top: i32) {
        let (Some(mut target), Some(source)) = (self.as_pixmap(), bitmap.as_source()) else {
            return;
        };

        target.draw_pixmap(left, top, source, &PixmapPaint::default(), Transform::identity(), None);
    }

    /// Composites `bitmap` magnified by `scale` with bilinear filtering, its top
    /// left corner at `(left, top)`.
    fn draw_bitmap_scaled(&mut self, bitmap: &Bitmap, left: f32, top: f32, scale: f32) {
        let (Some(mut target), Some(source)) = (self.as_pixmap(), bitmap.as_source()) else {
            return;
        };

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_row(scale, 0.0, 0.0, scale, left, top);
        target.draw_pixmap(0, 0, source, &paint, transform, None);
    }
}

fn pixel_index(size: SurfaceSize, x: u32, y: u32) -> Option<usize> {
    if x >= size.width || y >= size.height {
        return None;
    }

    Some((x as usize + y as usize * size.width as usize) * BYTES_PER_PIXEL)
}

/// The swap chain's back buffer, borrowed for the duration of one frame.
pub struct RenderFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub buffer: &'a mut [u8],
}

impl<'a> RenderFrame<'a> {
    pub fn new(width: u32, height: u32, buffer: &'a mut [u8]) -> Self {
        debug_assert_eq!(
            buffer.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "back buffer does not match its dimensions"
        );

        Self {
            width,
            height,
            buffer,
        }
    }
}

impl PixelBuffer for RenderFrame<'_> {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    fn data(&self) -> &[u8] {
        self.buffer
    }

    fn data_mut(&mut self) -> &mut [u8] {
        self.buffer
    }
}
