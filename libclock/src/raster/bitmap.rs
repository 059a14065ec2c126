use tiny_skia::PixmapRef;

use super::{BYTES_PER_PIXEL, PixelBuffer};
use crate::{
    error::{GraphicsError, GraphicsResult},
    size::SurfaceSize,
};

/// Owned premultiplied RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: SurfaceSize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Fully transparent bitmap.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            data: vec![0; size.pixel_count() * BYTES_PER_PIXEL],
        }
    }

    pub fn from_premultiplied(size: SurfaceSize, data: Vec<u8>) -> GraphicsResult<Self> {
        let expected = size.pixel_count() * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(GraphicsError::Resource(format!(
                "{}x{} bitmap needs {expected} bytes, got {}",
                size.width,
                size.height,
                data.len()
            )));
        }

        Ok(Self { size, data })
    }

    /// Converts straight (non-premultiplied) RGBA8 data.
    pub fn from_straight(size: SurfaceSize, mut data: Vec<u8>) -> GraphicsResult<Self> {
        for pixel in data.chunks_exact_mut(BYTES_PER_PIXEL) {
            let alpha = pixel[3] as u16;
            for channel in &mut pixel[..3] {
                *channel = ((*channel as u16 * alpha + 127) / 255) as u8;
            }
        }

        Self::from_premultiplied(size, data)
    }

    /// Read-only view for compositing, `None` when the bitmap has no pixels.
    pub fn as_source(&self) -> Option<PixmapRef<'_>> {
        PixmapRef::from_bytes(&self.data, self.size.width, self.size.height)
    }
}

impl PixelBuffer for Bitmap {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
