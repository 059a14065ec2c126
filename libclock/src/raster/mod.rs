//! 2D drawing on premultiplied RGBA buffers: tiny-skia paths for the strokes,
//! bitmap compositing and the drop shadow effect.

pub mod bitmap;
pub mod color;
pub mod effect;
pub mod frame;
pub mod shape;

pub use bitmap::Bitmap;
pub use color::Color;
pub use effect::ShadowEffect;
pub use frame::{BYTES_PER_PIXEL, PixelBuffer, RenderFrame};
pub use shape::{CapStyle, StrokeStyle};
