use anyhow::Context;
use libclock::{raster::Bitmap, SurfaceSize};

const BACKGROUND_PNG: &[u8] = include_bytes!("../assets/background.png");

/// Decodes the embedded background image into a premultiplied bitmap.
pub fn load_background() -> anyhow::Result<Bitmap> {
    let image = image::load_from_memory(BACKGROUND_PNG)
        .context("Decoding background image")?
        .to_rgba8();
    let size = SurfaceSize::new(image.width(), image.height());

    Bitmap::from_straight(size, image.into_raw()).context("Creating background bitmap")
}
