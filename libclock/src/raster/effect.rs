use super::{BYTES_PER_PIXEL, Bitmap, Color, PixelBuffer};
use crate::{
    error::{GraphicsError, GraphicsResult},
    size::SurfaceSize,
};

/// Number of box blur passes used to approximate the Gaussian.
const BOX_PASSES: usize = 3;

/// Drop shadow: the input's alpha channel blurred with a Gaussian and tinted
/// with a solid color.
///
/// Buffers are sized once for the layer the shadow is cast by, so the effect
/// belongs with the other size dependent resources. Nothing outside the input
/// bitmap is sampled; give the input a transparent margin of about three
/// standard deviations to keep the blur from being cut off.
#[derive(Debug, Clone)]
pub struct ShadowEffect {
    tint: [u8; BYTES_PER_PIXEL],
    radii: [usize; BOX_PASSES],
    output: Bitmap,
    alpha: Vec<u8>,
    scratch: Vec<u8>,
}

impl ShadowEffect {
    /// `std_deviation` is in pixels.
    pub fn new(size: SurfaceSize, std_deviation: f32, color: Color) -> Self {
        Self {
            tint: color.to_premultiplied(),
            radii: box_radii(std_deviation),
            output: Bitmap::new(size),
            alpha: vec![0; size.pixel_count()],
            scratch: vec![0; size.pixel_count()],
        }
    }

    /// Renders the shadow of `input` into the effect's output bitmap.
    pub fn apply(&mut self, input: &Bitmap) -> GraphicsResult<&Bitmap> {
        let size = self.output.size();
        if input.size() != size {
            return Err(GraphicsError::Draw(format!(
                "shadow input is {}x{}, effect was created for {}x{}",
                input.size().width,
                input.size().height,
                size.width,
                size.height
            )));
        }

        for (alpha, pixel) in self.alpha.iter_mut().zip(input.pixels()) {
            *alpha = pixel[3];
        }

        let (width, height) = (size.width as usize, size.height as usize);
        for radius in self.radii {
            for row in 0..height {
                let start = row * width;
                box_blur(
                    |x| self.alpha[start + x],
                    |x, value| self.scratch[start + x] = value,
                    width,
                    radius,
                );
            }
            for column in 0..width {
                box_blur(
                    |y| self.scratch[y * width + column],
                    |y, value| self.alpha[y * width + column] = value,
                    height,
                    radius,
                );
            }
        }

        let tint = self.tint.map(u32::from);
        for (pixel, &alpha) in self.output.pixels_mut().zip(&self.alpha) {
            let alpha = u32::from(alpha);
            *pixel = tint.map(|channel| ((channel * alpha + 127) / 255) as u8);
        }

        Ok(&self.output)
    }
}

/// Radii of the box filters whose repeated application approximates a Gaussian
/// with the given standard deviation.
fn box_radii(std_deviation: f32) -> [usize; BOX_PASSES] {
    let sigma = std_deviation.max(0.0) as f64;
    if sigma == 0.0 {
        return [0; BOX_PASSES];
    }
    let passes = BOX_PASSES as f64;

    let ideal = (12.0 * sigma * sigma / passes + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let lower_f = lower as f64;
    let lower_count = ((12.0 * sigma * sigma - passes * lower_f * lower_f - 4.0 * passes * lower_f - 3.0 * passes)
        / (-4.0 * lower_f - 4.0))
        .round() as i64;

    let mut radii = [0; BOX_PASSES];
    for (pass, radius) in radii.iter_mut().enumerate() {
        let width = if (pass as i64) < lower_count { lower } else { upper };
        *radius = ((width - 1) / 2) as usize;
    }
    radii
}

/// Running mean over `index - radius ..= index + radius` along one line of
/// `len` samples, counting samples outside the line as transparent.
fn box_blur(source: impl Fn(usize) -> u8, mut write: impl FnMut(usize, u8), len: usize, radius: usize) {
    let window = (2 * radius + 1) as u32;
    let mut sum: u32 = (0..len.min(radius + 1)).map(|index| u32::from(source(index))).sum();

    for index in 0..len {
        write(index, ((sum + window / 2) / window) as u8);

        if index + radius + 1 < len {
            sum += u32::from(source(index + radius + 1));
        }
        if index >= radius {
            sum -= u32::from(source(index - radius));
        }
    }
}
