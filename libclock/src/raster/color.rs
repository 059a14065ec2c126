use tiny_skia::Paint;

/// Straight-alpha color with channels in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity,
            ..self
        }
    }

    /// Antialiased solid paint of this color.
    pub fn paint(self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.to_skia());
        paint.anti_alias = true;
        paint
    }

    fn to_skia(self) -> tiny_skia::Color {
        let channel = |c: f32| c.clamp(0.0, 1.0);

        tiny_skia::Color::from_rgba(channel(self.r), channel(self.g), channel(self.b), channel(self.a))
            .unwrap_or(tiny_skia::Color::TRANSPARENT)
    }

    /// Premultiplied RGBA8.
    pub fn to_premultiplied(self) -> [u8; 4] {
        let a = self.a.clamp(0.0, 1.0);
        let channel = |c: f32| (c.clamp(0.0, 1.0) * a * 255.0).round() as u8;

        [channel(self.r), channel(self.g), channel(self.b), (a * 255.0).round() as u8]
    }
}
