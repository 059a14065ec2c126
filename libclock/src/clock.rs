//! The analog clock: face and hands drawn into an offscreen layer, composited
//! over the background with a soft drop shadow.

use tiny_skia::{Paint, Point, Transform};
use tracing::debug;

use crate::{
    animation::AnimationEngine,
    device::{RenderSurface, Scene},
    error::{GraphicsError, GraphicsResult},
    hands::{HandAngles, WindUp},
    raster::{
        Bitmap, CapStyle, Color, PixelBuffer, RenderFrame, ShadowEffect, StrokeStyle,
        shape::{draw_line, stroke_ellipse},
    },
    size::SurfaceSize,
    time::{ClockTime, TimeSource, WallClock},
};

pub const BACKGROUND_COLOR: Color = Color::WHITE;
pub const HAND_COLOR: Color = Color::rgba(0.92, 0.38, 0.208, 1.0);
pub const BRUSH_OPACITY: f32 = 0.8;
pub const SHADOW_COLOR: Color = Color::BLACK;
/// Shadow offset in DIPs, applied to both axes.
pub const SHADOW_OFFSET: f32 = 5.0;
/// Shadow blur standard deviation in DIPs.
pub const SHADOW_STD_DEVIATION: f32 = 3.0;

/// Smallest extent, in DIPs, the clock is laid out for even in smaller windows.
pub const MIN_CLOCK_EXTENT: f32 = 200.0;
pub const CLOCK_MARGIN: f32 = 50.0;
const FACE_STROKE_DIVISOR: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hand {
    /// Length as a fraction of the clock radius.
    pub length: f32,
    /// Stroke width is the clock radius divided by this.
    pub width_divisor: f32,
}

pub const SECOND_HAND: Hand = Hand {
    length: 0.75,
    width_divisor: 25.0,
};
pub const MINUTE_HAND: Hand = Hand {
    length: 0.75,
    width_divisor: 15.0,
};
pub const HOUR_HAND: Hand = Hand {
    length: 0.5,
    width_divisor: 10.0,
};

/// Radius in DIPs for a surface of the given DIP size.
pub fn clock_radius(width: f32, height: f32) -> f32 {
    MIN_CLOCK_EXTENT.max(width.min(height)) / 2.0 - CLOCK_MARGIN
}

/// Per device resources: the hand brush and the device copy of the background.
#[derive(Debug, Clone)]
pub struct ClockAssets {
    pub brush: Paint<'static>,
    pub background: Bitmap,
}

/// Per size resources: the offscreen clock layer, a DIP resolution copy the
/// shadow is cast from, the shadow itself and where they sit on the surface.
#[derive(Debug, Clone)]
pub struct ClockLayers {
    pub clock: Bitmap,
    pub shadow_source: Bitmap,
    pub shadow: ShadowEffect,
    pub placement: LayerPlacement,
}

/// Where the clock and shadow layers sit on the surface.
///
/// The clock layer is in pixels and only covers the face. The shadow layer is
/// laid out in DIPs with room for the blur, and is magnified to the surface's
/// scale when composited, so the blur cost does not grow with the DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlacement {
    /// Surface the layers were laid out for.
    pub surface: SurfaceSize,
    /// Top left corner of the clock layer, negative when the clock overhangs the surface.
    pub origin: (i32, i32),
    pub size: SurfaceSize,
    /// Clock center in clock layer pixels.
    pub center: (f32, f32),
    /// Top left corner of the magnified shadow layer in surface pixels, offset included.
    pub shadow_origin: (f32, f32),
    pub shadow_size: SurfaceSize,
    /// Clock center in shadow layer DIPs.
    pub shadow_center: f32,
}

impl LayerPlacement {
    pub fn for_surface(surface: &RenderSurface) -> Self {
        let scale = surface.scale();
        let (width, height) = surface.dip_size();
        let face_extent = clock_radius(width, height) * (1.0 + 0.5 / FACE_STROKE_DIVISOR);

        let size = surface.size();
        let center = (size.width as f32 / 2.0, size.height as f32 / 2.0);

        let half = (face_extent * scale).ceil() as i32 + 1;
        let side = (2 * half + 1) as u32;
        let origin = (center.0.floor() as i32 - half, center.1.floor() as i32 - half);

        let shadow_half = (face_extent + 3.0 * SHADOW_STD_DEVIATION).ceil() + 1.0;
        let shadow_side = (2.0 * shadow_half) as u32 + 1;
        let shadow_origin = (
            center.0 + (SHADOW_OFFSET - shadow_half) * scale,
            center.1 + (SHADOW_OFFSET - shadow_half) * scale,
        );

        Self {
            surface: size,
            origin,
            size: SurfaceSize::new(side, side),
            center: (center.0 - origin.0 as f32, center.1 - origin.1 as f32),
            shadow_origin,
            shadow_size: SurfaceSize::new(shadow_side, shadow_side),
            shadow_center: shadow_half,
        }
    }
}

pub struct ClockRenderer {
    style: StrokeStyle,
    background: Bitmap,
    wind_up: WindUp,
}

impl ClockRenderer {
    /// `background` is the decoded background image in premultiplied RGBA.
    pub fn new(background: Bitmap) -> Self {
        Self {
            style: StrokeStyle {
                start_cap: CapStyle::Round,
                end_cap: CapStyle::Triangle,
            },
            background,
            wind_up: WindUp::new(),
        }
    }

    pub fn create_assets(&self) -> ClockAssets {
        ClockAssets {
            brush: HAND_COLOR.with_opacity(BRUSH_OPACITY).paint(),
            background: self.background.clone(),
        }
    }

    pub fn create_layers(&self, surface: &RenderSurface) -> ClockLayers {
        let placement = LayerPlacement::for_surface(surface);

        ClockLayers {
            clock: Bitmap::new(placement.size),
            shadow_source: Bitmap::new(placement.shadow_size),
            shadow: ShadowEffect::new(placement.shadow_size, SHADOW_STD_DEVIATION, SHADOW_COLOR),
            placement,
        }
    }

    pub fn wind_up(&self) -> &WindUp {
        &self.wind_up
    }

    /// Draws one frame of the clock onto `target` and returns the hand angles used.
    pub fn draw<P: PixelBuffer>(
        &mut self,
        target: &mut P,
        surface: &RenderSurface,
        assets: &ClockAssets,
        layers: &mut ClockLayers,
        animation_value: f64,
        time: ClockTime,
    ) -> GraphicsResult<HandAngles> {
        let placement = layers.placement;
        if placement.surface != target.size() {
            return Err(GraphicsError::Draw(format!(
                "clock layer was laid out for {}x{} but the target is {}x{}",
                placement.surface.width,
                placement.surface.height,
                target.size().width,
                target.size().height
            )));
        }

        let angles = self
            .wind_up
            .blend(HandAngles::from_time(time), animation_value);

        target.clear(BACKGROUND_COLOR);
        target.draw_bitmap(&assets.background, 0, 0);

        let (width, height) = surface.dip_size();
        let radius = clock_radius(width, height);
        let scale = surface.scale();

        layers.clock.clear(Color::TRANSPARENT);
        let (cx, cy) = placement.center;
        let to_layer = Transform::from_row(scale, 0.0, 0.0, scale, cx, cy);
        self.draw_clock(&mut layers.clock, to_layer, radius, assets, angles);

        layers.shadow_source.clear(Color::TRANSPARENT);
        let center = placement.shadow_center;
        self.draw_clock(&mut layers.shadow_source, Transform::from_translate(center, center), radius, assets, angles);
        let shadow = layers.shadow.apply(&layers.shadow_source)?;

        let (shadow_left, shadow_top) = placement.shadow_origin;
        target.draw_bitmap_scaled(shadow, shadow_left, shadow_top, scale);
        let (left, top) = placement.origin;
        target.draw_bitmap(&layers.clock, left, top);

        Ok(angles)
    }

    /// Draws the face and hands around the origin of `transform`, with DIP geometry.
    fn draw_clock(&self, layer: &mut Bitmap, transform: Transform, radius: f32, assets: &ClockAssets, angles: HandAngles) {
        stroke_ellipse(
            layer,
            transform,
            Point::zero(),
            radius,
            radius,
            radius / FACE_STROKE_DIVISOR,
            &assets.brush,
        );

        for (angle, hand) in [
            (angles.second, SECOND_HAND),
            (angles.minute, MINUTE_HAND),
            (angles.hour, HOUR_HAND),
        ] {
            draw_line(
                layer,
                transform.pre_concat(Transform::from_rotate(angle)),
                Point::zero(),
                Point::from_xy(0.0, -radius * hand.length),
                radius / hand.width_divisor,
                self.style,
                &assets.brush,
            );
        }
    }
}

/// The clock as drawn by the device manager: advances the wind-up animation
/// and samples the wall clock once per frame.
pub struct ClockScene<T: TimeSource, W: WallClock> {
    engine: AnimationEngine<T>,
    renderer: ClockRenderer,
    wall_clock: W,
}

impl<T: TimeSource, W: WallClock> ClockScene<T, W> {
    /// Schedules the wind-up to start now, so build the scene right before the
    /// first frame.
    pub fn new(source: T, wall_clock: W, background: Bitmap) -> Self {
        let mut engine = AnimationEngine::new(source);
        engine.schedule(engine.now());

        Self {
            engine,
            renderer: ClockRenderer::new(background),
            wall_clock,
        }
    }

    pub fn engine(&self) -> &AnimationEngine<T> {
        &self.engine
    }

    pub fn renderer(&self) -> &ClockRenderer {
        &self.renderer
    }
}

impl<T: TimeSource, W: WallClock> Scene for ClockScene<T, W> {
    type DeviceResources = ClockAssets;
    type SizeResources = ClockLayers;

    fn create_device_resources(&mut self, _surface: &RenderSurface) -> GraphicsResult<ClockAssets> {
        debug!("creating clock brush and background bitmap");
        Ok(self.renderer.create_assets())
    }

    fn create_size_resources(&mut self, surface: &RenderSurface, _device: &ClockAssets) -> GraphicsResult<ClockLayers> {
        debug!(
            width = surface.size().width,
            height = surface.size().height,
            dpi = surface.dpi(),
            "creating clock layer and shadow"
        );
        Ok(self.renderer.create_layers(surface))
    }

    fn draw(
        &mut self,
        target: &mut RenderFrame<'_>,
        surface: &RenderSurface,
        device: &ClockAssets,
        size: &mut ClockLayers,
    ) -> GraphicsResult<()> {
        let now = self.engine.now();
        let animation_value = self.engine.advance(now);
        let time = self.wall_clock.now();

        self.renderer
            .draw(target, surface, device, size, animation_value, time)
            .map(|_| ())
    }
}
