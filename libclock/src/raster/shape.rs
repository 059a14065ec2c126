//! Antialiased strokes. Geometry is given in user space and mapped to pixels by
//! a transform.

use tiny_skia::{FillRule, Paint, PathBuilder, Point, Rect, Stroke, Transform};

use super::PixelBuffer;

/// Control point distance for a quarter circle drawn as one cubic.
const KAPPA: f32 = 0.552_284_8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapStyle {
    #[default]
    Flat,
    Round,
    /// A point half the stroke width past the end.
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeStyle {
    pub start_cap: CapStyle,
    pub end_cap: CapStyle,
}

/// Draws the outline of an axis-aligned ellipse.
pub fn stroke_ellipse<B: PixelBuffer>(
    buffer: &mut B,
    transform: Transform,
    center: Point,
    radius_x: f32,
    radius_y: f32,
    stroke_width: f32,
    paint: &Paint,
) {
    let Some(oval) = Rect::from_xywh(center.x - radius_x, center.y - radius_y, radius_x * 2.0, radius_y * 2.0)
        .and_then(PathBuilder::from_oval)
    else {
        return;
    };
    let Some(mut target) = buffer.as_pixmap() else {
        return;
    };

    let stroke = Stroke {
        width: stroke_width,
        ..Stroke::default()
    };
    target.stroke_path(&oval, paint, &stroke, transform, None);
}

/// Draws a straight line with the caps from `style`.
///
/// Start and end caps may differ, so the stroke is built as a filled outline
/// along the line rather than through a single line cap setting.
pub fn draw_line<B: PixelBuffer>(
    buffer: &mut B,
    transform: Transform,
    from: Point,
    to: Point,
    stroke_width: f32,
    style: StrokeStyle,
    paint: &Paint,
) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy);
    if length == 0.0 || stroke_width <= 0.0 {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);

    // Outline space: x runs along the line from 0 to `length`, y across it.
    let along = Transform::from_row(ux, uy, -uy, ux, from.x, from.y);
    let half = stroke_width / 2.0;

    let mut outline = PathBuilder::new();
    outline.move_to(0.0, -half);
    outline.line_to(length, -half);
    push_cap(&mut outline, style.end_cap, length, half, 1.0);
    outline.line_to(0.0, half);
    push_cap(&mut outline, style.start_cap, 0.0, half, -1.0);
    outline.close();

    let (Some(outline), Some(mut target)) = (outline.finish(), buffer.as_pixmap()) else {
        return;
    };
    target.fill_path(&outline, paint, FillRule::Winding, transform.pre_concat(along), None);
}

/// Continues the outline from `(x, -side * half)` to `(x, side * half)`, bulging
/// towards `x + side * half`.
fn push_cap(outline: &mut PathBuilder, cap: CapStyle, x: f32, half: f32, side: f32) {
    let reach = x + side * half;
    let edge = side * half;

    match cap {
        CapStyle::Flat => outline.line_to(x, edge),
        CapStyle::Triangle => {
            outline.line_to(reach, 0.0);
            outline.line_to(x, edge);
        }
        CapStyle::Round => {
            let bend = KAPPA * half * side;
            outline.cubic_to(x + bend, -edge, reach, -bend, reach, 0.0);
            outline.cubic_to(reach, bend, x + bend, edge, x, edge);
        }
    }
}
