//! Elliptical arcs as cubic Bezier control points.
//!
//! Arcs are split into pieces of at most 90 degrees, each approximated by
//! one cubic. Control points transform exactly under any affine matrix,
//! which lets rotated or sheared ellipses reach the backend as curves.

use crate::basics::deg2rad;
use crate::geometry::{PointF, RectangleF};

const ANGLE_EPSILON: f32 = 0.01;

/// Control points of one cubic approximating the arc of the ellipse
/// centred at `(cx, cy)` from `start` sweeping `sweep` radians.
fn arc_segment(cx: f32, cy: f32, rx: f32, ry: f32, start: f32, sweep: f32) -> [PointF; 4] {
    let x0 = (sweep / 2.0).cos();
    let y0 = (sweep / 2.0).sin();
    let tx = (1.0 - x0) * 4.0 / 3.0;
    let ty = y0 - tx * x0 / y0;

    let px = [x0, x0 + tx, x0 + tx, x0];
    let py = [-y0, -ty, ty, y0];

    let mid = start + sweep / 2.0;
    let (sn, cs) = mid.sin_cos();

    let mut out = [PointF::default(); 4];
    for i in 0..4 {
        out[i] = PointF::new(
            cx + rx * (px[i] * cs - py[i] * sn),
            cy + ry * (px[i] * sn + py[i] * cs),
        );
    }
    out
}

/// Bezier control points (`1 + 3n` of them) for the arc of the ellipse
/// inscribed in `rect`. Angles are degrees, clockwise in y-down space.
pub fn arc_to_beziers(rect: &RectangleF, start_angle: f32, sweep_angle: f32) -> Vec<PointF> {
    let rx = rect.width / 2.0;
    let ry = rect.height / 2.0;
    let cx = rect.x + rx;
    let cy = rect.y + ry;

    let mut start = deg2rad(start_angle % 360.0);
    let sweep = deg2rad(sweep_angle.clamp(-360.0, 360.0));

    if sweep.abs() < 1e-6 {
        let p = PointF::new(cx + rx * start.cos(), cy + ry * start.sin());
        return vec![p, p, p, p];
    }

    let quarter = std::f32::consts::FRAC_PI_2.copysign(sweep);
    let mut points = Vec::with_capacity(13);
    let mut total = 0.0f32;
    loop {
        let prev = total;
        total += quarter;
        let done = if sweep < 0.0 {
            total <= sweep + ANGLE_EPSILON
        } else {
            total >= sweep - ANGLE_EPSILON
        };
        let local = if done { sweep - prev } else { quarter };

        let seg = arc_segment(cx, cy, rx, ry, start, local);
        let skip = if points.is_empty() { 0 } else { 1 };
        points.extend_from_slice(&seg[skip..]);
        start += local;
        if done {
            break;
        }
    }
    points
}
