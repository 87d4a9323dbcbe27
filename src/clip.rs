//! Trivial rejection of device geometry against the clip extent.
//!
//! Cohen-Sutherland outcodes decide whether a set of points lies entirely
//! on one outer side of a box; Liang-Barsky decides whether a segment
//! whose endpoints straddle corners still crosses it.

use crate::geometry::{PointF, RectangleF};

pub const CLIP_X_MAX: u32 = 1;
pub const CLIP_Y_MAX: u32 = 2;
pub const CLIP_X_MIN: u32 = 4;
pub const CLIP_Y_MIN: u32 = 8;

/// Outcode of `(x, y)` against `clip_box`.
///
/// ```text
///        |        |
///  1100  |  1000  | 1001
///        |        |
/// -------+--------+-------- top
///        |        |
///  0100  |  0000  | 0001
///        |        |
/// -------+--------+-------- bottom
///        |        |
///  0110  |  0010  | 0011
///        |        |
///       left    right
/// ```
#[inline]
pub fn clipping_flags(x: f32, y: f32, clip_box: &RectangleF) -> u32 {
    (x > clip_box.right()) as u32
        | (((y > clip_box.bottom()) as u32) << 1)
        | (((x < clip_box.left()) as u32) << 2)
        | (((y < clip_box.top()) as u32) << 3)
}

/// `true` when every point lies outside `clip_box` on a common side.
pub fn is_rejected(points: &[PointF], clip_box: &RectangleF) -> bool {
    if clip_box.is_empty() {
        return true;
    }
    let mut common = CLIP_X_MAX | CLIP_Y_MAX | CLIP_X_MIN | CLIP_Y_MIN;
    for p in points {
        common &= clipping_flags(p.x, p.y, clip_box);
        if common == 0 {
            return false;
        }
    }
    !points.is_empty()
}

/// `true` when the segment has at least one point inside `clip_box`.
pub fn segment_visible(x1: f32, y1: f32, x2: f32, y2: f32, clip_box: &RectangleF) -> bool {
    let f1 = clipping_flags(x1, y1, clip_box);
    let f2 = clipping_flags(x2, y2, clip_box);
    if f1 == 0 || f2 == 0 {
        return true;
    }
    if f1 & f2 != 0 {
        return false;
    }

    let dx = x2 - x1;
    let dy = y2 - y1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    let edges = [
        (-dx, x1 - clip_box.left()),
        (dx, clip_box.right() - x1),
        (-dy, y1 - clip_box.top()),
        (dy, clip_box.bottom() - y1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip_box() -> RectangleF {
        RectangleF::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_flags() {
        let b = clip_box();
        assert_eq!(clipping_flags(5.0, 5.0, &b), 0);
        assert_eq!(clipping_flags(11.0, 5.0, &b), CLIP_X_MAX);
        assert_eq!(clipping_flags(-1.0, -1.0, &b), CLIP_X_MIN | CLIP_Y_MIN);
        assert_eq!(clipping_flags(5.0, 12.0, &b), CLIP_Y_MAX);
    }

    #[test]
    fn test_rejects_points_on_one_side() {
        let b = clip_box();
        let p = PointF::new;
        assert!(is_rejected(&[p(11.0, 0.0), p(20.0, 30.0)], &b));
        assert!(!is_rejected(&[p(-5.0, 5.0), p(15.0, 5.0)], &b));
        assert!(!is_rejected(&[p(5.0, 5.0)], &b));
        assert!(!is_rejected(&[], &b));
        assert!(is_rejected(&[p(5.0, 5.0)], &RectangleF::default()));
    }

    #[test]
    fn test_segment_visibility() {
        let b = clip_box();
        assert!(segment_visible(-5.0, 5.0, 15.0, 5.0, &b));
        // Corner-straddling segment that misses the box.
        assert!(!segment_visible(-5.0, 8.0, 8.0, 21.0, &b));
        // Corner-straddling segment that crosses it.
        assert!(segment_visible(-5.0, 5.0, 5.0, -5.0, &b));
        assert!(!segment_visible(11.0, -5.0, 20.0, 30.0, &b));
    }
}
