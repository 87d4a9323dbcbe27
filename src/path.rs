//! Polygon paths and their decomposition into scan rectangles.
//!
//! A [`GraphicsPath`] is a list of figures made of straight segments.
//! Curves are not flattened here; callers that need curved outlines hand
//! them to the renderer directly. For region construction every figure is
//! treated as closed and scan-converted one pixel row at a time, sampling
//! at pixel centres.

use crate::basics::{iceil, ifloor};
use crate::geometry::{PointF, RectangleF};
use crate::matrix::Matrix;
use crate::region_op::coalesce;

/// Rule deciding which points are inside self-intersecting or nested
/// figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Even-odd rule.
    #[default]
    Alternate,
    /// Non-zero winding rule.
    Winding,
}

#[derive(Debug, Clone, PartialEq)]
struct Figure {
    points: Vec<PointF>,
    closed: bool,
}

/// A sequence of polygonal figures.
#[derive(Debug, Clone, Default)]
pub struct GraphicsPath {
    figures: Vec<Figure>,
    fill_mode: FillMode,
    start_new: bool,
}

impl GraphicsPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_mode(fill_mode: FillMode) -> Self {
        Self {
            fill_mode,
            ..Self::default()
        }
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn set_fill_mode(&mut self, mode: FillMode) {
        self.fill_mode = mode;
    }

    pub fn reset(&mut self) {
        self.figures.clear();
        self.start_new = false;
    }

    /// The next segment starts a new figure instead of continuing the
    /// current one.
    pub fn start_figure(&mut self) {
        self.start_new = true;
    }

    /// Close the current figure; the next segment starts a new one.
    pub fn close_figure(&mut self) {
        if let Some(f) = self.figures.last_mut() {
            f.closed = true;
        }
        self.start_new = true;
    }

    pub fn close_all_figures(&mut self) {
        for f in &mut self.figures {
            f.closed = true;
        }
        self.start_new = true;
    }

    fn current_figure(&mut self) -> &mut Figure {
        let need_new = match self.figures.last() {
            None => true,
            Some(f) => self.start_new || f.closed,
        };
        if need_new {
            self.figures.push(Figure {
                points: Vec::new(),
                closed: false,
            });
            self.start_new = false;
        }
        let last = self.figures.len() - 1;
        &mut self.figures[last]
    }

    /// Append a segment to the current figure. The start point is skipped
    /// when it repeats the figure's last point.
    pub fn add_line(&mut self, p1: PointF, p2: PointF) {
        self.add_lines(&[p1, p2]);
    }

    pub fn add_lines(&mut self, points: &[PointF]) {
        if points.is_empty() {
            return;
        }
        let fig = self.current_figure();
        let skip = match (fig.points.last(), points.first()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        fig.points
            .extend_from_slice(if skip { &points[1..] } else { points });
    }

    /// Add a closed polygon as its own figure.
    pub fn add_polygon(&mut self, points: &[PointF]) {
        if points.len() < 2 {
            return;
        }
        self.figures.push(Figure {
            points: points.to_vec(),
            closed: true,
        });
        self.start_new = true;
    }

    pub fn add_rectangle(&mut self, rect: RectangleF) {
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        self.add_polygon(&[
            PointF::new(r.left(), r.top()),
            PointF::new(r.right(), r.top()),
            PointF::new(r.right(), r.bottom()),
            PointF::new(r.left(), r.bottom()),
        ]);
    }

    pub fn add_rectangles(&mut self, rects: &[RectangleF]) {
        for r in rects {
            self.add_rectangle(*r);
        }
    }

    pub fn point_count(&self) -> usize {
        self.figures.iter().map(|f| f.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Iterate `(points, closed)` for every figure.
    pub fn figures(&self) -> impl Iterator<Item = (&[PointF], bool)> {
        self.figures.iter().map(|f| (f.points.as_slice(), f.closed))
    }

    pub fn get_bounds(&self) -> RectangleF {
        let all: Vec<PointF> = self
            .figures
            .iter()
            .flat_map(|f| f.points.iter().copied())
            .collect();
        RectangleF::bounding(&all).unwrap_or_default()
    }

    pub fn transform(&mut self, matrix: &Matrix) {
        for f in &mut self.figures {
            matrix.transform_points(&mut f.points);
        }
    }

    // ====================================================================
    // Scan conversion
    // ====================================================================

    /// Decompose the filled interior into banded, coalesced rectangles one
    /// pixel row high (before coalescing).
    pub fn scans(&self) -> Vec<RectangleF> {
        self.scans_within(None)
    }

    /// Like [`scans`](Self::scans), but only the pixels inside `limit` are
    /// visited and emitted.
    pub fn scans_within(&self, limit: Option<&RectangleF>) -> Vec<RectangleF> {
        let mut out = Vec::new();
        if self.is_empty() {
            return out;
        }
        let bounds = self.get_bounds();
        let (mut y_start, mut y_end) = (ifloor(bounds.top()), iceil(bounds.bottom()));
        let (mut x_min, mut x_max) = (i32::MIN, i32::MAX);
        if let Some(limit) = limit {
            y_start = y_start.max(ifloor(limit.top()));
            y_end = y_end.min(iceil(limit.bottom()));
            x_min = ifloor(limit.left());
            x_max = iceil(limit.right());
        }

        let mut crossings: Vec<(f32, i32)> = Vec::new();
        let mut prev_band = 0usize;

        for y in y_start..y_end {
            let yc = y as f32 + 0.5;
            crossings.clear();
            for f in &self.figures {
                collect_crossings(&f.points, yc, &mut crossings);
            }
            if crossings.len() < 2 {
                continue;
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let cur_band = out.len();
            let top = y as f32;
            let bottom = top + 1.0;
            let mut winding = 0i32;
            let mut span_start = 0.0f32;
            for &(x, dir) in &crossings {
                let was_inside = self.is_inside(winding);
                winding += dir;
                let inside = self.is_inside(winding);
                if !was_inside && inside {
                    span_start = x;
                } else if was_inside && !inside {
                    // Pixels whose centres fall in span_start..x.
                    let left = iceil(span_start - 0.5).max(x_min);
                    let right = iceil(x - 0.5).min(x_max);
                    push_span(&mut out, cur_band, left, right, top, bottom);
                }
            }
            if out.len() != cur_band {
                prev_band = coalesce(&mut out, prev_band, cur_band);
            }
        }
        out
    }

    /// The figures as rectangles when every figure is an axis-aligned
    /// rectangle, `None` otherwise.
    pub(crate) fn rectangle_figures(&self) -> Option<Vec<RectangleF>> {
        if self.figures.is_empty() {
            return None;
        }
        self.figures.iter().map(|f| as_rectangle(&f.points)).collect()
    }

    #[inline]
    fn is_inside(&self, winding: i32) -> bool {
        match self.fill_mode {
            FillMode::Alternate => winding & 1 != 0,
            FillMode::Winding => winding != 0,
        }
    }
}

/// Record every edge of the closed polygon `pts` that crosses the line
/// `y = yc`, with +1 for downward edges and -1 for upward ones.
fn collect_crossings(pts: &[PointF], yc: f32, crossings: &mut Vec<(f32, i32)>) {
    let n = pts.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        if a.y == b.y {
            continue;
        }
        let (lo, hi, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        if yc >= lo.y && yc < hi.y {
            let x = lo.x + (yc - lo.y) * (hi.x - lo.x) / (hi.y - lo.y);
            crossings.push((x, dir));
        }
    }
}

/// Axis-aligned rectangle traced by `pts`, allowing a repeated closing
/// point.
fn as_rectangle(pts: &[PointF]) -> Option<RectangleF> {
    let pts = match pts {
        [first, rest @ .., last] if rest.len() == 3 && first == last => &pts[..4],
        _ => pts,
    };
    let [a, b, c, d] = pts else {
        return None;
    };
    let horizontal_first = a.y == b.y && b.x == c.x && c.y == d.y && d.x == a.x;
    let vertical_first = a.x == b.x && b.y == c.y && c.x == d.x && d.y == a.y;
    if !(horizontal_first || vertical_first) {
        return None;
    }
    let r = RectangleF::from_ltrb(a.x.min(c.x), a.y.min(c.y), a.x.max(c.x), a.y.max(c.y));
    (!r.is_empty()).then_some(r)
}

/// Emit pixel columns `left..right` of the current row, merging with the
/// previous span of the same row when they touch.
fn push_span(
    out: &mut Vec<RectangleF>,
    band_start: usize,
    left: i32,
    right: i32,
    top: f32,
    bottom: f32,
) {
    if right <= left {
        return;
    }
    let (left, right) = (left as f32, right as f32);
    if out.len() > band_start {
        if let Some(last) = out.last_mut() {
            if last.right() >= left {
                if right > last.right() {
                    last.width = right - last.x;
                }
                return;
            }
        }
    }
    out.push(RectangleF::from_ltrb(left, top, right, bottom));
}

// ============================================================================
// Tests
// ============================================================================
