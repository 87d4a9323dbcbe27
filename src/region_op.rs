//! Scan-line set algebra over banded rectangle lists.
//!
//! A region's rectangles are y-x banded: rectangles sharing a top and
//! bottom form a band, bands are sorted top to bottom and rectangles inside
//! a band are sorted left to right and never touch. The sweep below walks
//! two such lists band by band, hands every vertical slice to a [`BandOp`]
//! and coalesces each emitted band with the one above it.
//!
//! Inputs must already satisfy the band invariants (no empty rectangles,
//! no negative sizes); [`Region`](crate::region::Region) guarantees this at
//! construction. Feeding anything else produces an unspecified result.

use tracing::trace;

use crate::geometry::RectangleF;

/// Boolean operation performed by [`region_operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOpKind {
    Union,
    Intersect,
    /// First operand minus second operand.
    Subtract,
}

// ============================================================================
// Band mergers
// ============================================================================

/// Merges one vertical slice where both inputs have rectangles.
///
/// `band1` and `band2` are complete bands from each input; every emitted
/// rectangle spans `top..bottom`.
pub trait BandOp {
    /// Whether slices covered only by the first input survive.
    const KEEP_FIRST_ONLY: bool;
    /// Whether slices covered only by the second input survive.
    const KEEP_SECOND_ONLY: bool;

    fn overlap(
        &self,
        band1: &[RectangleF],
        band2: &[RectangleF],
        top: f32,
        bottom: f32,
        out: &mut Vec<RectangleF>,
    );
}

/// Left-to-right union of both bands.
pub struct UnionOp;

/// Pairwise intersection of both bands.
pub struct IntersectOp;

/// First band with the second band's spans cut out.
pub struct SubtractOp;

impl BandOp for UnionOp {
    const KEEP_FIRST_ONLY: bool = true;
    const KEEP_SECOND_ONLY: bool = true;

    fn overlap(
        &self,
        band1: &[RectangleF],
        band2: &[RectangleF],
        top: f32,
        bottom: f32,
        out: &mut Vec<RectangleF>,
    ) {
        let band_start = out.len();
        let (mut i1, mut i2) = (0, 0);
        while i1 < band1.len() && i2 < band2.len() {
            if band1[i1].left() < band2[i2].left() {
                merge_span(out, band_start, &band1[i1], top, bottom);
                i1 += 1;
            } else {
                merge_span(out, band_start, &band2[i2], top, bottom);
                i2 += 1;
            }
        }
        for r in &band1[i1..] {
            merge_span(out, band_start, r, top, bottom);
        }
        for r in &band2[i2..] {
            merge_span(out, band_start, r, top, bottom);
        }
    }
}

/// Append `r` (restricted to `top..bottom`) to the band that starts at
/// `band_start`, extending the last rectangle instead when the two touch or
/// overlap.
#[inline]
fn merge_span(out: &mut Vec<RectangleF>, band_start: usize, r: &RectangleF, top: f32, bottom: f32) {
    if out.len() > band_start {
        if let Some(last) = out.last_mut() {
            if last.right() >= r.left() {
                if last.right() < r.right() {
                    last.width = r.right() - last.x;
                }
                return;
            }
        }
    }
    out.push(RectangleF::from_ltrb(r.left(), top, r.right(), bottom));
}

impl BandOp for IntersectOp {
    const KEEP_FIRST_ONLY: bool = false;
    const KEEP_SECOND_ONLY: bool = false;

    fn overlap(
        &self,
        band1: &[RectangleF],
        band2: &[RectangleF],
        top: f32,
        bottom: f32,
        out: &mut Vec<RectangleF>,
    ) {
        let (mut i1, mut i2) = (0, 0);
        while i1 < band1.len() && i2 < band2.len() {
            let r1 = &band1[i1];
            let r2 = &band2[i2];
            let x1 = r1.left().max(r2.left());
            let x2 = r1.right().min(r2.right());
            if x1 < x2 {
                out.push(RectangleF::from_ltrb(x1, top, x2, bottom));
            }
            // Advance whichever span ends first; both when they end together.
            if r1.right() < r2.right() {
                i1 += 1;
            } else if r2.right() < r1.right() {
                i2 += 1;
            } else {
                i1 += 1;
                i2 += 1;
            }
        }
    }
}

impl BandOp for SubtractOp {
    const KEEP_FIRST_ONLY: bool = true;
    const KEEP_SECOND_ONLY: bool = false;

    fn overlap(
        &self,
        band1: &[RectangleF],
        band2: &[RectangleF],
        top: f32,
        bottom: f32,
        out: &mut Vec<RectangleF>,
    ) {
        let (mut i1, mut i2) = (0, 0);
        let mut x1 = band1[0].left();

        while i1 < band1.len() && i2 < band2.len() {
            let m = &band1[i1];
            let s = &band2[i2];
            if s.right() <= x1 {
                // Subtrahend entirely to the left of what is left of the minuend.
                i2 += 1;
            } else if s.left() <= x1 {
                // Subtrahend covers the left edge of the minuend.
                x1 = s.right();
                if x1 >= m.right() {
                    i1 += 1;
                    if i1 < band1.len() {
                        x1 = band1[i1].left();
                    }
                } else {
                    i2 += 1;
                }
            } else if s.left() < m.right() {
                // Subtrahend starts inside the minuend: keep the part before it.
                out.push(RectangleF::from_ltrb(x1, top, s.left(), bottom));
                x1 = s.right();
                if x1 >= m.right() {
                    i1 += 1;
                    if i1 < band1.len() {
                        x1 = band1[i1].left();
                    }
                } else {
                    i2 += 1;
                }
            } else {
                // Nothing left to cut from this minuend span.
                if m.right() > x1 {
                    out.push(RectangleF::from_ltrb(x1, top, m.right(), bottom));
                }
                i1 += 1;
                if i1 < band1.len() {
                    x1 = band1[i1].left();
                }
            }
        }

        while i1 < band1.len() {
            out.push(RectangleF::from_ltrb(x1, top, band1[i1].right(), bottom));
            i1 += 1;
            if i1 < band1.len() {
                x1 = band1[i1].left();
            }
        }
    }
}

/// Copy a band through, restricted to `top..bottom`.
fn copy_band(band: &[RectangleF], top: f32, bottom: f32, out: &mut Vec<RectangleF>) {
    out.extend(
        band.iter()
            .map(|r| RectangleF::from_ltrb(r.left(), top, r.right(), bottom)),
    );
}

// ============================================================================
// Band helpers
// ============================================================================

/// Index one past the end of the band that starts at `start`.
#[inline]
fn band_end(rects: &[RectangleF], start: usize) -> usize {
    let top = rects[start].top();
    let mut end = start + 1;
    while end < rects.len() && rects[end].top() == top {
        end += 1;
    }
    end
}

/// Merge the band starting at `cur_start` into the band
/// `prev_start..cur_start` when both have the same spans and touch
/// vertically.
///
/// Returns the start of the last band in `out`, which becomes the previous
/// band for the next call.
pub fn coalesce(out: &mut Vec<RectangleF>, prev_start: usize, cur_start: usize) -> usize {
    let end = out.len();
    if cur_start >= end {
        return prev_start;
    }
    let prev_num = cur_start - prev_start;
    let cur_num = band_end(out, cur_start) - cur_start;

    // Several bands were added at once (flushing a tail): only the first
    // one can merge upward, and the last one is the next "previous band".
    let mut last_band = cur_start;
    if cur_start + cur_num < end {
        let last_top = out[end - 1].top();
        last_band = end - 1;
        while out[last_band - 1].top() == last_top {
            last_band -= 1;
        }
    }

    if prev_num != cur_num || cur_num == 0 {
        return last_band;
    }
    if out[prev_start].bottom() != out[cur_start].top() {
        return last_band;
    }
    let same_spans = (0..cur_num).all(|k| {
        let p = &out[prev_start + k];
        let c = &out[cur_start + k];
        p.left() == c.left() && p.right() == c.right()
    });
    if !same_spans {
        return last_band;
    }

    for k in 0..cur_num {
        let bottom = out[cur_start + k].bottom();
        let p = &mut out[prev_start + k];
        p.height = bottom - p.y;
    }
    out.drain(cur_start..cur_start + cur_num);

    if cur_start + cur_num == end {
        prev_start
    } else {
        last_band - cur_num
    }
}

/// Bounding rectangle of a banded list: left/right from every rectangle,
/// top from the first band and bottom from the last.
pub fn calculate_extents(rects: &[RectangleF]) -> RectangleF {
    let (first, last) = match (rects.first(), rects.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return RectangleF::default(),
    };
    let mut left = first.left();
    let mut right = first.right();
    for r in &rects[1..] {
        left = left.min(r.left());
        right = right.max(r.right());
    }
    RectangleF::from_ltrb(left, first.top(), right, last.bottom())
}

// ============================================================================
// The sweep
// ============================================================================

/// Combine two banded rectangle lists.
pub fn region_operation(
    a: &[RectangleF],
    b: &[RectangleF],
    kind: RegionOpKind,
) -> (Vec<RectangleF>, RectangleF) {
    let rects = match kind {
        RegionOpKind::Union => sweep(a, b, &UnionOp),
        RegionOpKind::Intersect => sweep(a, b, &IntersectOp),
        RegionOpKind::Subtract => sweep(a, b, &SubtractOp),
    };
    trace!(
        ?kind,
        lhs = a.len(),
        rhs = b.len(),
        result = rects.len(),
        "region operation"
    );
    let extent = calculate_extents(&rects);
    (rects, extent)
}

/// Generic band sweep.
pub fn sweep<O: BandOp>(r1: &[RectangleF], r2: &[RectangleF], op: &O) -> Vec<RectangleF> {
    let mut out: Vec<RectangleF> = Vec::with_capacity(2 * r1.len().max(r2.len()));
    let (n1, n2) = (r1.len(), r2.len());
    let (mut i1, mut i2) = (0usize, 0usize);

    // Bottom of the last slice handled; nothing above it is emitted again.
    let mut ybot = match (r1.first(), r2.first()) {
        (Some(a), Some(b)) => a.top().min(b.top()),
        (Some(a), None) => a.top(),
        (None, Some(b)) => b.top(),
        (None, None) => return out,
    };
    let mut prev_band = 0usize;

    while i1 < n1 && i2 < n2 {
        let e1 = band_end(r1, i1);
        let e2 = band_end(r2, i2);
        let (t1, b1) = (r1[i1].top(), r1[i1].bottom());
        let (t2, b2) = (r2[i2].top(), r2[i2].bottom());

        // Part of a band lying above the other input's current band.
        let mut cur_band = out.len();
        let ytop;
        if t1 < t2 {
            let top = t1.max(ybot);
            let bot = b1.min(t2);
            if O::KEEP_FIRST_ONLY && top < bot {
                copy_band(&r1[i1..e1], top, bot, &mut out);
            }
            ytop = t2;
        } else if t2 < t1 {
            let top = t2.max(ybot);
            let bot = b2.min(t1);
            if O::KEEP_SECOND_ONLY && top < bot {
                copy_band(&r2[i2..e2], top, bot, &mut out);
            }
            ytop = t1;
        } else {
            ytop = t1;
        }
        if out.len() != cur_band {
            prev_band = coalesce(&mut out, prev_band, cur_band);
        }

        // Overlapping slice.
        ybot = b1.min(b2);
        cur_band = out.len();
        if ybot > ytop {
            op.overlap(&r1[i1..e1], &r2[i2..e2], ytop, ybot, &mut out);
        }
        if out.len() != cur_band {
            prev_band = coalesce(&mut out, prev_band, cur_band);
        }

        if b1 == ybot {
            i1 = e1;
        }
        if b2 == ybot {
            i2 = e2;
        }
    }

    // One input is exhausted; flush the other's remaining bands.
    let cur_band = out.len();
    if i1 < n1 {
        if O::KEEP_FIRST_ONLY {
            while i1 < n1 {
                let e1 = band_end(r1, i1);
                copy_band(&r1[i1..e1], r1[i1].top().max(ybot), r1[i1].bottom(), &mut out);
                i1 = e1;
            }
        }
    } else if i2 < n2 && O::KEEP_SECOND_ONLY {
        while i2 < n2 {
            let e2 = band_end(r2, i2);
            copy_band(&r2[i2..e2], r2[i2].top().max(ybot), r2[i2].bottom(), &mut out);
            i2 = e2;
        }
    }
    if out.len() != cur_band {
        coalesce(&mut out, prev_band, cur_band);
    }

    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> RectangleF {
        RectangleF::new(x, y, w, h)
    }

    fn area(rects: &[RectangleF]) -> f32 {
        rects.iter().map(|r| r.width * r.height).sum()
    }

    /// Checks ordering, banding and horizontal maximality.
    fn assert_banded(rects: &[RectangleF]) {
        for w in rects.windows(2) {
            let (a, b) = (&w[0], &w[1]);
            assert!(!a.is_empty() && !b.is_empty());
            if a.top() == b.top() {
                assert_eq!(a.bottom(), b.bottom(), "band has mixed bottoms: {:?}", rects);
                assert!(a.right() < b.left(), "touching or unsorted spans: {:?}", rects);
            } else {
                assert!(a.top() < b.top(), "bands out of order: {:?}", rects);
                assert!(a.bottom() <= b.top(), "bands overlap: {:?}", rects);
            }
        }
    }

    #[test]
    fn test_union_overlapping() {
        let (out, ext) = region_operation(
            &[r(0.0, 0.0, 10.0, 10.0)],
            &[r(5.0, 5.0, 10.0, 10.0)],
            RegionOpKind::Union,
        );
        assert_banded(&out);
        assert_eq!(area(&out), 175.0);
        assert_eq!(
            out,
            vec![
                r(0.0, 0.0, 10.0, 5.0),
                r(0.0, 5.0, 15.0, 5.0),
                r(5.0, 10.0, 10.0, 5.0),
            ]
        );
        assert_eq!(ext, r(0.0, 0.0, 15.0, 15.0));
    }

    #[test]
    fn test_union_touching_merges_horizontally() {
        let (out, _) = region_operation(
            &[r(0.0, 0.0, 5.0, 5.0)],
            &[r(5.0, 0.0, 5.0, 5.0)],
            RegionOpKind::Union,
        );
        assert_eq!(out, vec![r(0.0, 0.0, 10.0, 5.0)]);
    }

    #[test]
    fn test_union_stacked_coalesces_vertically() {
        let (out, _) = region_operation(
            &[r(0.0, 0.0, 10.0, 5.0)],
            &[r(0.0, 5.0, 10.0, 5.0)],
            RegionOpKind::Union,
        );
        assert_eq!(out, vec![r(0.0, 0.0, 10.0, 10.0)]);
    }

    #[test]
    fn test_union_disjoint_bands() {
        let (out, ext) = region_operation(
            &[r(0.0, 0.0, 4.0, 4.0)],
            &[r(10.0, 20.0, 4.0, 4.0)],
            RegionOpKind::Union,
        );
        assert_eq!(out, vec![r(0.0, 0.0, 4.0, 4.0), r(10.0, 20.0, 4.0, 4.0)]);
        assert_eq!(ext, r(0.0, 0.0, 14.0, 24.0));
    }

    #[test]
    fn test_intersect() {
        let (out, ext) = region_operation(
            &[r(0.0, 0.0, 10.0, 10.0)],
            &[r(5.0, 5.0, 10.0, 10.0)],
            RegionOpKind::Intersect,
        );
        assert_eq!(out, vec![r(5.0, 5.0, 5.0, 5.0)]);
        assert_eq!(ext, r(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn test_intersect_multi_span_band() {
        // Two spans in one band against a single wide span.
        let a = [r(0.0, 0.0, 3.0, 2.0), r(5.0, 0.0, 3.0, 2.0)];
        let b = [r(1.0, 1.0, 6.0, 4.0)];
        let (out, _) = region_operation(&a, &b, RegionOpKind::Intersect);
        assert_eq!(out, vec![r(1.0, 1.0, 2.0, 1.0), r(5.0, 1.0, 2.0, 1.0)]);
    }

    #[test]
    fn test_subtract_left_half() {
        let (out, _) = region_operation(
            &[r(0.0, 0.0, 10.0, 10.0)],
            &[r(0.0, 0.0, 5.0, 10.0)],
            RegionOpKind::Subtract,
        );
        assert_eq!(out, vec![r(5.0, 0.0, 5.0, 10.0)]);
    }

    #[test]
    fn test_subtract_hole() {
        let (out, ext) = region_operation(
            &[r(0.0, 0.0, 10.0, 10.0)],
            &[r(3.0, 3.0, 4.0, 4.0)],
            RegionOpKind::Subtract,
        );
        assert_banded(&out);
        assert_eq!(
            out,
            vec![
                r(0.0, 0.0, 10.0, 3.0),
                r(0.0, 3.0, 3.0, 4.0),
                r(7.0, 3.0, 3.0, 4.0),
                r(0.0, 7.0, 10.0, 3.0),
            ]
        );
        assert_eq!(area(&out), 84.0);
        assert_eq!(ext, r(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_subtract_everything() {
        let (out, ext) = region_operation(
            &[r(2.0, 2.0, 2.0, 2.0)],
            &[r(0.0, 0.0, 10.0, 10.0)],
            RegionOpKind::Subtract,
        );
        assert!(out.is_empty());
        assert!(ext.is_empty());
    }

    #[test]
    fn test_subtract_keeps_tail_of_minuend() {
        let a = [r(0.0, 0.0, 10.0, 20.0)];
        let b = [r(0.0, 0.0, 10.0, 5.0)];
        let (out, _) = region_operation(&a, &b, RegionOpKind::Subtract);
        assert_eq!(out, vec![r(0.0, 5.0, 10.0, 15.0)]);
    }

    #[test]
    fn test_subtract_multiple_cuts_in_one_span() {
        let a = [r(0.0, 0.0, 20.0, 1.0)];
        let b = [r(2.0, 0.0, 2.0, 1.0), r(8.0, 0.0, 2.0, 1.0)];
        let (out, _) = region_operation(&a, &b, RegionOpKind::Subtract);
        assert_eq!(
            out,
            vec![
                r(0.0, 0.0, 2.0, 1.0),
                r(4.0, 0.0, 4.0, 1.0),
                r(10.0, 0.0, 10.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let a = [r(0.0, 0.0, 1.0, 1.0)];
        assert_eq!(sweep(&a, &[], &UnionOp), a.to_vec());
        assert_eq!(sweep(&[], &a, &UnionOp), a.to_vec());
        assert!(sweep(&a, &[], &IntersectOp).is_empty());
        assert_eq!(sweep(&a, &[], &SubtractOp), a.to_vec());
        assert!(sweep(&[], &a, &SubtractOp).is_empty());
        assert!(sweep(&[], &[], &UnionOp).is_empty());
    }

    #[test]
    fn test_coalesce_tail_of_several_bands() {
        // prev band at 0..1, then two bands added at once; only the first
        // one merges upward.
        let mut out = vec![
            r(0.0, 0.0, 5.0, 1.0),
            r(0.0, 1.0, 5.0, 1.0),
            r(1.0, 2.0, 2.0, 1.0),
        ];
        let next = coalesce(&mut out, 0, 1);
        assert_eq!(out, vec![r(0.0, 0.0, 5.0, 2.0), r(1.0, 2.0, 2.0, 1.0)]);
        assert_eq!(next, 1);
    }

    #[test]
    fn test_coalesce_rejects_different_spans() {
        let mut out = vec![r(0.0, 0.0, 5.0, 1.0), r(0.0, 1.0, 6.0, 1.0)];
        let next = coalesce(&mut out, 0, 1);
        assert_eq!(out.len(), 2);
        assert_eq!(next, 1);
    }

    #[test]
    fn test_calculate_extents() {
        let rects = [
            r(5.0, 0.0, 1.0, 1.0),
            r(0.0, 1.0, 2.0, 1.0),
            r(8.0, 1.0, 4.0, 1.0),
            r(3.0, 2.0, 1.0, 3.0),
        ];
        assert_eq!(calculate_extents(&rects), RectangleF::from_ltrb(0.0, 0.0, 12.0, 5.0));
        assert_eq!(calculate_extents(&[]), RectangleF::default());
    }
}
