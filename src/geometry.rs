//! Points, sizes and rectangles in integer and floating variants.
//!
//! Rectangles are stored as `{x, y, width, height}`; the edges are derived
//! (`right = x + width`, `bottom = y + height`) and containment is half-open
//! on the right and bottom edges. A rectangle whose width or height is not
//! positive is empty.

use core::fmt::Debug;
use core::ops::{Add, Neg, Sub};

use crate::basics::{iceil, iround, itrunc};

/// Scalar types usable as coordinates.
pub trait Coord:
    Copy
    + PartialOrd
    + Default
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
{
}

impl<T> Coord for T where
    T: Copy
        + PartialOrd
        + Default
        + Debug
        + Add<Output = T>
        + Sub<Output = T>
        + Neg<Output = T>
{
}

#[inline]
fn pmin<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline]
fn pmax<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointBase<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Coord> PointBase<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn offset(&mut self, dx: T, dy: T) {
        self.x = self.x + dx;
        self.y = self.y + dy;
    }
}

impl<T: Coord> Add<SizeBase<T>> for PointBase<T> {
    type Output = PointBase<T>;
    fn add(self, sz: SizeBase<T>) -> PointBase<T> {
        PointBase::new(self.x + sz.width, self.y + sz.height)
    }
}

impl<T: Coord> Sub<SizeBase<T>> for PointBase<T> {
    type Output = PointBase<T>;
    fn sub(self, sz: SizeBase<T>) -> PointBase<T> {
        PointBase::new(self.x - sz.width, self.y - sz.height)
    }
}

pub type Point = PointBase<i32>;
pub type PointF = PointBase<f32>;

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        PointF::new(p.x as f32, p.y as f32)
    }
}

impl Point {
    pub fn round(p: PointF) -> Point {
        Point::new(iround(p.x), iround(p.y))
    }

    pub fn truncate(p: PointF) -> Point {
        Point::new(itrunc(p.x), itrunc(p.y))
    }

    pub fn ceiling(p: PointF) -> Point {
        Point::new(iceil(p.x), iceil(p.y))
    }
}

// ============================================================================
// Size
// ============================================================================

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeBase<T: Copy> {
    pub width: T,
    pub height: T,
}

impl<T: Coord> SizeBase<T> {
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == T::default() && self.height == T::default()
    }
}

impl<T: Coord> Add for SizeBase<T> {
    type Output = SizeBase<T>;
    fn add(self, rhs: SizeBase<T>) -> SizeBase<T> {
        SizeBase::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl<T: Coord> Sub for SizeBase<T> {
    type Output = SizeBase<T>;
    fn sub(self, rhs: SizeBase<T>) -> SizeBase<T> {
        SizeBase::new(self.width - rhs.width, self.height - rhs.height)
    }
}

pub type Size = SizeBase<i32>;
pub type SizeF = SizeBase<f32>;

impl From<Size> for SizeF {
    fn from(s: Size) -> Self {
        SizeF::new(s.width as f32, s.height as f32)
    }
}

// ============================================================================
// Rectangle
// ============================================================================

/// An axis-aligned rectangle stored as origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectBase<T: Copy> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T: Coord> RectBase<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from edge coordinates.
    pub fn from_ltrb(left: T, top: T, right: T, bottom: T) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn from_point_size(location: PointBase<T>, size: SizeBase<T>) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    #[inline]
    pub fn left(&self) -> T {
        self.x
    }
    #[inline]
    pub fn top(&self) -> T {
        self.y
    }
    #[inline]
    pub fn right(&self) -> T {
        self.x + self.width
    }
    #[inline]
    pub fn bottom(&self) -> T {
        self.y + self.height
    }

    pub fn location(&self) -> PointBase<T> {
        PointBase::new(self.x, self.y)
    }

    pub fn size(&self) -> SizeBase<T> {
        SizeBase::new(self.width, self.height)
    }

    /// `true` when the rectangle covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > T::default()) || !(self.height > T::default())
    }

    /// Half-open containment: the left/top edges are inside, the right and
    /// bottom edges are not.
    #[inline]
    pub fn contains(&self, x: T, y: T) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn contains_point(&self, p: PointBase<T>) -> bool {
        self.contains(p.x, p.y)
    }

    /// `true` when `r` lies entirely inside this rectangle.
    pub fn contains_rect(&self, r: &Self) -> bool {
        self.x <= r.x && r.right() <= self.right() && self.y <= r.y && r.bottom() <= self.bottom()
    }

    /// `true` when the interiors of both rectangles overlap.
    pub fn intersects_with(&self, r: &Self) -> bool {
        r.x < self.right() && self.x < r.right() && r.y < self.bottom() && self.y < r.bottom()
    }

    /// Intersection of two rectangles, or the default (all zero) rectangle
    /// when they do not overlap.
    pub fn intersect(a: &Self, b: &Self) -> Self {
        let x1 = pmax(a.x, b.x);
        let x2 = pmin(a.right(), b.right());
        let y1 = pmax(a.y, b.y);
        let y2 = pmin(a.bottom(), b.bottom());
        if x2 >= x1 && y2 >= y1 {
            Self::from_ltrb(x1, y1, x2, y2)
        } else {
            Self::default()
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(a: &Self, b: &Self) -> Self {
        Self::from_ltrb(
            pmin(a.x, b.x),
            pmin(a.y, b.y),
            pmax(a.right(), b.right()),
            pmax(a.bottom(), b.bottom()),
        )
    }

    pub fn inflate(&mut self, dx: T, dy: T) {
        self.x = self.x - dx;
        self.y = self.y - dy;
        self.width = self.width + dx + dx;
        self.height = self.height + dy + dy;
    }

    pub fn offset(&mut self, dx: T, dy: T) {
        self.x = self.x + dx;
        self.y = self.y + dy;
    }

    /// Flip negative widths/heights so that the rectangle covers the same
    /// area with a non-negative size.
    pub fn normalized(&self) -> Self {
        let mut r = *self;
        if r.width < T::default() {
            r.x = r.x + r.width;
            r.width = -r.width;
        }
        if r.height < T::default() {
            r.y = r.y + r.height;
            r.height = -r.height;
        }
        r
    }
}

pub type Rectangle = RectBase<i32>;
pub type RectangleF = RectBase<f32>;

impl From<Rectangle> for RectangleF {
    fn from(r: Rectangle) -> Self {
        RectangleF::new(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
    }
}

impl Rectangle {
    pub fn round(r: RectangleF) -> Rectangle {
        Rectangle::new(iround(r.x), iround(r.y), iround(r.width), iround(r.height))
    }

    pub fn truncate(r: RectangleF) -> Rectangle {
        Rectangle::new(itrunc(r.x), itrunc(r.y), itrunc(r.width), itrunc(r.height))
    }

    pub fn ceiling(r: RectangleF) -> Rectangle {
        Rectangle::new(iceil(r.x), iceil(r.y), iceil(r.width), iceil(r.height))
    }
}

impl RectangleF {
    pub fn area(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Bounding rectangle of a set of points; `None` for an empty slice.
    pub fn bounding(points: &[PointF]) -> Option<RectangleF> {
        let first = points.first()?;
        let (mut x1, mut y1, mut x2, mut y2) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x1 = x1.min(p.x);
            y1 = y1.min(p.y);
            x2 = x2.max(p.x);
            y2 = y2.max(p.y);
        }
        Some(RectangleF::from_ltrb(x1, y1, x2, y2))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = RectangleF::new(1.0, 2.0, 10.0, 20.0);
        assert_eq!(r.left(), 1.0);
        assert_eq!(r.top(), 2.0);
        assert_eq!(r.right(), 11.0);
        assert_eq!(r.bottom(), 22.0);
        assert_eq!(RectangleF::from_ltrb(1.0, 2.0, 11.0, 22.0), r);
    }

    #[test]
    fn test_rect_is_empty() {
        assert!(Rectangle::new(0, 0, 0, 10).is_empty());
        assert!(Rectangle::new(0, 0, 10, -1).is_empty());
        assert!(!Rectangle::new(0, 0, 1, 1).is_empty());
        assert!(RectangleF::default().is_empty());
    }

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rectangle::new(10, 20, 20, 20);
        assert!(r.contains(10, 20));
        assert!(r.contains(29, 39));
        assert!(!r.contains(30, 25));
        assert!(!r.contains(15, 40));
        assert!(!r.contains(9, 25));
    }

    #[test]
    fn test_rect_contains_rect() {
        let outer = RectangleF::new(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains_rect(&RectangleF::new(2.0, 2.0, 8.0, 8.0)));
        assert!(outer.contains_rect(&outer));
        assert!(!outer.contains_rect(&RectangleF::new(5.0, 5.0, 6.0, 1.0)));
    }

    #[test]
    fn test_rect_intersects_with() {
        let a = Rectangle::new(0, 0, 10, 10);
        assert!(a.intersects_with(&Rectangle::new(5, 5, 10, 10)));
        // Touching edges do not overlap.
        assert!(!a.intersects_with(&Rectangle::new(10, 0, 5, 5)));
    }

    #[test]
    fn test_rect_intersect_and_union() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(5, 5, 10, 10);
        assert_eq!(Rectangle::intersect(&a, &b), Rectangle::new(5, 5, 5, 5));
        assert_eq!(Rectangle::union(&a, &b), Rectangle::new(0, 0, 15, 15));
        let far = Rectangle::new(50, 50, 1, 1);
        assert_eq!(Rectangle::intersect(&a, &far), Rectangle::default());
    }

    #[test]
    fn test_rect_inflate_offset() {
        let mut r = Rectangle::new(10, 10, 10, 10);
        r.inflate(2, 3);
        assert_eq!(r, Rectangle::new(8, 7, 14, 16));
        r.offset(-8, -7);
        assert_eq!(r, Rectangle::new(0, 0, 14, 16));
    }

    #[test]
    fn test_rect_normalized() {
        let r = RectangleF::new(10.0, 10.0, -4.0, -6.0).normalized();
        assert_eq!(r, RectangleF::new(6.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn test_rect_conversions() {
        let rf = RectangleF::new(1.4, 1.6, 2.5, -2.5);
        assert_eq!(Rectangle::round(rf), Rectangle::new(1, 2, 3, -3));
        assert_eq!(Rectangle::truncate(rf), Rectangle::new(1, 1, 2, -2));
        assert_eq!(Rectangle::ceiling(rf), Rectangle::new(2, 2, 3, -2));
        let back: RectangleF = Rectangle::new(1, 2, 3, 4).into();
        assert_eq!(back, RectangleF::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_point_size_arithmetic() {
        let p = Point::new(3, 4) + Size::new(1, 2);
        assert_eq!(p, Point::new(4, 6));
        assert_eq!(p - Size::new(4, 6), Point::new(0, 0));
        assert_eq!(Size::new(1, 1) + Size::new(2, 3), Size::new(3, 4));
        assert_eq!(Point::round(PointF::new(1.5, -1.5)), Point::new(2, -2));
    }

    #[test]
    fn test_bounding() {
        let pts = [
            PointF::new(3.0, 1.0),
            PointF::new(-1.0, 4.0),
            PointF::new(2.0, -2.0),
        ];
        assert_eq!(
            RectangleF::bounding(&pts),
            Some(RectangleF::from_ltrb(-1.0, -2.0, 3.0, 4.0))
        );
        assert_eq!(RectangleF::bounding(&[]), None);
    }
}
