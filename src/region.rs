//! Regions: sets of pixels described by banded rectangles.
//!
//! A [`Region`] owns a y-x banded rectangle list (see
//! [`region_op`](crate::region_op)) and the bounding extent of that list.
//! Boolean operations compute a fresh list through the band sweep and then
//! replace the old one, so a region is never observed half-updated.
//!
//! There is no separate "infinite" flag. The infinite region is a single
//! sentinel rectangle spanning ±2²² on both axes; any region whose only
//! rectangle equals the sentinel is reported as infinite.

use std::borrow::Cow;

use crate::geometry::{PointF, Rectangle, RectangleF};
use crate::matrix::Matrix;
use crate::path::{FillMode, GraphicsPath};
use crate::region_op::{calculate_extents, region_operation, RegionOpKind};

/// Half the side of the infinite region's sentinel rectangle (2²²).
pub const INFINITE_EXTENT: f32 = 4_194_304.0;

/// The sentinel rectangle used for the infinite region.
pub fn infinite_rect() -> RectangleF {
    RectangleF::from_ltrb(
        -INFINITE_EXTENT,
        -INFINITE_EXTENT,
        INFINITE_EXTENT,
        INFINITE_EXTENT,
    )
}

/// Anything that can be combined with a region.
pub trait RegionOperand {
    fn to_region(&self) -> Cow<'_, Region>;

    /// The operand as a region, sampled on the pixel grid of `grid`, a
    /// world-to-device matrix. Only shapes that need sampling care.
    fn to_region_on_grid(&self, grid: &Matrix) -> Cow<'_, Region> {
        let _ = grid;
        self.to_region()
    }
}

impl RegionOperand for Region {
    fn to_region(&self) -> Cow<'_, Region> {
        Cow::Borrowed(self)
    }
}

impl RegionOperand for RectangleF {
    fn to_region(&self) -> Cow<'_, Region> {
        Cow::Owned(Region::from_rect(*self))
    }
}

impl RegionOperand for Rectangle {
    fn to_region(&self) -> Cow<'_, Region> {
        Cow::Owned(Region::from_rect((*self).into()))
    }
}

impl RegionOperand for GraphicsPath {
    fn to_region(&self) -> Cow<'_, Region> {
        Cow::Owned(Region::from_path(self))
    }

    fn to_region_on_grid(&self, grid: &Matrix) -> Cow<'_, Region> {
        Cow::Owned(Region::from_path_on_grid(self, grid))
    }
}

/// A set of pixels described by non-overlapping banded rectangles.
#[derive(Debug, Clone, Default)]
pub struct Region {
    rects: Vec<RectangleF>,
    extent: RectangleF,
}

impl Region {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Region covering the whole plane.
    pub fn infinite() -> Self {
        Self::from_rect(infinite_rect())
    }

    /// Region covering `rect`. Negative sizes are normalized first; a
    /// rectangle without area gives the empty region.
    pub fn from_rect(rect: RectangleF) -> Self {
        let r = rect.normalized();
        if r.is_empty() {
            return Self::new();
        }
        Self {
            rects: vec![r],
            extent: r,
        }
    }

    /// Union of an arbitrary list of rectangles.
    pub fn from_rects<I: IntoIterator<Item = RectangleF>>(rects: I) -> Self {
        let mut region = Self::new();
        for r in rects {
            region.union(&Region::from_rect(r));
        }
        region
    }

    /// Region covering the interior of `path` under its fill mode.
    ///
    /// Paths made only of axis-aligned rectangles are combined exactly;
    /// anything else is sampled at the centres of whole-unit pixels.
    pub fn from_path(path: &GraphicsPath) -> Self {
        if let Some(region) = Self::from_rectangle_path(path) {
            return region;
        }
        let rects = path.scans();
        let extent = calculate_extents(&rects);
        Self { rects, extent }
    }

    /// Region covering the interior of `path`, sampled at the pixel
    /// centres of the device grid that `grid` maps world space onto.
    ///
    /// An axis-aligned `grid` is sampled directly. Under rotation or shear
    /// the path is sampled on an axis-aligned grid of the same scale.
    pub fn from_path_on_grid(path: &GraphicsPath, grid: &Matrix) -> Self {
        if let Some(region) = Self::from_rectangle_path(path) {
            return region;
        }
        let sampling = if grid.is_axis_aligned() {
            *grid
        } else {
            Matrix::new_scaling(grid.m11.hypot(grid.m12), grid.m21.hypot(grid.m22))
        };
        let Ok(back) = sampling.inverted() else {
            return Self::from_path(path);
        };

        let mut device = path.clone();
        device.transform(&sampling);
        let scans = device.scans();
        let rects = scans.iter().map(|r| transform_rect_bounds(r, &back));
        if sampling.m11 > 0.0 && sampling.m22 > 0.0 {
            // Band order survives an increasing mapping on both axes.
            let rects: Vec<RectangleF> = rects.collect();
            let extent = calculate_extents(&rects);
            Self { rects, extent }
        } else {
            Self::from_rects(rects)
        }
    }

    fn from_rectangle_path(path: &GraphicsPath) -> Option<Self> {
        let rects = path.rectangle_figures()?;
        if rects.len() > 1 && path.fill_mode() != FillMode::Alternate {
            return None;
        }
        let mut region = Self::new();
        for r in &rects {
            region.xor(r);
        }
        Some(region)
    }

    // ====================================================================
    // Queries
    // ====================================================================

    /// The banded rectangle list.
    pub fn rects(&self) -> &[RectangleF] {
        &self.rects
    }

    /// Smallest rectangle enclosing the region; empty for the empty region.
    pub fn get_bounds(&self) -> RectangleF {
        self.extent
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn is_infinite(&self) -> bool {
        self.rects.len() == 1 && self.rects[0] == infinite_rect()
    }

    /// Total covered area.
    pub fn area(&self) -> f32 {
        self.rects.iter().map(|r| r.width * r.height).sum()
    }

    /// Set equality: both regions cover exactly the same points.
    pub fn equals(&self, other: &Region) -> bool {
        if self.rects == other.rects {
            return true;
        }
        if self.extent != other.extent {
            return false;
        }
        let mut diff = self.clone();
        diff.xor(other);
        diff.is_empty()
    }

    pub fn is_visible_xy(&self, x: f32, y: f32) -> bool {
        if !self.extent.contains(x, y) {
            return false;
        }
        for r in &self.rects {
            if r.top() > y {
                break;
            }
            if r.contains(x, y) {
                return true;
            }
        }
        false
    }

    pub fn is_visible_point(&self, p: PointF) -> bool {
        self.is_visible_xy(p.x, p.y)
    }

    /// `true` when any part of `rect` lies inside the region.
    pub fn is_visible_rect(&self, rect: RectangleF) -> bool {
        let rect = rect.normalized();
        if rect.is_empty() || !self.extent.intersects_with(&rect) {
            return false;
        }
        for r in &self.rects {
            // Bands are sorted by top: nothing further down can overlap.
            if r.top() >= rect.bottom() {
                break;
            }
            if r.intersects_with(&rect) {
                return true;
            }
        }
        false
    }

    /// The region's rectangles with `matrix` applied to their corners.
    ///
    /// Each result is the axis-aligned bounding box of the transformed
    /// corners. Under rotation or shear this covers more than the exact
    /// transformed shape.
    pub fn get_region_scans(&self, matrix: &Matrix) -> Vec<RectangleF> {
        if matrix.is_identity() {
            return self.rects.clone();
        }
        self.rects
            .iter()
            .map(|r| transform_rect_bounds(r, matrix))
            .collect()
    }

    // ====================================================================
    // Special states
    // ====================================================================

    pub fn make_empty(&mut self) {
        self.rects.clear();
        self.extent = RectangleF::default();
    }

    pub fn make_infinite(&mut self) {
        *self = Self::infinite();
    }

    // ====================================================================
    // Boolean operations
    // ====================================================================

    /// `self = self ∪ other`
    pub fn union<O: RegionOperand + ?Sized>(&mut self, other: &O) {
        let other = other.to_region();
        let other = other.as_ref();
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.clone_from(other);
            return;
        }
        if self.rects.len() == 1 && self.extent.contains_rect(&other.extent) {
            return;
        }
        if other.rects.len() == 1 && other.extent.contains_rect(&self.extent) {
            self.clone_from(other);
            return;
        }
        self.apply(other, RegionOpKind::Union);
    }

    /// `self = self ∩ other`
    pub fn intersect<O: RegionOperand + ?Sized>(&mut self, other: &O) {
        let other = other.to_region();
        let other = other.as_ref();
        if self.is_empty() || other.is_empty() || !self.extent.intersects_with(&other.extent) {
            self.make_empty();
            return;
        }
        if other.rects.len() == 1 && other.extent.contains_rect(&self.extent) {
            return;
        }
        if self.rects.len() == 1 && self.extent.contains_rect(&other.extent) {
            self.clone_from(other);
            return;
        }
        self.apply(other, RegionOpKind::Intersect);
    }

    /// `self = self − other`
    pub fn exclude<O: RegionOperand + ?Sized>(&mut self, other: &O) {
        let other = other.to_region();
        let other = other.as_ref();
        if self.is_empty() || other.is_empty() || !self.extent.intersects_with(&other.extent) {
            return;
        }
        self.apply(other, RegionOpKind::Subtract);
    }

    /// `self = (self − other) ∪ (other − self)`
    pub fn xor<O: RegionOperand + ?Sized>(&mut self, other: &O) {
        let other = other.to_region();
        let other = other.as_ref();
        let mut rhs_only = other.clone();
        rhs_only.exclude(self);
        self.exclude(other);
        self.union(&rhs_only);
    }

    /// `self = other − self`
    pub fn complement<O: RegionOperand + ?Sized>(&mut self, other: &O) {
        let mut result = other.to_region().into_owned();
        result.exclude(self);
        *self = result;
    }

    fn apply(&mut self, other: &Region, kind: RegionOpKind) {
        let (rects, extent) = region_operation(&self.rects, &other.rects, kind);
        self.rects = rects;
        self.extent = extent;
    }

    // ====================================================================
    // Geometry
    // ====================================================================

    /// Offset every rectangle by `(dx, dy)`.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        if self.is_empty() {
            return;
        }
        for r in &mut self.rects {
            r.offset(dx, dy);
        }
        self.extent.offset(dx, dy);
    }

    /// Apply `matrix` to the region.
    ///
    /// Translations move the rectangles exactly. Any other matrix rebuilds
    /// the region from [`get_region_scans`](Self::get_region_scans), so
    /// rotated or sheared regions grow to the bounding boxes of their
    /// rectangles. The infinite region stays infinite.
    pub fn transform(&mut self, matrix: &Matrix) {
        if self.is_empty() || self.is_infinite() || matrix.is_identity() {
            return;
        }
        if matrix.is_translation_only() {
            self.translate(matrix.dx, matrix.dy);
            return;
        }
        let scans = self.get_region_scans(matrix);
        *self = Region::from_rects(scans);
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// Bounding box of the four transformed corners of `r`.
pub(crate) fn transform_rect_bounds(r: &RectangleF, matrix: &Matrix) -> RectangleF {
    let corners = [
        matrix.transform_point(PointF::new(r.left(), r.top())),
        matrix.transform_point(PointF::new(r.right(), r.top())),
        matrix.transform_point(PointF::new(r.left(), r.bottom())),
        matrix.transform_point(PointF::new(r.right(), r.bottom())),
    ];
    RectangleF::bounding(&corners).unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
