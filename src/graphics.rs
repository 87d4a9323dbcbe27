//! Drawing surface: coordinate pipeline, clipping and primitive dispatch.
//!
//! World coordinates pass through the optional world transform into page
//! space, then through the page scale and the page unit's pixel ratio into
//! device pixels relative to the surface origin. The clip region is kept in
//! world coordinates and converted to device clip rectangles whenever the
//! clip or any stage of the pipeline changes. Primitives whose device
//! bounds miss the device clip extent never reach the renderer.

use tracing::{debug, warn};

use crate::basics::{iround, itrunc};
use crate::bezier_arc::arc_to_beziers;
use crate::brush::SolidBrush;
use crate::clip::{is_rejected, segment_visible};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::font::Font;
use crate::geometry::{Point, PointF, Rectangle, RectangleF, SizeF};
use crate::matrix::{Matrix, MatrixOrder};
use crate::path::{FillMode, GraphicsPath};
use crate::pen::Pen;
use crate::region::{transform_rect_bounds, Region, RegionOperand};
use crate::renderer::Renderer;
use crate::resource::{BindOutcome, ObjectHandle, SurfaceId};
use crate::units::{CoordinateSpace, GraphicsUnit};

/// How a new clip combines with the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    Replace,
    Intersect,
    Union,
    Xor,
    Exclude,
    Complement,
}

/// Token returned by [`Graphics::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsState(u64);

#[derive(Debug, Clone)]
struct SavedState {
    id: u64,
    transform: Option<Matrix>,
    page_unit: GraphicsUnit,
    page_scale: f32,
    clip: Region,
}

/// Size and line count of laid-out text, in page units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StringMeasure {
    pub size: SizeF,
    pub chars_fitted: usize,
    pub lines_filled: usize,
}

const DISPOSED: Error = Error::Disposed("Graphics");

pub struct Graphics<R: Renderer> {
    renderer: Option<R>,
    id: SurfaceId,
    bounds: Rectangle,
    transform: Option<Matrix>,
    page_unit: GraphicsUnit,
    page_scale: f32,
    clip: Region,
    device_clip: Vec<Rectangle>,
    device_clip_extent: Rectangle,
    owned: Vec<ObjectHandle>,
    saved: Vec<SavedState>,
    next_state: u64,
}

impl<R: Renderer> Graphics<R> {
    /// Wrap `renderer`, drawing into the device rectangle `bounds`.
    pub fn new(renderer: R, bounds: Rectangle) -> Self {
        debug!(renderer = ?renderer.id(), ?bounds, "graphics created");
        let mut g = Self {
            renderer: Some(renderer),
            id: SurfaceId::next(),
            bounds: bounds.normalized(),
            transform: None,
            page_unit: GraphicsUnit::default(),
            page_scale: 1.0,
            clip: Region::infinite(),
            device_clip: Vec::new(),
            device_clip_extent: Rectangle::default(),
            owned: Vec::new(),
            saved: Vec::new(),
            next_state: 1,
        };
        g.update_clip();
        g
    }

    pub fn renderer(&self) -> Result<&R> {
        self.renderer.as_ref().ok_or(DISPOSED)
    }

    pub fn renderer_mut(&mut self) -> Result<&mut R> {
        self.renderer.as_mut().ok_or(DISPOSED)
    }

    pub fn is_disposed(&self) -> bool {
        self.renderer.is_none()
    }

    pub fn bounds(&self) -> Result<Rectangle> {
        self.renderer()?;
        Ok(self.bounds)
    }

    /// Release every backend object this surface created and hand back the
    /// renderer. Every later call fails with [`Error::Disposed`].
    pub fn dispose(&mut self) -> Result<R> {
        let mut renderer = self.renderer.take().ok_or(DISPOSED)?;
        let released = self.owned.len();
        for h in self.owned.drain(..) {
            renderer.release(h);
        }
        self.saved.clear();
        self.device_clip.clear();
        debug!(released, "graphics disposed");
        Ok(renderer)
    }

    // ====================================================================
    // Transform
    // ====================================================================

    pub fn transform(&self) -> Result<Matrix> {
        self.renderer()?;
        Ok(self.transform.unwrap_or_default())
    }

    pub fn set_transform(&mut self, matrix: &Matrix) -> Result<()> {
        self.renderer()?;
        self.transform = (!matrix.is_identity()).then_some(*matrix);
        self.update_clip();
        Ok(())
    }

    pub fn reset_transform(&mut self) -> Result<()> {
        self.renderer()?;
        self.transform = None;
        self.update_clip();
        Ok(())
    }

    pub fn multiply_transform(&mut self, matrix: &Matrix, order: MatrixOrder) -> Result<()> {
        let mut m = self.transform()?;
        m.multiply(matrix, order);
        self.set_transform(&m)
    }

    pub fn translate_transform(&mut self, dx: f32, dy: f32, order: MatrixOrder) -> Result<()> {
        self.multiply_transform(&Matrix::new_translation(dx, dy), order)
    }

    pub fn scale_transform(&mut self, sx: f32, sy: f32, order: MatrixOrder) -> Result<()> {
        self.multiply_transform(&Matrix::new_scaling(sx, sy), order)
    }

    /// `angle` is in degrees.
    pub fn rotate_transform(&mut self, angle: f32, order: MatrixOrder) -> Result<()> {
        self.multiply_transform(&Matrix::new_rotation(angle), order)
    }

    // ====================================================================
    // Page
    // ====================================================================

    pub fn page_unit(&self) -> Result<GraphicsUnit> {
        self.renderer()?;
        Ok(self.page_unit)
    }

    pub fn set_page_unit(&mut self, unit: GraphicsUnit) -> Result<()> {
        self.renderer()?;
        self.page_unit = unit;
        self.update_clip();
        Ok(())
    }

    pub fn page_scale(&self) -> Result<f32> {
        self.renderer()?;
        Ok(self.page_scale)
    }

    pub fn set_page_scale(&mut self, scale: f32) -> Result<()> {
        self.renderer()?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidArgument(format!("page scale {scale}")));
        }
        self.page_scale = scale;
        self.update_clip();
        Ok(())
    }

    pub fn dpi_x(&self) -> Result<f32> {
        Ok(self.renderer()?.dpi_x())
    }

    pub fn dpi_y(&self) -> Result<f32> {
        Ok(self.renderer()?.dpi_y())
    }

    // ====================================================================
    // Clip
    // ====================================================================

    /// A copy of the clip region in world coordinates.
    pub fn clip(&self) -> Result<Region> {
        self.renderer()?;
        Ok(self.clip.clone())
    }

    /// Combine the clip with `operand`. Paths are sampled on the current
    /// device pixel grid, not on whole world units.
    pub fn set_clip<O: RegionOperand + ?Sized>(
        &mut self,
        operand: &O,
        mode: CombineMode,
    ) -> Result<()> {
        let grid = self.device_matrix()?;
        let region = operand.to_region_on_grid(&grid);
        match mode {
            CombineMode::Replace => self.clip = region.into_owned(),
            CombineMode::Intersect => self.clip.intersect(&*region),
            CombineMode::Union => self.clip.union(&*region),
            CombineMode::Xor => self.clip.xor(&*region),
            CombineMode::Exclude => self.clip.exclude(&*region),
            CombineMode::Complement => self.clip.complement(&*region),
        }
        self.update_clip();
        Ok(())
    }

    pub fn intersect_clip<O: RegionOperand + ?Sized>(&mut self, operand: &O) -> Result<()> {
        self.set_clip(operand, CombineMode::Intersect)
    }

    pub fn exclude_clip<O: RegionOperand + ?Sized>(&mut self, operand: &O) -> Result<()> {
        self.set_clip(operand, CombineMode::Exclude)
    }

    pub fn reset_clip(&mut self) -> Result<()> {
        self.renderer()?;
        self.clip.make_infinite();
        self.update_clip();
        Ok(())
    }

    pub fn translate_clip(&mut self, dx: f32, dy: f32) -> Result<()> {
        self.renderer()?;
        self.clip.translate(dx, dy);
        self.update_clip();
        Ok(())
    }

    pub fn clip_bounds(&self) -> Result<RectangleF> {
        self.renderer()?;
        Ok(self.clip.get_bounds())
    }

    /// Bounds of the visible part of the clip, in world coordinates.
    pub fn visible_clip_bounds(&self) -> Result<RectangleF> {
        if self.device_clip.is_empty() {
            self.renderer()?;
            return Ok(RectangleF::default());
        }
        let inverse = self.device_matrix()?.inverted()?;
        Ok(transform_rect_bounds(
            &RectangleF::from(self.device_clip_extent),
            &inverse,
        ))
    }

    pub fn is_clip_empty(&self) -> Result<bool> {
        self.renderer()?;
        Ok(self.clip.is_empty())
    }

    pub fn is_visible_clip_empty(&self) -> Result<bool> {
        self.renderer()?;
        Ok(self.device_clip.is_empty())
    }

    pub fn is_visible_point(&self, p: PointF) -> Result<bool> {
        let d = self.convert_point(p.x, p.y)?;
        Ok(self.device_clip.iter().any(|r| r.contains_point(d)))
    }

    pub fn is_visible_rect(&self, rect: RectangleF) -> Result<bool> {
        let m = self.device_matrix()?;
        let d = transform_rect_bounds(&rect.normalized(), &m);
        Ok(self
            .device_clip
            .iter()
            .any(|r| RectangleF::from(*r).intersects_with(&d)))
    }

    pub fn device_clip_rects(&self) -> Result<&[Rectangle]> {
        self.renderer()?;
        Ok(&self.device_clip)
    }

    pub fn device_clip_extent(&self) -> Result<Rectangle> {
        self.renderer()?;
        Ok(self.device_clip_extent)
    }

    /// Recompute the device clip from the world clip and hand it to the
    /// renderer.
    fn update_clip(&mut self) {
        let Some(renderer) = self.renderer.as_ref() else {
            return;
        };
        let matrix = self.device_matrix_at(renderer.dpi_x(), renderer.dpi_y());
        let surface = RectangleF::from(self.bounds);

        let fast = self.transform.is_none()
            && self.page_scale == 1.0
            && self.page_unit == GraphicsUnit::World;
        let scans: Vec<RectangleF> = if fast {
            self.clip
                .rects()
                .iter()
                .map(|r| {
                    let mut r = *r;
                    r.offset(surface.x, surface.y);
                    r
                })
                .collect()
        } else {
            self.clip.get_region_scans(&matrix)
        };

        self.device_clip.clear();
        let mut extent: Option<Rectangle> = None;
        for r in &scans {
            let d = to_device_rect(&RectangleF::intersect(r, &surface));
            if d.is_empty() {
                continue;
            }
            extent = Some(match extent {
                Some(e) => Rectangle::union(&e, &d),
                None => d,
            });
            self.device_clip.push(d);
        }
        self.device_clip_extent = extent.unwrap_or_default();

        debug!(
            rects = self.device_clip.len(),
            extent = ?self.device_clip_extent,
            fast,
            "device clip updated"
        );
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_clip_rects(&self.device_clip);
        }
    }

    // ====================================================================
    // State
    // ====================================================================

    pub fn save(&mut self) -> Result<GraphicsState> {
        self.renderer()?;
        let id = self.next_state;
        self.next_state += 1;
        self.saved.push(SavedState {
            id,
            transform: self.transform,
            page_unit: self.page_unit,
            page_scale: self.page_scale,
            clip: self.clip.clone(),
        });
        Ok(GraphicsState(id))
    }

    /// Restore `state` and discard every state saved after it. Unknown
    /// states are ignored.
    pub fn restore(&mut self, state: GraphicsState) -> Result<()> {
        self.renderer()?;
        let Some(pos) = self.saved.iter().position(|s| s.id == state.0) else {
            warn!(state = state.0, "restore of unknown graphics state ignored");
            return Ok(());
        };
        self.saved.truncate(pos + 1);
        let Some(s) = self.saved.pop() else {
            return Ok(());
        };
        self.transform = s.transform;
        self.page_unit = s.page_unit;
        self.page_scale = s.page_scale;
        self.clip = s.clip;
        self.update_clip();
        Ok(())
    }

    // ====================================================================
    // Coordinates
    // ====================================================================

    fn page_matrix_at(&self, dpi_x: f32, dpi_y: f32) -> Matrix {
        Matrix::from_elements(
            self.page_scale * self.page_unit.pixels_per_unit(dpi_x),
            0.0,
            0.0,
            self.page_scale * self.page_unit.pixels_per_unit(dpi_y),
            self.bounds.x as f32,
            self.bounds.y as f32,
        )
    }

    fn device_matrix_at(&self, dpi_x: f32, dpi_y: f32) -> Matrix {
        let mut m = self.transform.unwrap_or_default();
        m.multiply(&self.page_matrix_at(dpi_x, dpi_y), MatrixOrder::Append);
        m
    }

    /// World-to-device matrix, surface origin included.
    pub fn device_matrix(&self) -> Result<Matrix> {
        let r = self.renderer()?;
        Ok(self.device_matrix_at(r.dpi_x(), r.dpi_y()))
    }

    fn space_to_device(&self, space: CoordinateSpace) -> Result<Matrix> {
        let r = self.renderer()?;
        let (dx, dy) = (r.dpi_x(), r.dpi_y());
        Ok(match space {
            CoordinateSpace::World => self.device_matrix_at(dx, dy),
            CoordinateSpace::Page => self.page_matrix_at(dx, dy),
            CoordinateSpace::Device => Matrix::new(),
        })
    }

    /// Map a world point to integer device coordinates (truncating).
    pub fn convert_point(&self, x: f32, y: f32) -> Result<Point> {
        let (dx, dy) = self.device_matrix()?.transform_xy(x, y);
        Ok(Point::new(itrunc(dx), itrunc(dy)))
    }

    /// Map `points` from `src` space into `dest` space in place.
    pub fn transform_points(
        &self,
        dest: CoordinateSpace,
        src: CoordinateSpace,
        points: &mut [PointF],
    ) -> Result<()> {
        self.renderer()?;
        if points.is_empty() {
            return Err(Error::ArgumentNull("points"));
        }
        if dest == src {
            return Ok(());
        }
        let mut m = self.space_to_device(src)?;
        m.multiply(&self.space_to_device(dest)?.inverted()?, MatrixOrder::Append);
        m.transform_points(points);
        Ok(())
    }

    // ====================================================================
    // Resource binding
    // ====================================================================

    fn bind_pen(&mut self, pen: &mut Pen, device_width: f32) -> Result<ObjectHandle> {
        let color = pen.color();
        let renderer = self.renderer.as_mut().ok_or(DISPOSED)?;
        let mut stale = Vec::new();
        let outcome = pen.slot_mut().bind(self.id, device_width, &mut stale, || {
            renderer.create_pen(color, device_width)
        })?;
        Ok(settle(renderer, &mut self.owned, stale, outcome))
    }

    fn bind_brush(&mut self, brush: &mut SolidBrush) -> Result<ObjectHandle> {
        let color = brush.color();
        let renderer = self.renderer.as_mut().ok_or(DISPOSED)?;
        let mut stale = Vec::new();
        let outcome = brush
            .slot_mut()
            .bind(self.id, 0.0, &mut stale, || renderer.create_brush(color))?;
        Ok(settle(renderer, &mut self.owned, stale, outcome))
    }

    fn bind_font(&mut self, font: &mut Font) -> Result<ObjectHandle> {
        let pixel_size = self.font_pixel_size(font)?;
        let family = font.family().to_owned();
        let style = font.style();
        let renderer = self.renderer.as_mut().ok_or(DISPOSED)?;
        let mut stale = Vec::new();
        let outcome = font.slot_mut().bind(self.id, pixel_size, &mut stale, || {
            renderer.create_font(&family, pixel_size, style)
        })?;
        Ok(settle(renderer, &mut self.owned, stale, outcome))
    }

    /// Em size in device pixels. World-unit fonts follow the page scale and
    /// page unit; other units are absolute.
    fn font_pixel_size(&self, font: &Font) -> Result<f32> {
        let dpi = self.dpi_y()?;
        Ok(match font.unit() {
            GraphicsUnit::World => {
                font.size() * self.page_scale * self.page_unit.pixels_per_unit(dpi)
            }
            unit => font.size() * unit.pixels_per_unit(dpi),
        })
    }

    // ====================================================================
    // Drawing
    // ====================================================================

    fn to_device(&self, m: &Matrix, points: &[PointF]) -> Vec<PointF> {
        let mut d = points.to_vec();
        m.transform_points(&mut d);
        d
    }

    /// `true` when device points inflated by `margin` miss the clip extent.
    fn rejected(&self, device_points: &[PointF], margin: f32) -> bool {
        is_rejected(device_points, &self.inflated_extent(margin))
    }

    fn inflated_extent(&self, margin: f32) -> RectangleF {
        if self.device_clip.is_empty() {
            return RectangleF::default();
        }
        let mut ext = RectangleF::from(self.device_clip_extent);
        ext.inflate(margin, margin);
        ext
    }

    fn pen_metrics(&self, m: &Matrix, pen: &Pen) -> (f32, f32) {
        let width = pen.width() * m.scale_factor();
        (width, width.ceil() + 1.0)
    }

    pub fn clear(&mut self, color: Color) -> Result<()> {
        self.renderer_mut()?.clear(color);
        Ok(())
    }

    pub fn draw_line(&mut self, pen: &mut Pen, p1: PointF, p2: PointF) -> Result<()> {
        self.draw_lines(pen, &[p1, p2])
    }

    /// Draw the connected segments through `points`.
    pub fn draw_lines(&mut self, pen: &mut Pen, points: &[PointF]) -> Result<()> {
        let m = self.device_matrix()?;
        check_points(points, 2)?;
        let (width, margin) = self.pen_metrics(&m, pen);
        let d = self.to_device(&m, points);
        let ext = self.inflated_extent(margin);

        let visible: Vec<(PointF, PointF)> = d
            .windows(2)
            .map(|w| (w[0], w[1]))
            .filter(|(a, b)| !ext.is_empty() && segment_visible(a.x, a.y, b.x, b.y, &ext))
            .collect();
        if visible.is_empty() {
            return Ok(());
        }
        let h = self.bind_pen(pen, width)?;
        let renderer = self.renderer_mut()?;
        for (a, b) in visible {
            renderer.draw_line(h, device_point(a), device_point(b));
        }
        Ok(())
    }

    pub fn draw_rectangle(&mut self, pen: &mut Pen, rect: RectangleF) -> Result<()> {
        self.draw_polygon(pen, &rect_corners(&rect.normalized()))
    }

    pub fn draw_rectangles(&mut self, pen: &mut Pen, rects: &[RectangleF]) -> Result<()> {
        self.renderer()?;
        if rects.is_empty() {
            return Err(Error::ArgumentNull("rects"));
        }
        for r in rects {
            self.draw_rectangle(pen, *r)?;
        }
        Ok(())
    }

    pub fn fill_rectangle(&mut self, brush: &mut SolidBrush, rect: RectangleF) -> Result<()> {
        let r = rect.normalized();
        self.renderer()?;
        if r.is_empty() {
            return Ok(());
        }
        self.fill_polygon(brush, &rect_corners(&r), FillMode::Alternate)
    }

    pub fn fill_rectangles(&mut self, brush: &mut SolidBrush, rects: &[RectangleF]) -> Result<()> {
        self.renderer()?;
        if rects.is_empty() {
            return Err(Error::ArgumentNull("rects"));
        }
        for r in rects {
            self.fill_rectangle(brush, *r)?;
        }
        Ok(())
    }

    pub fn draw_polygon(&mut self, pen: &mut Pen, points: &[PointF]) -> Result<()> {
        let m = self.device_matrix()?;
        check_points(points, 2)?;
        let (width, margin) = self.pen_metrics(&m, pen);
        let d = self.to_device(&m, points);
        if self.rejected(&d, margin) {
            return Ok(());
        }
        let h = self.bind_pen(pen, width)?;
        let pts: Vec<Point> = d.into_iter().map(device_point).collect();
        self.renderer_mut()?.draw_polygon(h, &pts);
        Ok(())
    }

    pub fn fill_polygon(
        &mut self,
        brush: &mut SolidBrush,
        points: &[PointF],
        fill_mode: FillMode,
    ) -> Result<()>  {
        let m = self.device_matrix()?;
        check_points(points, 3)?;
        let d = self.to_device(&m, points);
        if self.rejected(&d, 0.0) {
            return Ok(());
        }
        let h = self.bind_brush(brush)?;
        let pts: Vec<Point> = d.into_iter().map(device_point).collect();
        self.renderer_mut()?.fill_polygon(h, &pts, fill_mode);
        Ok(())
    }

    pub fn draw_ellipse(&mut self, pen: &mut Pen, rect: RectangleF) -> Result<()> {
        self.draw_arc(pen, rect, 0.0, 360.0)
    }

    /// Angles are in degrees, clockwise from the x axis. Under a transform
    /// that rotates, shears or mirrors, the arc is sent as Bezier curves.
    pub fn draw_arc(
        &mut self,
        pen: &mut Pen,
        rect: RectangleF,
        start_angle: f32,
        sweep_angle: f32,
    ) -> Result<()>  {
        let m = self.device_matrix()?;
        let r = rect.normalized();
        let (width, margin) = self.pen_metrics(&m, pen);
        let device_bounds = transform_rect_bounds(&r, &m);
        if self.rejected(&rect_corners(&device_bounds), margin) {
            return Ok(());
        }
        let h = self.bind_pen(pen, width)?;
        if m.is_axis_aligned() && m.m11 > 0.0 && m.m22 > 0.0 {
            let dr = to_device_rect(&device_bounds);
            self.renderer_mut()?.draw_arc(h, dr, start_angle, sweep_angle);
        } else {
            let d = self.to_device(&m, &arc_to_beziers(&r, start_angle, sweep_angle));
            let pts: Vec<Point> = d.into_iter().map(device_point).collect();
            self.renderer_mut()?.draw_bezier(h, &pts);
        }
        Ok(())
    }

    pub fn draw_bezier(
        &mut self,
        pen: &mut Pen,
        p1: PointF,
        p2: PointF,
        p3: PointF,
        p4: PointF,
    ) -> Result<()>  {
        self.draw_beziers(pen, &[p1, p2, p3, p4])
    }

    /// `points` holds a start point followed by three points per curve.
    pub fn draw_beziers(&mut self, pen: &mut Pen, points: &[PointF]) -> Result<()> {
        let m = self.device_matrix()?;
        check_points(points, 4)?;
        if (points.len() - 1) % 3 != 0 {
            return Err(Error::InvalidArgument(format!(
                "{} points do not form cubic Bezier segments",
                points.len()
            )));
        }
        let (width, margin) = self.pen_metrics(&m, pen);
        let d = self.to_device(&m, points);
        // A cubic lies inside the hull of its control points.
        if self.rejected(&d, margin) {
            return Ok(());
        }
        let h = self.bind_pen(pen, width)?;
        let pts: Vec<Point> = d.into_iter().map(device_point).collect();
        self.renderer_mut()?.draw_bezier(h, &pts);
        Ok(())
    }

    /// Stroke every figure: closed figures as polygons, open ones as
    /// connected segments.
    pub fn draw_path(&mut self, pen: &mut Pen, path: &GraphicsPath) -> Result<()> {
        let m = self.device_matrix()?;
        if path.is_empty() {
            return Ok(());
        }
        let (width, margin) = self.pen_metrics(&m, pen);
        let bounds = transform_rect_bounds(&path.get_bounds(), &m);
        if self.rejected(&rect_corners(&bounds), margin) {
            return Ok(());
        }
        let h = self.bind_pen(pen, width)?;
        let renderer = self.renderer.as_mut().ok_or(DISPOSED)?;
        for (points, closed) in path.figures() {
            let mut d = points.to_vec();
            m.transform_points(&mut d);
            let pts: Vec<Point> = d.into_iter().map(device_point).collect();
            if closed && pts.len() > 2 {
                renderer.draw_polygon(h, &pts);
            } else {
                for w in pts.windows(2) {
                    renderer.draw_line(h, w[0], w[1]);
                }
            }
        }
        Ok(())
    }

    /// Fill the interior of `path` under its fill mode. Paths with several
    /// figures are decomposed into device scan rectangles so holes and
    /// overlaps follow the fill mode exactly.
    pub fn fill_path(&mut self, brush: &mut SolidBrush, path: &GraphicsPath) -> Result<()> {
        let m = self.device_matrix()?;
        if path.is_empty() {
            return Ok(());
        }
        let mut device_path = path.clone();
        device_path.transform(&m);
        if self.rejected(&rect_corners(&device_path.get_bounds()), 0.0) {
            return Ok(());
        }

        let mut figures = device_path.figures().filter(|(p, _)| p.len() > 2);
        let (first, second) = (figures.next(), figures.next());
        let Some((points, _)) = first else {
            return Ok(());
        };
        if second.is_none() {
            let pts: Vec<Point> = points.iter().copied().map(device_point).collect();
            let h = self.bind_brush(brush)?;
            self.renderer_mut()?.fill_polygon(h, &pts, path.fill_mode());
            return Ok(());
        }

        // Only rows and columns inside the clip extent are scanned.
        let scans = device_path.scans_within(Some(&self.inflated_extent(0.0)));
        if scans.is_empty() {
            return Ok(());
        }
        let h = self.bind_brush(brush)?;
        let renderer = self.renderer_mut()?;
        for r in &scans {
            let pts: Vec<Point> = rect_corners(r).into_iter().map(device_point).collect();
            renderer.fill_polygon(h, &pts, FillMode::Alternate);
        }
        Ok(())
    }

    pub fn fill_region(&mut self, brush: &mut SolidBrush, region: &Region) -> Result<()> {
        let m = self.device_matrix()?;
        if region.is_empty() {
            return Ok(());
        }
        let ext = self.inflated_extent(0.0);
        let polys: Vec<Vec<Point>> = region
            .rects()
            .iter()
            .map(|r| self.to_device(&m, &rect_corners(r)))
            .filter(|d| !is_rejected(d, &ext))
            .map(|d| d.into_iter().map(device_point).collect())
            .collect();
        if polys.is_empty() {
            return Ok(());
        }
        let h = self.bind_brush(brush)?;
        let renderer = self.renderer_mut()?;
        for pts in &polys {
            renderer.fill_polygon(h, pts, FillMode::Alternate);
        }
        Ok(())
    }

    // ====================================================================
    // Text
    // ====================================================================

    /// Draw `text` starting at `origin` with no layout bounds.
    pub fn draw_string(
        &mut self,
        text: &str,
        font: &mut Font,
        brush: &mut SolidBrush,
        origin: PointF,
    ) -> Result<()>  {
        let at = self.convert_point(origin.x, origin.y)?;
        if text.is_empty() {
            return Ok(());
        }
        let fh = self.bind_font(font)?;
        let bh = self.bind_brush(brush)?;
        self.renderer_mut()?
            .draw_string(fh, bh, text, Rectangle::new(at.x, at.y, 0, 0));
        Ok(())
    }

    /// Draw `text` laid out inside `layout`.
    pub fn draw_string_in(
        &mut self,
        text: &str,
        font: &mut Font,
        brush: &mut SolidBrush,
        layout: RectangleF,
    ) -> Result<()>  {
        let m = self.device_matrix()?;
        if text.is_empty() {
            return Ok(());
        }
        let bounds = transform_rect_bounds(&layout.normalized(), &m);
        if !bounds.is_empty() && self.rejected(&rect_corners(&bounds), 0.0) {
            return Ok(());
        }
        let fh = self.bind_font(font)?;
        let bh = self.bind_brush(brush)?;
        self.renderer_mut()?
            .draw_string(fh, bh, text, to_device_rect(&bounds));
        Ok(())
    }

    /// Measure `text` in page units, wrapping at `max_width` page units
    /// when given.
    pub fn measure_string(
        &mut self,
        text: &str,
        font: &mut Font,
        max_width: Option<f32>,
    ) -> Result<StringMeasure>  {
        let (dpi_x, dpi_y) = (self.dpi_x()?, self.dpi_y()?);
        if text.is_empty() {
            return Ok(StringMeasure::default());
        }
        let ratio_x = self.page_scale * self.page_unit.pixels_per_unit(dpi_x);
        let ratio_y = self.page_scale * self.page_unit.pixels_per_unit(dpi_y);
        let device_width = max_width.map(|w| itrunc(w * ratio_x));

        let fh = self.bind_font(font)?;
        let metrics = self.renderer_mut()?.measure_string(fh, text, device_width)?;
        Ok(StringMeasure {
            size: SizeF::new(metrics.width as f32 / ratio_x, metrics.height as f32 / ratio_y),
            chars_fitted: metrics.chars_fitted,
            lines_filled: metrics.lines_filled,
        })
    }
}

impl<R: Renderer> Drop for Graphics<R> {
    fn drop(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            for h in self.owned.drain(..) {
                renderer.release(h);
            }
        }
    }
}

/// Release stale handles and record a newly created one.
fn settle<R: Renderer + ?Sized>(
    renderer: &mut R,
    owned: &mut Vec<ObjectHandle>,
    stale: Vec<ObjectHandle>,
    outcome: BindOutcome,
) -> ObjectHandle {
    for h in stale {
        renderer.release(h);
        owned.retain(|o| *o != h);
    }
    if let BindOutcome::Created(h) = outcome {
        owned.push(h);
    }
    outcome.handle()
}

fn check_points(points: &[PointF], min: usize) -> Result<()> {
    if points.is_empty() {
        return Err(Error::ArgumentNull("points"));
    }
    if points.len() < min {
        return Err(Error::InvalidArgument(format!(
            "at least {min} points required, got {}",
            points.len()
        )));
    }
    Ok(())
}

fn rect_corners(r: &RectangleF) -> [PointF; 4] {
    [
        PointF::new(r.left(), r.top()),
        PointF::new(r.right(), r.top()),
        PointF::new(r.right(), r.bottom()),
        PointF::new(r.left(), r.bottom()),
    ]
}

#[inline]
fn device_point(p: PointF) -> Point {
    Point::new(itrunc(p.x), itrunc(p.y))
}

fn to_device_rect(r: &RectangleF) -> Rectangle {
    Rectangle::from_ltrb(
        iround(r.left()),
        iround(r.top()),
        iround(r.right()),
        iround(r.bottom()),
    )
}

// ============================================================================
// Tests
// ============================================================================
