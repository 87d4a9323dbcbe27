//! 3x2 affine matrix used for world transforms.
//!
//! Stores six elements `[m11, m12, m21, m22, dx, dy]` representing
//!
//! ```text
//!   | m11 m12 0 |
//!   | m21 m22 0 |
//!   | dx  dy  1 |
//! ```
//!
//! with row vectors: `x' = x*m11 + y*m21 + dx`, `y' = x*m12 + y*m22 + dy`.
//! `a * b` therefore means "apply `a`, then `b`".

use crate::basics::{deg2rad, is_equal_eps, FLOAT_EPSILON};
use crate::error::{Error, Result};
use crate::geometry::{PointF, RectangleF};

/// Where a new operation is composed relative to the existing matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixOrder {
    /// The new operation is applied before the existing transform.
    #[default]
    Prepend,
    /// The new operation is applied after the existing transform.
    Append,
}

/// 2D affine transformation matrix.
#[derive(Debug, Clone, Copy)]
pub struct Matrix {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Matrix {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub fn new() -> Self {
        Self::from_elements(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn from_elements(m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> Self {
        Self {
            m11,
            m12,
            m21,
            m22,
            dx,
            dy,
        }
    }

    pub fn new_translation(dx: f32, dy: f32) -> Self {
        Self::from_elements(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub fn new_scaling(sx: f32, sy: f32) -> Self {
        Self::from_elements(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` degrees (clockwise on a y-down device).
    pub fn new_rotation(angle: f32) -> Self {
        let (sa, ca) = deg2rad(angle).sin_cos();
        Self::from_elements(ca, sa, -sa, ca, 0.0, 0.0)
    }

    pub fn new_shear(shear_x: f32, shear_y: f32) -> Self {
        Self::from_elements(1.0, shear_y, shear_x, 1.0, 0.0, 0.0)
    }

    /// Matrix mapping `rect` onto the parallelogram given by three points:
    /// upper-left, upper-right and lower-left.
    pub fn from_rect_points(rect: &RectangleF, plgpts: &[PointF; 3]) -> Result<Self> {
        if rect.width == 0.0 || rect.height == 0.0 {
            return Err(Error::InvalidArgument(format!(
                "rectangle must have a non-zero size, got {}x{}",
                rect.width, rect.height
            )));
        }
        let [p0, p1, p2] = *plgpts;
        let m11 = (p1.x - p0.x) / rect.width;
        let m12 = (p1.y - p0.y) / rect.width;
        let m21 = (p2.x - p0.x) / rect.height;
        let m22 = (p2.y - p0.y) / rect.height;
        Ok(Self::from_elements(
            m11,
            m12,
            m21,
            m22,
            p0.x - m11 * rect.x - m21 * rect.y,
            p0.y - m12 * rect.x - m22 * rect.y,
        ))
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    pub fn elements(&self) -> [f32; 6] {
        [self.m11, self.m12, self.m21, self.m22, self.dx, self.dy]
    }

    pub fn offset_x(&self) -> f32 {
        self.dx
    }

    pub fn offset_y(&self) -> f32 {
        self.dy
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    pub fn is_invertible(&self) -> bool {
        let d = self.determinant();
        d != 0.0 && d.is_finite()
    }

    pub fn is_identity(&self) -> bool {
        self.is_equal(&Matrix::new(), FLOAT_EPSILON)
    }

    /// No rotation, shear or scale: only a translation remains.
    pub fn is_translation_only(&self) -> bool {
        self.m11 == 1.0 && self.m12 == 0.0 && self.m21 == 0.0 && self.m22 == 1.0
    }

    /// Axis-aligned rectangles stay axis-aligned under this matrix.
    pub fn is_axis_aligned(&self) -> bool {
        self.m12 == 0.0 && self.m21 == 0.0
    }

    pub fn is_equal(&self, m: &Matrix, epsilon: f32) -> bool {
        is_equal_eps(self.m11, m.m11, epsilon)
            && is_equal_eps(self.m12, m.m12, epsilon)
            && is_equal_eps(self.m21, m.m21, epsilon)
            && is_equal_eps(self.m22, m.m22, epsilon)
            && is_equal_eps(self.dx, m.dx, epsilon)
            && is_equal_eps(self.dy, m.dy, epsilon)
    }

    /// Average scale factor, used to size pens and reject margins.
    pub fn scale_factor(&self) -> f32 {
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let x = s * self.m11 + s * self.m21;
        let y = s * self.m12 + s * self.m22;
        (x * x + y * y).sqrt()
    }

    // ====================================================================
    // Operations (mutate self)
    // ====================================================================

    pub fn reset(&mut self) {
        *self = Matrix::new();
    }

    /// Compose `m` with this matrix according to `order`.
    pub fn multiply(&mut self, m: &Matrix, order: MatrixOrder) {
        match order {
            MatrixOrder::Append => self.append(m),
            MatrixOrder::Prepend => {
                let mut t = *m;
                t.append(self);
                *self = t;
            }
        }
    }

    /// `self = self * m`
    fn append(&mut self, m: &Matrix) {
        let t0 = self.m11 * m.m11 + self.m12 * m.m21;
        let t2 = self.m21 * m.m11 + self.m22 * m.m21;
        let t4 = self.dx * m.m11 + self.dy * m.m21 + m.dx;
        self.m12 = self.m11 * m.m12 + self.m12 * m.m22;
        self.m22 = self.m21 * m.m12 + self.m22 * m.m22;
        self.dy = self.dx * m.m12 + self.dy * m.m22 + m.dy;
        self.m11 = t0;
        self.m21 = t2;
        self.dx = t4;
    }

    pub fn translate(&mut self, dx: f32, dy: f32, order: MatrixOrder) {
        self.multiply(&Matrix::new_translation(dx, dy), order);
    }

    pub fn scale(&mut self, sx: f32, sy: f32, order: MatrixOrder) {
        self.multiply(&Matrix::new_scaling(sx, sy), order);
    }

    pub fn rotate(&mut self, angle: f32, order: MatrixOrder) {
        self.multiply(&Matrix::new_rotation(angle), order);
    }

    pub fn shear(&mut self, shear_x: f32, shear_y: f32, order: MatrixOrder) {
        self.multiply(&Matrix::new_shear(shear_x, shear_y), order);
    }

    /// Rotate by `angle` degrees around `center`.
    pub fn rotate_at(&mut self, angle: f32, center: PointF, order: MatrixOrder) {
        let mut m = Matrix::new_translation(-center.x, -center.y);
        m.append(&Matrix::new_rotation(angle));
        m.append(&Matrix::new_translation(center.x, center.y));
        self.multiply(&m, order);
    }

    /// Invert in place. A singular matrix is left untouched.
    pub fn invert(&mut self) -> Result<()> {
        if !self.is_invertible() {
            return Err(Error::NotInvertible);
        }
        let d = 1.0 / self.determinant();
        let t0 = self.m22 * d;
        self.m22 = self.m11 * d;
        self.m12 = -self.m12 * d;
        self.m21 = -self.m21 * d;
        let t4 = -self.dx * t0 - self.dy * self.m21;
        self.dy = -self.dx * self.m12 - self.dy * self.m22;
        self.m11 = t0;
        self.dx = t4;
        Ok(())
    }

    /// Inverted copy.
    pub fn inverted(&self) -> Result<Matrix> {
        let mut m = *self;
        m.invert()?;
        Ok(m)
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    #[inline]
    pub fn transform_xy(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.m11 + y * self.m21 + self.dx,
            x * self.m12 + y * self.m22 + self.dy,
        )
    }

    #[inline]
    pub fn transform_point(&self, p: PointF) -> PointF {
        let (x, y) = self.transform_xy(p.x, p.y);
        PointF::new(x, y)
    }

    pub fn transform_points(&self, pts: &mut [PointF]) {
        for p in pts.iter_mut() {
            *p = self.transform_point(*p);
        }
    }

    /// Transform ignoring the translation part.
    pub fn transform_vectors(&self, pts: &mut [PointF]) {
        for p in pts.iter_mut() {
            let x = p.x * self.m11 + p.y * self.m21;
            let y = p.x * self.m12 + p.y * self.m22;
            *p = PointF::new(x, y);
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, FLOAT_EPSILON)
    }
}

impl std::ops::Mul for Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Matrix) -> Matrix {
        let mut result = self;
        result.append(&rhs);
        result
    }
}

// ============================================================================
// Tests
// ============================================================================
