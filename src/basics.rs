//! Foundation helpers shared by every other module: rounding, angle and
//! approximate float comparison.
//!
//! Device coordinates are `i32`, world/page coordinates are `f32`. All the
//! float → integer conversions used by the pipeline live here so the
//! rounding policy stays in one place.

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Round to the nearest integer (round half away from zero).
#[inline]
pub fn iround(v: f32) -> i32 {
    if v < 0.0 {
        (v - 0.5) as i32
    } else {
        (v + 0.5) as i32
    }
}

/// Floor toward negative infinity.
#[inline]
pub fn ifloor(v: f32) -> i32 {
    let i = v as i32;
    i - (i as f32 > v) as i32
}

/// Ceiling as a signed integer.
#[inline]
pub fn iceil(v: f32) -> i32 {
    v.ceil() as i32
}

/// Truncate toward zero. Saturates at the `i32` range; NaN maps to zero.
#[inline]
pub fn itrunc(v: f32) -> i32 {
    v as i32
}

// ============================================================================
// Angles
// ============================================================================

pub const PI: f32 = std::f32::consts::PI;

/// Convert degrees to radians.
#[inline]
pub fn deg2rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn rad2deg(rad: f32) -> f32 {
    rad * 180.0 / PI
}

// ============================================================================
// Approximate equality comparison
// ============================================================================

/// Epsilon used when deciding whether a matrix is the identity.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Compare two values for approximate equality. The tolerance is absolute
/// for values near zero and relative to the larger magnitude otherwise.
#[inline]
pub fn is_equal_eps(v1: f32, v2: f32, epsilon: f32) -> bool {
    let diff = (v1 - v2).abs();
    if diff <= epsilon {
        return true;
    }
    diff <= epsilon * v1.abs().max(v2.abs())
}

// ============================================================================
// Tests
// ============================================================================
