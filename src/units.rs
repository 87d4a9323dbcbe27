//! Page units and coordinate spaces.
//!
//! World coordinates pass through the world transform into page space;
//! page space is scaled by the page scale and the unit-to-DPI ratio into
//! device pixels.

/// Unit of measure for page coordinates and font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsUnit {
    /// World coordinates map one-to-one onto pixels.
    #[default]
    World,
    /// 1/75 inch.
    Display,
    Pixel,
    /// 1/72 inch.
    Point,
    Inch,
    /// 1/300 inch.
    Document,
    Millimeter,
}

impl GraphicsUnit {
    /// Number of device pixels in one unit at `dpi`.
    pub fn pixels_per_unit(self, dpi: f32) -> f32 {
        match self {
            GraphicsUnit::World | GraphicsUnit::Pixel => 1.0,
            GraphicsUnit::Display => dpi / 75.0,
            GraphicsUnit::Point => dpi / 72.0,
            GraphicsUnit::Inch => dpi,
            GraphicsUnit::Document => dpi / 300.0,
            GraphicsUnit::Millimeter => dpi / 25.4,
        }
    }

    /// Number of units in one device pixel at `dpi`.
    pub fn units_per_pixel(self, dpi: f32) -> f32 {
        1.0 / self.pixels_per_unit(dpi)
    }

    /// `true` for units whose conversion does not depend on DPI.
    pub fn is_pixel_based(self) -> bool {
        matches!(self, GraphicsUnit::World | GraphicsUnit::Pixel)
    }

    /// Convert `value` expressed in this unit into `target` units.
    pub fn convert(self, value: f32, target: GraphicsUnit, dpi: f32) -> f32 {
        value * self.pixels_per_unit(dpi) / target.pixels_per_unit(dpi)
    }
}

/// The three coordinate spaces of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSpace {
    World,
    Page,
    Device,
}
