//! Text resource.
//!
//! Family metric lookup is left to the backend; a font carries an
//! em-relative line spacing so heights can be computed without one.

use std::ops::{BitOr, BitOrAssign};

use crate::context::DeviceContext;
use crate::error::{Error, Result};
use crate::resource::BindingSlot;
use crate::units::GraphicsUnit;

/// Line spacing of a typical sans-serif face, relative to the em size.
pub const DEFAULT_LINE_SPACING: f32 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontStyle(u8);

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle(0);
    pub const BOLD: FontStyle = FontStyle(1);
    pub const ITALIC: FontStyle = FontStyle(2);
    pub const UNDERLINE: FontStyle = FontStyle(4);
    pub const STRIKEOUT: FontStyle = FontStyle(8);

    pub fn contains(self, other: FontStyle) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for FontStyle {
    type Output = FontStyle;
    fn bitor(self, rhs: FontStyle) -> FontStyle {
        FontStyle(self.0 | rhs.0)
    }
}

impl BitOrAssign for FontStyle {
    fn bitor_assign(&mut self, rhs: FontStyle) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone)]
pub struct Font {
    family: String,
    size: f32,
    unit: GraphicsUnit,
    style: FontStyle,
    line_spacing: f32,
    slot: BindingSlot,
}

impl Font {
    /// A regular font whose `size` is in points.
    pub fn new(family: &str, size: f32) -> Result<Self> {
        Self::with_style(family, size, FontStyle::REGULAR, GraphicsUnit::Point)
    }

    pub fn with_style(
        family: &str,
        size: f32,
        style: FontStyle,
        unit: GraphicsUnit,
    ) -> Result<Self>  {
        if family.is_empty() {
            return Err(Error::ArgumentNull("family"));
        }
        check_size(size)?;
        Ok(Self {
            family: family.to_owned(),
            size,
            unit,
            style,
            line_spacing: DEFAULT_LINE_SPACING,
            slot: BindingSlot::new(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn unit(&self) -> GraphicsUnit {
        self.unit
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    pub fn set_size(&mut self, size: f32) -> Result<()> {
        check_size(size)?;
        if size != self.size {
            self.size = size;
            self.slot.invalidate();
        }
        Ok(())
    }

    pub fn set_style(&mut self, style: FontStyle) {
        if style != self.style {
            self.style = style;
            self.slot.invalidate();
        }
    }

    /// Em-relative spacing between baselines; must be positive.
    pub fn set_line_spacing(&mut self, spacing: f32) -> Result<()> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(Error::InvalidArgument(format!("line spacing {spacing}")));
        }
        self.line_spacing = spacing;
        Ok(())
    }

    /// Em size in points. Pixel-based units depend on the vertical DPI.
    pub fn size_in_points(&self, ctx: &DeviceContext) -> f32 {
        self.unit.convert(self.size, GraphicsUnit::Point, ctx.dpi_y)
    }

    /// Em size in device pixels at the vertical DPI of `ctx`.
    pub fn size_in_pixels(&self, ctx: &DeviceContext) -> f32 {
        self.size * self.unit.pixels_per_unit(ctx.dpi_y)
    }

    /// Line spacing in device pixels.
    pub fn get_height(&self, ctx: &DeviceContext) -> f32 {
        self.size_in_pixels(ctx) * self.line_spacing
    }

    pub fn slot(&self) -> &BindingSlot {
        &self.slot
    }

    pub(crate) fn slot_mut(&mut self) -> &mut BindingSlot {
        &mut self.slot
    }
}

fn check_size(size: f32) -> Result<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("font size {size}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_new_validates() {
        assert!(matches!(Font::new("", 12.0), Err(Error::ArgumentNull("family"))));
        assert!(matches!(Font::new("Sans", 0.0), Err(Error::InvalidArgument(_))));
        let f = Font::new("Sans", 12.0).unwrap();
        assert_eq!(f.unit(), GraphicsUnit::Point);
        assert_eq!(f.style(), FontStyle::REGULAR);
    }

    #[test]
    fn test_size_in_points() {
        let ctx = DeviceContext::default();
        let pt = Font::new("Sans", 12.0).unwrap();
        assert!((pt.size_in_points(&ctx) - 12.0).abs() < EPS);

        let px = Font::with_style("Sans", 16.0, FontStyle::REGULAR, GraphicsUnit::Pixel).unwrap();
        assert!((px.size_in_points(&ctx) - 12.0).abs() < EPS);

        let inch = Font::with_style("Sans", 0.5, FontStyle::REGULAR, GraphicsUnit::Inch).unwrap();
        assert!((inch.size_in_points(&ctx) - 36.0).abs() < EPS);
    }

    #[test]
    fn test_get_height_scales_with_dpi() {
        let mut f = Font::new("Sans", 12.0).unwrap();
        f.set_line_spacing(1.0).unwrap();
        let h96 = f.get_height(&DeviceContext::default());
        let h192 = f.get_height(&DeviceContext::new().with_dpi(192.0, 192.0));
        assert!((h96 - 16.0).abs() < EPS);
        assert!((h192 - 32.0).abs() < EPS);
    }

    #[test]
    fn test_style_flags() {
        let s = FontStyle::BOLD | FontStyle::ITALIC;
        assert!(s.contains(FontStyle::BOLD));
        assert!(!s.contains(FontStyle::UNDERLINE));
        assert_eq!(s.bits(), 3);
    }

    #[test]
    fn test_setters_invalidate() {
        use crate::resource::{ObjectHandle, SurfaceId};
        let mut f = Font::new("Sans", 10.0).unwrap();
        let mut stale = Vec::new();
        f.slot_mut()
            .bind(SurfaceId::next(), 13.0, &mut stale, || Ok(ObjectHandle(3)))
            .unwrap();
        f.set_style(FontStyle::BOLD);
        assert!(!f.slot().is_bound());
        assert!(f.set_size(-2.0).is_err());
    }
}
