//! Stroke resource.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::resource::BindingSlot;

/// Color and width (in world units) used to stroke outlines.
#[derive(Debug, Clone)]
pub struct Pen {
    color: Color,
    width: f32,
    slot: BindingSlot,
}

impl Pen {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            width: 1.0,
            slot: BindingSlot::new(),
        }
    }

    pub fn with_width(color: Color, width: f32) -> Result<Self> {
        let mut pen = Self::new(color);
        pen.set_width(width)?;
        Ok(pen)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        if color != self.color {
            self.color = color;
            self.slot.invalidate();
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Width must be finite and non-negative. Zero strokes one device pixel.
    pub fn set_width(&mut self, width: f32) -> Result<()> {
        if !width.is_finite() || width < 0.0 {
            return Err(Error::InvalidArgument(format!("pen width {width}")));
        }
        if width != self.width {
            self.width = width;
            self.slot.invalidate();
        }
        Ok(())
    }

    pub fn slot(&self) -> &BindingSlot {
        &self.slot
    }

    pub(crate) fn slot_mut(&mut self) -> &mut BindingSlot {
        &mut self.slot
    }
}
