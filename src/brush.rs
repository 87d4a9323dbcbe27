//! Fill resource.

use crate::color::Color;
use crate::resource::BindingSlot;

#[derive(Debug, Clone)]
pub struct SolidBrush {
    color: Color,
    slot: BindingSlot,
}

impl SolidBrush {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            slot: BindingSlot::new(),
        }
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

    pub fn slot(&self) -> &BindingSlot {
        &self.slot
    }

    pub(crate) fn slot_mut(&mut self) -> &mut BindingSlot {
        &mut self.slot
    }
}
