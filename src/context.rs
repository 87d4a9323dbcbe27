//! Device resolution passed explicitly to size computations.

use crate::renderer::Renderer;

pub const DEFAULT_DPI: f32 = 96.0;

/// Resolution of the device that sizes are computed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceContext {
    pub dpi_x: f32,
    pub dpi_y: f32,
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self {
            dpi_x: DEFAULT_DPI,
            dpi_y: DEFAULT_DPI,
        }
    }
}

impl DeviceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dpi(mut self, dpi_x: f32, dpi_y: f32) -> Self {
        self.dpi_x = dpi_x;
        self.dpi_y = dpi_y;
        self
    }

    pub fn from_renderer<R: Renderer + ?Sized>(renderer: &R) -> Self {
        Self {
            dpi_x: renderer.dpi_x(),
            dpi_y: renderer.dpi_y(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingRenderer;

    #[test]
    fn test_default_is_96_dpi() {
        let ctx = DeviceContext::default();
        assert_eq!(ctx.dpi_x, 96.0);
        assert_eq!(ctx.dpi_y, 96.0);
    }

    #[test]
    fn test_from_renderer() {
        let r = RecordingRenderer::new().with_dpi(120.0, 144.0);
        let ctx = DeviceContext::from_renderer(&r);
        assert_eq!(ctx, DeviceContext::new().with_dpi(120.0, 144.0));
    }
}
