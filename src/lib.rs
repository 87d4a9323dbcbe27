//! # gdi-canvas
//!
//! A GDI+-style drawing surface for Rust.
//!
//! The crate has two halves:
//!
//! - **Regions**: sets of pixels stored as y-x banded rectangles, combined
//!   with the classic scan-line band sweep (union, intersection,
//!   difference, xor, complement) and kept coalesced.
//! - **Graphics**: a surface that carries a world transform, page unit,
//!   page scale and clip region, converts them into device clip
//!   rectangles, and dispatches already-transformed primitives to a
//!   pluggable [`Renderer`] backend.
//!
//! ## Pipeline
//!
//! 1. **World** coordinates, as passed to drawing calls
//! 2. **Page** coordinates, after the world transform
//! 3. **Device** pixels, after page scale, unit-to-DPI ratio and the
//!    surface origin
//!
//! ```
//! use gdi_canvas::{CombineMode, Graphics, Rectangle, RectangleF, RecordingRenderer};
//!
//! let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 640, 480));
//! g.set_clip(&RectangleF::new(10.0, 10.0, 100.0, 50.0), CombineMode::Replace)?;
//! assert_eq!(g.device_clip_rects()?, &[Rectangle::new(10, 10, 100, 50)]);
//! # Ok::<(), gdi_canvas::Error>(())
//! ```

// Foundation
pub mod basics;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod units;

// Regions
pub mod path;
pub mod region;
pub mod region_op;

// Drawing resources
pub mod brush;
pub mod color;
pub mod context;
pub mod font;
pub mod pen;
pub mod resource;

// Surface
pub mod bezier_arc;
pub mod clip;
pub mod graphics;
pub mod renderer;

pub use brush::SolidBrush;
pub use color::Color;
pub use context::DeviceContext;
pub use error::{Error, Result};
pub use font::{Font, FontStyle};
pub use geometry::{Point, PointF, Rectangle, RectangleF, Size, SizeF};
pub use graphics::{CombineMode, Graphics, GraphicsState, StringMeasure};
pub use matrix::{Matrix, MatrixOrder};
pub use path::{FillMode, GraphicsPath};
pub use pen::Pen;
pub use region::{Region, RegionOperand};
pub use renderer::{RecordingRenderer, Renderer, TextMetrics};
pub use units::{CoordinateSpace, GraphicsUnit};
