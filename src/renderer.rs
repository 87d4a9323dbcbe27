//! Backend interface and an in-memory recording backend.
//!
//! Coordinates handed to a [`Renderer`] are device pixels: the drawing
//! surface has already applied the world transform, page scale, page unit
//! and surface origin, and has rejected geometry outside the clip.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::color::Color;
use crate::context::DEFAULT_DPI;
use crate::error::{Error, Result};
use crate::font::FontStyle;
use crate::geometry::{Point, Rectangle};
use crate::path::FillMode;
use crate::resource::ObjectHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(pub u64);

/// Result of laying out a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: i32,
    pub height: i32,
    pub chars_fitted: usize,
    pub lines_filled: usize,
}

/// A platform drawing backend.
pub trait Renderer {
    fn id(&self) -> RendererId;
    fn dpi_x(&self) -> f32;
    fn dpi_y(&self) -> f32;

    /// `width` is in device pixels.
    fn create_pen(&mut self, color: Color, width: f32) -> Result<ObjectHandle>;
    fn create_brush(&mut self, color: Color) -> Result<ObjectHandle>;
    /// `pixel_size` is the em size in device pixels.
    fn create_font(
        &mut self,
        family: &str,
        pixel_size: f32,
        style: FontStyle,
    ) -> Result<ObjectHandle>;
    fn release(&mut self, handle: ObjectHandle);

    /// Replace the device clip. An empty slice clips everything away.
    fn set_clip_rects(&mut self, rects: &[Rectangle]);

    fn clear(&mut self, color: Color);
    fn draw_line(&mut self, pen: ObjectHandle, p1: Point, p2: Point);
    /// Angles are in degrees, clockwise from the positive x axis.
    fn draw_arc(&mut self, pen: ObjectHandle, rect: Rectangle, start_angle: f32, sweep_angle: f32);
    /// `points` holds a start point followed by three points per segment.
    fn draw_bezier(&mut self, pen: ObjectHandle, points: &[Point]);
    fn draw_polygon(&mut self, pen: ObjectHandle, points: &[Point]);
    fn fill_polygon(&mut self, brush: ObjectHandle, points: &[Point], fill_mode: FillMode);
    fn draw_string(
        &mut self,
        font: ObjectHandle,
        brush: ObjectHandle,
        text: &str,
        layout: Rectangle,
    );
    /// Lay out `text`, wrapping at `max_width` pixels when given.
    fn measure_string(
        &mut self,
        font: ObjectHandle,
        text: &str,
        max_width: Option<i32>,
    ) -> Result<TextMetrics>;
}

// ============================================================================
// Recording renderer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetClip(Vec<Rectangle>),
    Clear(Color),
    Line { pen: ObjectHandle, p1: Point, p2: Point },
    Arc { pen: ObjectHandle, rect: Rectangle, start_angle: f32, sweep_angle: f32 },
    Bezier { pen: ObjectHandle, points: Vec<Point> },
    Polygon { pen: ObjectHandle, points: Vec<Point> },
    FillPolygon { brush: ObjectHandle, points: Vec<Point>, fill_mode: FillMode },
    Text { font: ObjectHandle, brush: ObjectHandle, text: String, layout: Rectangle },
}

/// A backend object the recording renderer has created and not released.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Pen { color: Color, width: f32 },
    Brush { color: Color },
    Font { family: String, pixel_size: f32, style: FontStyle },
}

/// Records every command instead of drawing. Text uses a fixed advance of
/// `advance_ratio` em per character and a line height of 1.2 em.
#[derive(Debug)]
pub struct RecordingRenderer {
    id: RendererId,
    dpi_x: f32,
    dpi_y: f32,
    advance_ratio: f32,
    next_handle: u64,
    objects: HashMap<ObjectHandle, Object>,
    clip: Vec<Rectangle>,
    commands: Vec<Command>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self {
            id: RendererId(NEXT.fetch_add(1, Ordering::Relaxed)),
            dpi_x: DEFAULT_DPI,
            dpi_y: DEFAULT_DPI,
            advance_ratio: 0.5,
            next_handle: 1,
            objects: HashMap::new(),
            clip: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn with_dpi(mut self, dpi_x: f32, dpi_y: f32) -> Self {
        self.dpi_x = dpi_x;
        self.dpi_y = dpi_y;
        self
    }

    pub fn with_advance_ratio(mut self, ratio: f32) -> Self {
        self.advance_ratio = ratio;
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Draw commands only, without clip changes.
    pub fn draw_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands
            .iter()
            .filter(|c| !matches!(c, Command::SetClip(_)))
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn clip_rects(&self) -> &[Rectangle] {
        &self.clip
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&Object> {
        self.objects.get(&handle)
    }

    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    fn insert(&mut self, obj: Object) -> ObjectHandle {
        let h = ObjectHandle(self.next_handle);
        self.next_handle += 1;
        self.objects.insert(h, obj);
        h
    }
}

impl Renderer for RecordingRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn dpi_x(&self) -> f32 {
        self.dpi_x
    }

    fn dpi_y(&self) -> f32 {
        self.dpi_y
    }

    fn create_pen(&mut self, color: Color, width: f32) -> Result<ObjectHandle> {
        Ok(self.insert(Object::Pen { color, width }))
    }

    fn create_brush(&mut self, color: Color) -> Result<ObjectHandle> {
        Ok(self.insert(Object::Brush { color }))
    }

    fn create_font(
        &mut self,
        family: &str,
        pixel_size: f32,
        style: FontStyle,
    ) -> Result<ObjectHandle>  {
        Ok(self.insert(Object::Font {
            family: family.to_owned(),
            pixel_size,
            style,
        }))
    }

    fn release(&mut self, handle: ObjectHandle) {
        self.objects.remove(&handle);
    }

    fn set_clip_rects(&mut self, rects: &[Rectangle]) {
        self.clip = rects.to_vec();
        self.commands.push(Command::SetClip(self.clip.clone()));
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(Command::Clear(color));
    }

    fn draw_line(&mut self, pen: ObjectHandle, p1: Point, p2: Point) {
        self.commands.push(Command::Line { pen, p1, p2 });
    }

    fn draw_arc(&mut self, pen: ObjectHandle, rect: Rectangle, start_angle: f32, sweep_angle: f32) {
        self.commands.push(Command::Arc {
            pen,
            rect,
            start_angle,
            sweep_angle,
        });
    }

    fn draw_bezier(&mut self, pen: ObjectHandle, points: &[Point]) {
        self.commands.push(Command::Bezier {
            pen,
            points: points.to_vec(),
        });
    }

    fn draw_polygon(&mut self, pen: ObjectHandle, points: &[Point]) {
        self.commands.push(Command::Polygon {
            pen,
            points: points.to_vec(),
        });
    }

    fn fill_polygon(&mut self, brush: ObjectHandle, points: &[Point], fill_mode: FillMode) {
        self.commands.push(Command::FillPolygon {
            brush,
            points: points.to_vec(),
            fill_mode,
        });
    }

    fn draw_string(
        &mut self,
        font: ObjectHandle,
        brush: ObjectHandle,
        text: &str,
        layout: Rectangle,
    ) {
        self.commands.push(Command::Text {
            font,
            brush,
            text: text.to_owned(),
            layout,
        });
    }

    fn measure_string(
        &mut self,
        font: ObjectHandle,
        text: &str,
        max_width: Option<i32>,
    ) -> Result<TextMetrics>  {
        let pixel_size = match self.objects.get(&font) {
            Some(Object::Font { pixel_size, .. }) => *pixel_size,
            _ => return Err(Error::InvalidArgument(format!("{font:?} is not a font"))),
        };
        let advance = (pixel_size * self.advance_ratio).max(1.0);
        let per_line = max_width
            .map(|w| ((w as f32 / advance).floor() as usize).max(1))
            .unwrap_or(usize::MAX);

        let mut lines = 0usize;
        let mut widest = 0usize;
        let mut chars = 0usize;
        for line in text.split('\n') {
            let n = line.chars().count();
            chars += n;
            if n == 0 {
                lines += 1;
                continue;
            }
            lines += n.div_ceil(per_line);
            widest = widest.max(n.min(per_line));
        }
        if text.is_empty() {
            lines = 0;
        }

        Ok(TextMetrics {
            width: (widest as f32 * advance).ceil() as i32,
            height: (lines as f32 * pixel_size * 6.0 / 5.0).ceil() as i32,
            chars_fitted: chars,
            lines_filled: lines,
        })
    }
}
