//! End-to-end tests of the coordinate and clip pipeline against the
//! recording backend.

use gdi_canvas::renderer::{Command, Object};
use gdi_canvas::{
    Color, CombineMode, DeviceContext, Error, FillMode, Font, Graphics, GraphicsPath,
    GraphicsUnit, Matrix, MatrixOrder, Pen, Point, PointF, Rectangle, RectangleF,
    RecordingRenderer, Region, Renderer, SolidBrush,
};

fn rf(x: f32, y: f32, w: f32, h: f32) -> RectangleF {
    RectangleF::new(x, y, w, h)
}

fn pt(x: f32, y: f32) -> PointF {
    PointF::new(x, y)
}

#[test]
fn test_clip_in_millimetres_at_high_dpi() {
    let renderer = RecordingRenderer::new().with_dpi(254.0, 254.0);
    let mut g = Graphics::new(renderer, Rectangle::new(0, 0, 1000, 1000));
    g.set_page_unit(GraphicsUnit::Millimeter).unwrap();
    // 254 dpi is exactly 10 pixels per millimetre.
    g.set_clip(&rf(1.0, 2.0, 3.0, 4.0), CombineMode::Replace).unwrap();
    assert_eq!(g.device_clip_rects().unwrap(), &[Rectangle::new(10, 20, 30, 40)]);
    assert_eq!(g.convert_point(1.5, 2.5).unwrap(), Point::new(15, 25));
}

#[test]
fn test_surface_origin_offsets_everything() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(100, 50, 200, 100));
    g.set_clip(&rf(0.0, 0.0, 10.0, 10.0), CombineMode::Replace).unwrap();
    assert_eq!(g.device_clip_rects().unwrap(), &[Rectangle::new(100, 50, 10, 10)]);

    let mut pen = Pen::new(Color::BLACK);
    g.draw_line(&mut pen, pt(1.0, 1.0), pt(2.0, 2.0)).unwrap();
    let r = g.renderer().unwrap();
    let line = r.draw_commands().next().cloned();
    assert!(matches!(
        line,
        Some(Command::Line { p1, p2, .. }) if p1 == Point::new(101, 51) && p2 == Point::new(102, 52)
    ));
}

#[test]
fn test_rotated_clip_uses_bounding_boxes() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 100, 100));
    g.translate_transform(50.0, 50.0, MatrixOrder::Prepend).unwrap();
    g.rotate_transform(45.0, MatrixOrder::Prepend).unwrap();
    g.set_clip(&rf(-10.0, -10.0, 20.0, 20.0), CombineMode::Replace).unwrap();

    let rects = g.device_clip_rects().unwrap();
    assert_eq!(rects.len(), 1);
    // The rotated square's half-diagonal is 10 * sqrt(2) ~ 14.14.
    assert_eq!(rects[0], Rectangle::from_ltrb(36, 36, 64, 64));
    assert_eq!(g.device_clip_extent().unwrap(), rects[0]);
}

#[test]
fn test_clip_with_hole_reaches_renderer() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 50, 50));
    let mut region = Region::from_rect(rf(0.0, 0.0, 30.0, 30.0));
    region.exclude(&rf(10.0, 10.0, 10.0, 10.0));
    g.set_clip(&region, CombineMode::Replace).unwrap();

    let expected = vec![
        Rectangle::new(0, 0, 30, 10),
        Rectangle::new(0, 10, 10, 10),
        Rectangle::new(20, 10, 10, 10),
        Rectangle::new(0, 20, 30, 10),
    ];
    assert_eq!(g.device_clip_rects().unwrap(), expected.as_slice());
    assert_eq!(g.renderer().unwrap().clip_rects(), expected.as_slice());

    // Inside the hole nothing is visible.
    assert!(!g.is_visible_point(pt(15.0, 15.0)).unwrap());
    assert!(g.is_visible_point(pt(5.0, 15.0)).unwrap());
}

#[test]
fn test_path_clip() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 50, 50));
    let mut path = GraphicsPath::with_fill_mode(FillMode::Alternate);
    path.add_rectangle(rf(0.0, 0.0, 20.0, 20.0));
    path.add_rectangle(rf(5.0, 5.0, 10.0, 10.0));
    g.set_clip(&path, CombineMode::Replace).unwrap();
    assert_eq!(g.clip().unwrap().area(), 300.0);
    assert!(!g.is_visible_rect(rf(6.0, 6.0, 8.0, 8.0)).unwrap());
}

#[test]
fn test_path_clip_matches_rect_clip_in_inches() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 200, 200));
    g.set_page_unit(GraphicsUnit::Inch).unwrap();
    let r = rf(0.25, 0.25, 0.5, 0.5);

    g.set_clip(&r, CombineMode::Replace).unwrap();
    let by_rect = g.device_clip_rects().unwrap().to_vec();
    assert_eq!(by_rect, vec![Rectangle::new(24, 24, 48, 48)]);

    let mut path = GraphicsPath::new();
    path.add_rectangle(r);
    g.set_clip(&path, CombineMode::Replace).unwrap();
    assert_eq!(g.device_clip_rects().unwrap(), by_rect.as_slice());
}

#[test]
fn test_path_clip_sampled_on_device_pixels() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 200, 200));
    g.set_page_unit(GraphicsUnit::Inch).unwrap();
    let mut path = GraphicsPath::new();
    path.add_polygon(&[pt(0.0, 0.0), pt(1.0, 0.0), pt(0.0, 1.0)]);
    g.set_clip(&path, CombineMode::Replace).unwrap();

    // Device row y keeps the 95 - y pixels left of the hypotenuse.
    let rects = g.device_clip_rects().unwrap();
    assert_eq!(rects.len(), 95);
    let area: i32 = rects.iter().map(|r| r.width * r.height).sum();
    assert_eq!(area, 95 * 96 / 2);
    assert_eq!(g.device_clip_extent().unwrap(), Rectangle::from_ltrb(0, 0, 95, 95));
    assert!(g.is_visible_point(pt(0.1, 0.1)).unwrap());
    assert!(!g.is_visible_point(pt(0.6, 0.6)).unwrap());

    // Combining modes sample the path the same way.
    g.set_clip(&rf(0.0, 0.0, 1.0, 0.5), CombineMode::Replace).unwrap();
    g.intersect_clip(&path).unwrap();
    let area: i32 = g.device_clip_rects().unwrap().iter().map(|r| r.width * r.height).sum();
    assert_eq!(area, (95 + 48) * 48 / 2);
}

#[test]
fn test_empty_clip_rejects_all_drawing() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 50, 50));
    g.set_clip(&Region::new(), CombineMode::Replace).unwrap();
    assert!(g.is_clip_empty().unwrap());
    assert!(g.is_visible_clip_empty().unwrap());

    let mut pen = Pen::new(Color::BLACK);
    let mut brush = SolidBrush::new(Color::RED);
    g.draw_rectangle(&mut pen, rf(0.0, 0.0, 10.0, 10.0)).unwrap();
    g.fill_rectangle(&mut brush, rf(0.0, 0.0, 10.0, 10.0)).unwrap();
    g.draw_ellipse(&mut pen, rf(0.0, 0.0, 10.0, 10.0)).unwrap();
    g.draw_bezier(&mut pen, pt(0.0, 0.0), pt(1.0, 5.0), pt(4.0, 5.0), pt(5.0, 0.0))
        .unwrap();

    let r = g.renderer().unwrap();
    assert_eq!(r.draw_commands().count(), 0);
    assert_eq!(r.live_objects(), 0);
    assert_eq!(r.clip_rects(), &[] as &[Rectangle]);
}

#[test]
fn test_pen_shared_between_surfaces() {
    let mut g1 = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 50, 50));
    let mut g2 = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 50, 50));
    let mut pen = Pen::new(Color::BLUE);

    g1.draw_line(&mut pen, pt(0.0, 0.0), pt(10.0, 10.0)).unwrap();
    g2.draw_line(&mut pen, pt(0.0, 0.0), pt(10.0, 10.0)).unwrap();
    g1.draw_line(&mut pen, pt(0.0, 0.0), pt(10.0, 10.0)).unwrap();

    assert_eq!(g1.renderer().unwrap().live_objects(), 2);
    assert_eq!(g2.renderer().unwrap().live_objects(), 1);

    let r1 = g1.dispose().unwrap();
    let r2 = g2.dispose().unwrap();
    assert_eq!(r1.live_objects(), 0);
    assert_eq!(r2.live_objects(), 0);
}

#[test]
fn test_brush_color_change_replaces_object() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 50, 50));
    let mut brush = SolidBrush::new(Color::RED);
    g.fill_rectangle(&mut brush, rf(0.0, 0.0, 5.0, 5.0)).unwrap();
    brush.set_color(Color::GREEN);
    g.fill_rectangle(&mut brush, rf(0.0, 0.0, 5.0, 5.0)).unwrap();

    let r = g.renderer().unwrap();
    assert_eq!(r.live_objects(), 1);
    let handles: Vec<_> = r
        .draw_commands()
        .filter_map(|c| match c {
            Command::FillPolygon { brush, .. } => Some(*brush),
            _ => None,
        })
        .collect();
    assert_eq!(handles.len(), 2);
    assert_ne!(handles[0], handles[1]);
    assert_eq!(r.object(handles[1]), Some(&Object::Brush { color: Color::GREEN }));
}

#[test]
fn test_world_unit_font_follows_page_scale() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 200, 200));
    g.set_page_scale(2.0).unwrap();
    let mut world =
        Font::with_style("Sans", 10.0, Default::default(), GraphicsUnit::World).unwrap();
    let mut points = Font::new("Sans", 9.0).unwrap();
    let mut brush = SolidBrush::new(Color::BLACK);

    g.draw_string("a", &mut world, &mut brush, pt(0.0, 0.0)).unwrap();
    g.draw_string("b", &mut points, &mut brush, pt(0.0, 0.0)).unwrap();

    let r = g.renderer().unwrap();
    let sizes: Vec<f32> = r
        .draw_commands()
        .filter_map(|c| match c {
            Command::Text { font, .. } => match r.object(*font) {
                Some(Object::Font { pixel_size, .. }) => Some(*pixel_size),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(sizes.len(), 2);
    assert!((sizes[0] - 20.0).abs() < 1e-3);
    assert!((sizes[1] - 12.0).abs() < 1e-3);
}

#[test]
fn test_font_height_from_renderer_context() {
    let renderer = RecordingRenderer::new().with_dpi(72.0, 144.0);
    let ctx = DeviceContext::from_renderer(&renderer);
    let mut font = Font::new("Sans", 10.0).unwrap();
    font.set_line_spacing(1.5).unwrap();
    assert!((font.get_height(&ctx) - 30.0).abs() < 1e-3);
    assert!((font.size_in_points(&ctx) - 10.0).abs() < 1e-3);
}

#[test]
fn test_set_transform_and_singular_inverse() {
    let mut g = Graphics::new(RecordingRenderer::new(), Rectangle::new(0, 0, 100, 100));
    g.set_transform(&Matrix::from_elements(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
    let mut pts = [pt(1.0, 1.0)];
    assert_eq!(
        g.transform_points(
            gdi_canvas::CoordinateSpace::World,
            gdi_canvas::CoordinateSpace::Device,
            &mut pts
        ),
        Err(Error::NotInvertible)
    );
    // The failed call left the points untouched.
    assert_eq!(pts[0], pt(1.0, 1.0));

    g.set_transform(&Matrix::new()).unwrap();
    assert!(g.transform().unwrap().is_identity());
}

#[test]
fn test_clear_and_dpi_passthrough() {
    let mut g = Graphics::new(
        RecordingRenderer::new().with_dpi(120.0, 120.0),
        Rectangle::new(0, 0, 10, 10),
    );
    assert_eq!(g.dpi_x().unwrap(), 120.0);
    g.clear(Color::WHITE).unwrap();
    let r = g.renderer().unwrap();
    assert_eq!(r.draw_commands().next(), Some(&Command::Clear(Color::WHITE)));
    assert_eq!(r.dpi_y(), 120.0);
}
