use once_cell::sync::Lazy;

use picovg::{
    Canvas, Color, FillRule, GradientStop, IntRect, Operator, Paint, Path, Point, SpanBuffer,
    SpreadMethod, Surface, Transform,
};

static LOGGER: Lazy<()> = Lazy::new(|| {
    let _ = log::set_logger(&NopLogger);
    log::set_max_level(log::LevelFilter::Warn);
});

struct NopLogger;

impl log::Log for NopLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        false
    }
    fn log(&self, _: &log::Record) {}
    fn flush(&self) {}
}

fn canvas(width: i32, height: i32) -> Canvas {
    Lazy::force(&LOGGER);
    Canvas::new(width, height).unwrap()
}

fn assert_premultiplied(surface: &Surface) {
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let p = surface.pixel(x, y);
            let a = p >> 24;
            assert!(((p >> 16) & 0xff) <= a, "pixel {},{} is not premultiplied", x, y);
            assert!(((p >> 8) & 0xff) <= a, "pixel {},{} is not premultiplied", x, y);
            assert!((p & 0xff) <= a, "pixel {},{} is not premultiplied", x, y);
        }
    }
}

fn alpha_sum(surface: &Surface) -> u64 {
    let mut sum = 0;
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            sum += (surface.pixel(x, y) >> 24) as u64;
        }
    }
    sum
}

#[test]
fn src_fill_half_a_row() {
    let mut canvas = canvas(4, 1);
    canvas.set_operator(Operator::Src);
    canvas.set_rgba(1.0, 0.0, 0.0, 1.0);
    canvas.rect(0.0, 0.0, 2.0, 1.0);
    canvas.fill();

    let surface = canvas.surface();
    assert_eq!(surface.pixel(0, 0), 0xFFFF0000);
    assert_eq!(surface.pixel(1, 0), 0xFFFF0000);
    assert_eq!(surface.pixel(2, 0), 0x00000000);
    assert_eq!(surface.pixel(3, 0), 0x00000000);
    assert_premultiplied(surface);
}

#[test]
fn src_over_half_transparent_black_on_white() {
    let mut canvas = canvas(2, 1);
    canvas.set_operator(Operator::Src);
    canvas.set_rgb(1.0, 1.0, 1.0);
    canvas.paint();

    canvas.set_operator(Operator::SrcOver);
    canvas.set_rgba(0.0, 0.0, 0.0, 0.5);
    canvas.rect(0.0, 0.0, 2.0, 1.0);
    canvas.fill();

    for x in 0..2 {
        let p = canvas.surface().pixel(x, 0);
        assert_eq!(p >> 24, 0xFF);
        for shift in [16, 8, 0] {
            let c = ((p >> shift) & 0xff) as i32;
            assert!((c - 0x80).abs() <= 1, "channel {:#04x}", c);
        }
    }
}

#[test]
fn rotate_maps_unit_x_to_unit_y() {
    let ts = Transform::from_rotate(std::f32::consts::FRAC_PI_2);
    let p = ts.map_point(Point::new(1.0, 0.0));
    assert!(p.x.abs() < 1e-6);
    assert!((p.y - 1.0).abs() < 1e-6);
}

#[test]
fn unit_square_produces_one_full_span() {
    let mut path = Path::new();
    path.move_to(0.0, 0.0);
    path.line_to(1.0, 0.0);
    path.line_to(1.0, 1.0);
    path.line_to(0.0, 1.0);
    path.close();

    let mut spans = SpanBuffer::new();
    picovg::rasterize(
        &mut spans,
        &path,
        &Transform::identity(),
        &IntRect::new(0, 0, 1, 1),
        None,
        FillRule::NonZero,
    );

    assert_eq!(spans.spans().len(), 1);
    let span = spans.spans()[0];
    assert_eq!((span.y, span.x, span.len, span.coverage), (0, 0, 1, 255));
}

#[test]
fn set_rgb_clamps() {
    let mut canvas = canvas(1, 1);
    canvas.set_rgb(2.0, -1.0, 0.5);
    assert_eq!(canvas.color(), Color::new_rgba(1.0, 0.0, 0.5, 1.0));
}

#[test]
fn linear_gradient_ramp() {
    let stops = [
        GradientStop::new(0.0, Color::new_rgb(1.0, 0.0, 0.0)),
        GradientStop::new(1.0, Color::new_rgb(0.0, 0.0, 1.0)),
    ];
    let paint = Paint::from_linear_gradient(
        0.0,
        0.0,
        10.0,
        0.0,
        SpreadMethod::Pad,
        &stops,
        Transform::identity(),
    );

    let mut canvas = canvas(10, 1);
    canvas.set_operator(Operator::Src);
    canvas.set_paint(paint);
    canvas.rect(0.0, 0.0, 10.0, 1.0);
    canvas.fill();

    let surface = canvas.surface();
    let red = |x: i32| (surface.pixel(x, 0) >> 16) & 0xff;
    let blue = |x: i32| surface.pixel(x, 0) & 0xff;

    assert_eq!(red(0), 0xF2);
    assert_eq!(blue(0), 0x0D);
    assert!(red(9) < 0x20);
    assert!(blue(9) > 0xE0);
    for x in 0..9 {
        assert!(red(x + 1) <= red(x), "red must not increase");
    }
    assert_premultiplied(surface);
}

#[test]
fn figure_eight_fill_rules() {
    // Two overlapping loops with the same winding direction.
    let mut same = Path::new();
    same.add_rect(0.0, 0.0, 6.0, 6.0);
    same.add_rect(4.0, 0.0, 6.0, 6.0);

    // The same figure with the second loop reversed.
    let mut opposite = Path::new();
    opposite.add_rect(0.0, 0.0, 6.0, 6.0);
    opposite.move_to(4.0, 0.0);
    opposite.line_to(4.0, 6.0);
    opposite.line_to(10.0, 6.0);
    opposite.line_to(10.0, 0.0);
    opposite.close();

    let clip = IntRect::new(0, 0, 12, 8);
    let count = |path: &Path, rule: FillRule| -> u64 {
        let mut spans = SpanBuffer::new();
        picovg::rasterize(&mut spans, path, &Transform::identity(), &clip, None, rule);
        spans
            .spans()
            .iter()
            .map(|s| s.len as u64 * s.coverage as u64)
            .sum()
    };

    // Same winding: non-zero covers the overlap, even-odd drops it.
    assert!(count(&same, FillRule::NonZero) > count(&same, FillRule::EvenOdd));
    // Opposite winding: both rules drop the overlap.
    assert_eq!(
        count(&opposite, FillRule::NonZero),
        count(&opposite, FillRule::EvenOdd)
    );
}

#[test]
fn opacity_is_monotonic() {
    let draw = |opacity: f32| -> u64 {
        let mut canvas = canvas(16, 16);
        canvas.set_rgba(0.9, 0.5, 0.1, 0.8);
        canvas.set_opacity(opacity);
        canvas.circle(8.0, 8.0, 6.0);
        canvas.fill();
        assert_premultiplied(canvas.surface());
        alpha_sum(canvas.surface())
    };

    let mut previous = u64::MAX;
    for opacity in [1.0, 0.7, 0.4, 0.1, 0.0] {
        let sum = draw(opacity);
        assert!(sum <= previous);
        previous = sum;
    }
    assert_eq!(previous, 0);
}

#[test]
fn save_restore_is_exact_over_draws() {
    let texture = std::rc::Rc::new(Surface::new(2, 2).unwrap());

    let mut canvas = canvas(16, 16);
    canvas.set_rgba(0.3, 0.6, 0.9, 1.0);
    canvas.set_paint(Paint::from_texture(
        texture.clone(),
        picovg::TextureKind::Tiled,
        0.5,
        Transform::identity(),
    ));
    canvas.translate(2.0, 2.0);
    canvas.set_line_width(3.0);
    canvas.set_dash(0.5, &[1.0, 2.0]);
    canvas.rect(0.0, 0.0, 8.0, 8.0);
    canvas.clip();

    let color = canvas.color();
    let matrix = canvas.matrix();
    let clip_extents = canvas.clip_extents();

    canvas.save();
    canvas.set_rgb(1.0, 0.0, 0.0);
    canvas.set_opacity(0.2);
    canvas.set_operator(Operator::DstOut);
    canvas.scale(3.0, 3.0);
    canvas.set_dash(0.0, &[]);
    canvas.reset_clip();
    canvas.circle(4.0, 4.0, 2.0);
    canvas.fill();
    canvas.restore();

    assert_eq!(canvas.color(), color);
    assert_eq!(canvas.matrix(), matrix);
    assert_eq!(canvas.line_width(), 3.0);
    assert_eq!(canvas.dash_offset(), 0.5);
    assert_eq!(canvas.dash_array(), &[1.0, 2.0]);
    assert_eq!(canvas.opacity(), 1.0);
    assert_eq!(canvas.operator(), Operator::SrcOver);
    assert_eq!(canvas.clip_extents(), clip_extents);
    // The inner frame replaced the paint with a solid color;
    // the outer texture paint must come back.
    match canvas.current_paint() {
        Some(Paint::Texture(restored)) => {
            assert!(std::rc::Rc::ptr_eq(&restored.surface, &texture));
            assert_eq!(restored.kind, picovg::TextureKind::Tiled);
            assert_eq!(restored.opacity, 0.5);
            assert_eq!(restored.transform, Transform::identity());
        }
        _ => panic!("the texture paint was not restored"),
    }
}

#[test]
fn clipped_fill_stays_inside() {
    let mut canvas = canvas(8, 8);
    canvas.circle(4.0, 4.0, 3.0);
    canvas.clip();
    canvas.set_rgb(0.0, 0.7, 0.0);
    canvas.rect(0.0, 0.0, 8.0, 8.0);
    canvas.fill();

    let surface = canvas.surface();
    // Corners are outside the circular clip.
    assert_eq!(surface.pixel(0, 0), 0);
    assert_eq!(surface.pixel(7, 7), 0);
    assert!(surface.pixel(4, 4) >> 24 == 0xFF);
    assert_premultiplied(surface);
}

#[test]
fn stroked_line_band() {
    let mut canvas = canvas(16, 8);
    canvas.set_rgb(0.0, 0.0, 0.0);
    canvas.set_line_width(2.0);
    canvas.move_to(2.0, 4.0);
    canvas.line_to(12.0, 4.0);
    canvas.stroke();

    let surface = canvas.surface();
    for x in 2..12 {
        assert_eq!(surface.pixel(x, 3), 0xFF000000);
        assert_eq!(surface.pixel(x, 4), 0xFF000000);
    }
    assert_eq!(surface.pixel(1, 3), 0);
    assert_eq!(surface.pixel(12, 4), 0);
    assert_eq!(surface.pixel(2, 2), 0);
    assert_eq!(surface.pixel(2, 5), 0);
}

#[test]
fn texture_fill_copies_pixels() {
    let mut source = canvas(2, 2);
    source.set_rgb(1.0, 0.0, 0.0);
    source.rect(0.0, 0.0, 1.0, 2.0);
    source.fill();
    source.set_rgb(0.0, 0.0, 1.0);
    source.rect(1.0, 0.0, 1.0, 2.0);
    source.fill();

    let texture = std::rc::Rc::new(source.into_surface());
    let paint = Paint::from_texture(
        texture,
        picovg::TextureKind::Tiled,
        1.0,
        Transform::identity(),
    );

    let mut canvas = canvas(8, 2);
    canvas.set_operator(Operator::Src);
    canvas.set_paint(paint);
    canvas.rect(0.0, 0.0, 8.0, 2.0);
    canvas.fill();

    let surface = canvas.surface();
    assert_eq!(surface.pixel(0, 0), surface.pixel(2, 0));
    assert_eq!(surface.pixel(1, 0), surface.pixel(3, 0));
    assert_eq!(surface.pixel(0, 0), surface.pixel(0, 1));
    assert_premultiplied(surface);
}

#[test]
fn transformed_fill() {
    let mut canvas = canvas(8, 8);
    canvas.translate(4.0, 4.0);
    canvas.rotate(std::f32::consts::FRAC_PI_2);
    canvas.set_rgb(1.0, 1.0, 0.0);
    // A 4x2 rect becomes a 2x4 rect after rotation around (4, 4).
    canvas.rect(0.0, 0.0, 4.0, 2.0);
    canvas.fill();

    let surface = canvas.surface();
    assert_eq!(surface.pixel(3, 4), 0xFFFFFF00);
    assert_eq!(surface.pixel(2, 7), 0xFFFFFF00);
    assert_eq!(surface.pixel(4, 4), 0);
    assert_eq!(surface.pixel(5, 2), 0);
}

#[test]
fn svg_path_data_fill() {
    let path = Path::from_svg("M 1 1 H 5 V 5 H 1 Z").unwrap();
    let mut canvas = canvas(6, 6);
    canvas.add_path(&path);
    canvas.set_rgb(0.0, 0.0, 0.0);
    canvas.fill();

    assert_eq!(canvas.surface().pixel(2, 2), 0xFF000000);
    assert_eq!(canvas.surface().pixel(0, 0), 0);
    assert_eq!(canvas.surface().pixel(5, 5), 0);
}

#[cfg(feature = "raster-images")]
#[test]
fn png_export_round_trip() {
    let mut canvas = canvas(4, 4);
    canvas.set_rgb(0.0, 0.5, 1.0);
    canvas.rect(0.0, 0.0, 4.0, 2.0);
    canvas.fill();

    let mut data = Vec::new();
    canvas.surface().write_png(&mut data).unwrap();
    let decoded = Surface::from_png_data(&data).unwrap();
    assert_eq!(decoded.pixel(0, 0), canvas.surface().pixel(0, 0));
    assert_eq!(decoded.pixel(3, 3), 0);
}
