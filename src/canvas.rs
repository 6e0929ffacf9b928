// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[cfg(feature = "text")]
use std::rc::Rc;

use crate::blend::{blend_spans, Operator};
use crate::geom::{IntRect, Point, Rect};
use crate::paint::{Color, Paint};
use crate::path::Path;
use crate::raster::{rasterize, FillRule};
use crate::span::SpanBuffer;
use crate::stroke::{LineCap, LineJoin, StrokeDash, StrokeStyle};
use crate::surface::Surface;
#[cfg(feature = "text")]
use crate::text::FontFace;
use crate::transform::Transform;

/// One frame of the drawing state stack.
struct State {
    paint: Option<Paint>,
    color: Color,
    matrix: Transform,
    stroke: StrokeStyle,
    dash: StrokeDash,
    op: Operator,
    fill_rule: FillRule,
    clip_spans: SpanBuffer,
    clipping: bool,
    opacity: f32,
    #[cfg(feature = "text")]
    font_face: Option<Rc<FontFace>>,
    #[cfg(feature = "text")]
    font_size: f32,
}

impl Default for State {
    fn default() -> Self {
        State {
            paint: None,
            color: Color::BLACK,
            matrix: Transform::identity(),
            stroke: StrokeStyle::default(),
            dash: StrokeDash::default(),
            op: Operator::default(),
            fill_rule: FillRule::default(),
            clip_spans: SpanBuffer::new(),
            clipping: false,
            opacity: 1.0,
            #[cfg(feature = "text")]
            font_face: None,
            #[cfg(feature = "text")]
            font_size: 12.0,
        }
    }
}

impl State {
    /// Resets to the defaults, keeping allocations for reuse.
    fn reset(&mut self) {
        self.paint = None;
        self.color = Color::BLACK;
        self.matrix = Transform::identity();
        self.stroke = StrokeStyle::default();
        self.dash.offset = 0.0;
        self.dash.array.clear();
        self.op = Operator::default();
        self.fill_rule = FillRule::default();
        self.clip_spans.reset();
        self.clipping = false;
        self.opacity = 1.0;
        #[cfg(feature = "text")]
        {
            self.font_face = None;
            self.font_size = 12.0;
        }
    }

    fn copy_from(&mut self, source: &State) {
        self.paint = source.paint.clone();
        self.color = source.color;
        self.matrix = source.matrix;
        self.stroke = source.stroke;
        self.dash.offset = source.dash.offset;
        self.dash.array.clear();
        self.dash.array.extend_from_slice(&source.dash.array);
        self.op = source.op;
        self.fill_rule = source.fill_rule;
        self.clip_spans.copy_from(&source.clip_spans);
        self.clipping = source.clipping;
        self.opacity = source.opacity;
        #[cfg(feature = "text")]
        {
            self.font_face = source.font_face.clone();
            self.font_size = source.font_size;
        }
    }
}

/// An immediate-mode canvas over a premultiplied ARGB32 surface.
///
/// The canvas accumulates a current path, keeps a stack of drawing
/// states and rasterizes fills, strokes and clips into its surface.
pub struct Canvas {
    surface: Surface,
    state: State,
    stack: Vec<State>,
    freed: Vec<State>,
    path: Path,
    clip_rect: IntRect,
    spans: SpanBuffer,
    clip_scratch: SpanBuffer,
}

impl Canvas {
    /// Creates a canvas over a new transparent surface.
    ///
    /// Returns `None` when a dimension is non-positive.
    pub fn new(width: i32, height: i32) -> Option<Self> {
        Surface::new(width, height).map(Canvas::from_surface)
    }

    /// Creates a canvas over an existing surface.
    pub fn from_surface(surface: Surface) -> Self {
        let clip_rect = IntRect::new(0, 0, surface.width(), surface.height());
        Canvas {
            surface,
            state: State::default(),
            stack: Vec::new(),
            freed: Vec::new(),
            path: Path::new(),
            clip_rect,
            spans: SpanBuffer::new(),
            clip_scratch: SpanBuffer::new(),
        }
    }

    /// Returns the surface.
    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns the surface mutably.
    #[inline]
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Consumes the canvas and returns its surface.
    #[inline]
    pub fn into_surface(self) -> Surface {
        self.surface
    }

    /// Returns the surface width in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    /// Returns the surface height in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    // State management.

    /// Pushes a copy of the current drawing state.
    pub fn save(&mut self) {
        let mut frame = self.freed.pop().unwrap_or_default();
        frame.copy_from(&self.state);
        self.stack.push(std::mem::replace(&mut self.state, frame));
    }

    /// Pops the last saved drawing state.
    ///
    /// Does nothing when there is nothing to pop.
    pub fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            let mut frame = std::mem::replace(&mut self.state, previous);
            frame.reset();
            self.freed.push(frame);
        }
    }

    /// Sets the paint to a solid opaque color.
    pub fn set_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.set_rgba(r, g, b, 1.0);
    }

    /// Sets the paint to a solid color.
    pub fn set_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.paint = None;
        self.state.color = Color::new_rgba(r, g, b, a);
    }

    /// Sets the paint to a solid color.
    pub fn set_color(&mut self, color: Color) {
        self.set_rgba(color.r, color.g, color.b, color.a);
    }

    /// Returns the current solid color.
    #[inline]
    pub fn color(&self) -> Color {
        self.state.color
    }

    /// Sets the current paint.
    pub fn set_paint(&mut self, paint: Paint) {
        self.state.paint = Some(paint);
    }

    /// Returns the current paint, if one was set over the solid color.
    #[inline]
    pub fn current_paint(&self) -> Option<&Paint> {
        self.state.paint.as_ref()
    }

    /// Sets the fill rule.
    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.state.fill_rule = fill_rule;
    }

    /// Returns the fill rule.
    #[inline]
    pub fn fill_rule(&self) -> FillRule {
        self.state.fill_rule
    }

    /// Sets the compositing operator.
    pub fn set_operator(&mut self, op: Operator) {
        self.state.op = op;
    }

    /// Returns the compositing operator.
    #[inline]
    pub fn operator(&self) -> Operator {
        self.state.op
    }

    /// Sets the global opacity. Out of range values are clamped.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.state.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Returns the global opacity.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.state.opacity
    }

    /// Sets the stroke width.
    pub fn set_line_width(&mut self, width: f32) {
        self.state.stroke.width = width;
    }

    /// Returns the stroke width.
    #[inline]
    pub fn line_width(&self) -> f32 {
        self.state.stroke.width
    }

    /// Sets the stroke line cap.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.stroke.cap = cap;
    }

    /// Returns the stroke line cap.
    #[inline]
    pub fn line_cap(&self) -> LineCap {
        self.state.stroke.cap
    }

    /// Sets the stroke line join.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.stroke.join = join;
    }

    /// Returns the stroke line join.
    #[inline]
    pub fn line_join(&self) -> LineJoin {
        self.state.stroke.join
    }

    /// Sets the stroke miter limit.
    pub fn set_miter_limit(&mut self, limit: f32) {
        self.state.stroke.miter_limit = limit;
    }

    /// Returns the stroke miter limit.
    #[inline]
    pub fn miter_limit(&self) -> f32 {
        self.state.stroke.miter_limit
    }

    /// Sets the dash offset and pattern.
    pub fn set_dash(&mut self, offset: f32, array: &[f32]) {
        self.set_dash_offset(offset);
        self.set_dash_array(array);
    }

    /// Sets the dash offset.
    pub fn set_dash_offset(&mut self, offset: f32) {
        self.state.dash.offset = offset;
    }

    /// Returns the dash offset.
    #[inline]
    pub fn dash_offset(&self) -> f32 {
        self.state.dash.offset
    }

    /// Sets the dash pattern. An empty pattern disables dashing.
    pub fn set_dash_array(&mut self, array: &[f32]) {
        self.state.dash.array.clear();
        self.state.dash.array.extend_from_slice(array);
    }

    /// Returns the dash pattern.
    #[inline]
    pub fn dash_array(&self) -> &[f32] {
        &self.state.dash.array
    }

    // Transform management. New transforms apply before the existing
    // matrix from the user's perspective.

    /// Prepends a translation to the current matrix.
    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.transform(&Transform::from_translate(tx, ty));
    }

    /// Prepends a scale to the current matrix.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.transform(&Transform::from_scale(sx, sy));
    }

    /// Prepends a rotation to the current matrix. The angle is in radians.
    pub fn rotate(&mut self, angle: f32) {
        self.transform(&Transform::from_rotate(angle));
    }

    /// Prepends a shear to the current matrix. The angles are in radians.
    pub fn shear(&mut self, x: f32, y: f32) {
        self.transform(&Transform::from_shear(x, y));
    }

    /// Prepends a transform to the current matrix.
    pub fn transform(&mut self, ts: &Transform) {
        self.state.matrix = self.state.matrix.pre_concat(ts);
    }

    /// Replaces the current matrix.
    pub fn set_matrix(&mut self, ts: &Transform) {
        self.state.matrix = *ts;
    }

    /// Resets the current matrix to identity.
    pub fn reset_matrix(&mut self) {
        self.state.matrix = Transform::identity();
    }

    /// Returns the current matrix.
    #[inline]
    pub fn matrix(&self) -> Transform {
        self.state.matrix
    }

    // Path building, forwarded to the current path.

    /// Starts a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x, y);
    }

    /// Adds a line segment to `(x, y)`.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x, y);
    }

    /// Adds a quadratic curve segment.
    pub fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.path.quad_to(x1, y1, x, y);
    }

    /// Adds a cubic curve segment.
    pub fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path.cubic_to(x1, y1, x2, y2, x, y);
    }

    /// Adds an elliptical arc to `(x, y)` with SVG arc semantics.
    pub fn arc_to(
        &mut self,
        rx: f32,
        ry: f32,
        rotation: f32,
        large_arc: bool,
        sweep: bool,
        x: f32,
        y: f32,
    ) {
        self.path.arc_to(rx, ry, rotation, large_arc, sweep, x, y);
    }

    /// Adds a rectangle subpath.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.path.add_rect(x, y, w, h);
    }

    /// Adds a rounded rectangle subpath.
    pub fn round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32) {
        self.path.add_round_rect(x, y, w, h, rx, ry);
    }

    /// Adds an ellipse subpath.
    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.path.add_ellipse(cx, cy, rx, ry);
    }

    /// Adds a circle subpath.
    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.path.add_circle(cx, cy, r);
    }

    /// Adds a circular arc. Angles are in radians.
    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, ccw: bool) {
        self.path.add_arc(cx, cy, r, a0, a1, ccw);
    }

    /// Appends a path to the current path.
    pub fn add_path(&mut self, path: &Path) {
        self.path.add_path(path, None);
    }

    /// Clears the current path.
    pub fn new_path(&mut self) {
        self.path.reset();
    }

    /// Closes the current subpath.
    pub fn close_path(&mut self) {
        self.path.close();
    }

    /// Returns the current point of the current path.
    #[inline]
    pub fn current_point(&self) -> Point {
        self.path.current_point()
    }

    /// Returns the current path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Drawing.

    /// Fills the current path and resets it.
    pub fn fill(&mut self) {
        self.fill_preserve();
        self.new_path();
    }

    /// Strokes the current path and resets it.
    pub fn stroke(&mut self) {
        self.stroke_preserve();
        self.new_path();
    }

    /// Intersects the clip region with the current path and resets it.
    pub fn clip(&mut self) {
        self.clip_preserve();
        self.new_path();
    }

    /// Fills the whole clip region with the current paint.
    pub fn paint(&mut self) {
        if self.state.clipping {
            blend_current(
                &mut self.surface,
                &self.state,
                &self.state.clip_spans,
            );
        } else {
            self.spans.reset();
            self.spans
                .add_rect(0, 0, self.surface.width(), self.surface.height());
            blend_current(&mut self.surface, &self.state, &self.spans);
        }
    }

    /// Fills the current path, keeping it.
    pub fn fill_preserve(&mut self) {
        rasterize(
            &mut self.spans,
            &self.path,
            &self.state.matrix,
            &self.clip_rect,
            None,
            self.state.fill_rule,
        );
        if self.state.clipping {
            self.clip_scratch
                .intersect(&self.spans, &self.state.clip_spans);
            blend_current(&mut self.surface, &self.state, &self.clip_scratch);
        } else {
            blend_current(&mut self.surface, &self.state, &self.spans);
        }
    }

    /// Strokes the current path, keeping it.
    pub fn stroke_preserve(&mut self) {
        rasterize(
            &mut self.spans,
            &self.path,
            &self.state.matrix,
            &self.clip_rect,
            Some((&self.state.stroke, &self.state.dash)),
            FillRule::NonZero,
        );
        if self.state.clipping {
            self.clip_scratch
                .intersect(&self.spans, &self.state.clip_spans);
            blend_current(&mut self.surface, &self.state, &self.clip_scratch);
        } else {
            blend_current(&mut self.surface, &self.state, &self.spans);
        }
    }

    /// Intersects the clip region with the current path, keeping the path.
    pub fn clip_preserve(&mut self) {
        if self.state.clipping {
            rasterize(
                &mut self.spans,
                &self.path,
                &self.state.matrix,
                &self.clip_rect,
                None,
                self.state.fill_rule,
            );
            self.clip_scratch
                .intersect(&self.spans, &self.state.clip_spans);
            self.state.clip_spans.copy_from(&self.clip_scratch);
        } else {
            rasterize(
                &mut self.state.clip_spans,
                &self.path,
                &self.state.matrix,
                &self.clip_rect,
                None,
                self.state.fill_rule,
            );
            self.state.clipping = true;
        }
    }

    /// Removes the clip region.
    pub fn reset_clip(&mut self) {
        self.state.clipping = false;
        self.state.clip_spans.reset();
    }

    /// Returns the bounding rect of filling the current path.
    pub fn fill_extents(&self) -> Rect {
        let (extents, _) = self.path.extents();
        self.state.matrix.map_rect(&extents)
    }

    /// Returns the bounding rect of stroking the current path.
    pub fn stroke_extents(&self) -> Rect {
        self.fill_extents().inflate(self.state.stroke.width / 2.0)
    }

    /// Returns the bounding rect of the clip region.
    pub fn clip_extents(&self) -> Rect {
        if self.state.clipping {
            self.state.clip_spans.extents().to_rect()
        } else {
            self.clip_rect.to_rect()
        }
    }

    // Text.

    /// Sets the font face and size used by [`fill_text`](Self::fill_text).
    #[cfg(feature = "text")]
    pub fn set_font(&mut self, face: Rc<FontFace>, size: f32) {
        self.state.font_face = Some(face);
        self.state.font_size = size;
    }

    /// Fills a text string with the baseline origin at `(x, y)`.
    ///
    /// Resets the current path. Returns the advance width,
    /// zero when no font was set.
    #[cfg(feature = "text")]
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) -> f32 {
        let face = match self.state.font_face.clone() {
            Some(face) => face,
            None => {
                log::warn!("Cannot fill text without a font face.");
                return 0.0;
            }
        };

        self.new_path();
        let advance = face.append_text(text, x, y, self.state.font_size, &mut self.path);
        self.fill();
        advance
    }
}

/// Blends spans with the current state's paint.
fn blend_current(surface: &mut Surface, state: &State, spans: &SpanBuffer) {
    let solid;
    let paint = match &state.paint {
        Some(paint) => paint,
        None => {
            solid = Paint::Solid(state.color);
            &solid
        }
    };

    blend_spans(surface, spans, paint, &state.matrix, state.op, state.opacity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::FuzzyEq;
    use crate::paint::{GradientKind, GradientStop, SpreadMethod};

    #[test]
    fn save_restore_round_trip() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.set_rgba(0.1, 0.2, 0.3, 0.4);
        canvas.set_line_width(3.0);
        canvas.set_dash(1.0, &[2.0, 1.0]);
        canvas.translate(4.0, 0.0);
        canvas.rect(0.0, 0.0, 4.0, 4.0);
        canvas.clip();

        let before_color = canvas.color();
        let before_matrix = canvas.matrix();
        let before_spans = canvas.state.clip_spans.clone();

        canvas.save();
        canvas.set_rgb(1.0, 1.0, 1.0);
        canvas.set_line_width(10.0);
        canvas.set_dash(0.0, &[]);
        canvas.set_opacity(0.5);
        canvas.set_operator(Operator::DstIn);
        canvas.set_fill_rule(FillRule::EvenOdd);
        canvas.rotate(1.0);
        canvas.reset_clip();
        canvas.restore();

        assert_eq!(canvas.color(), before_color);
        assert!(canvas.matrix().fuzzy_eq(&before_matrix));
        assert_eq!(canvas.line_width(), 3.0);
        assert_eq!(canvas.dash_offset(), 1.0);
        assert_eq!(canvas.dash_array(), &[2.0, 1.0]);
        assert_eq!(canvas.opacity(), 1.0);
        assert_eq!(canvas.operator(), Operator::SrcOver);
        assert_eq!(canvas.fill_rule(), FillRule::NonZero);
        assert!(canvas.state.clipping);
        assert_eq!(canvas.state.clip_spans.spans(), before_spans.spans());
    }

    #[test]
    fn save_restore_brings_the_paint_back() {
        let stops = [
            GradientStop::new(0.0, Color::new_rgb(1.0, 0.0, 0.0)),
            GradientStop::new(1.0, Color::new_rgb(0.0, 0.0, 1.0)),
        ];
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.set_paint(Paint::from_linear_gradient(
            0.0,
            0.0,
            8.0,
            0.0,
            SpreadMethod::Reflect,
            &stops,
            Transform::from_scale(2.0, 2.0),
        ));

        canvas.save();
        // Replacing the paint with a solid color drops it in this frame.
        canvas.set_rgb(0.0, 1.0, 0.0);
        assert!(canvas.current_paint().is_none());
        canvas.restore();

        match canvas.current_paint() {
            Some(Paint::Gradient(gradient)) => {
                assert_eq!(
                    gradient.kind,
                    GradientKind::Linear { x1: 0.0, y1: 0.0, x2: 8.0, y2: 0.0 }
                );
                assert_eq!(gradient.spread, SpreadMethod::Reflect);
                assert_eq!(gradient.stops, stops);
                assert_eq!(gradient.transform, Transform::from_scale(2.0, 2.0));
            }
            _ => panic!("the gradient paint was not restored"),
        }

        // A paint set inside the frame is dropped on restore.
        canvas.save();
        canvas.set_paint(Paint::from_rgba(0.5, 0.5, 0.5, 0.5));
        canvas.restore();
        assert!(matches!(canvas.current_paint(), Some(Paint::Gradient(_))));
    }

    #[test]
    fn restore_on_base_frame_is_a_noop() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_line_width(7.0);
        canvas.restore();
        assert_eq!(canvas.line_width(), 7.0);
    }

    #[test]
    fn translate_equals_transform() {
        let mut a = Canvas::new(4, 4).unwrap();
        let mut b = Canvas::new(4, 4).unwrap();
        a.rotate(0.5);
        b.rotate(0.5);

        a.translate(3.0, -2.0);
        b.transform(&Transform::new(1.0, 0.0, 0.0, 1.0, 3.0, -2.0));
        assert!(a.matrix().fuzzy_eq(&b.matrix()));

        let mut c = Canvas::new(4, 4).unwrap();
        c.set_matrix(&Transform::from_scale(2.0, 2.0));
        c.transform(&Transform::from_translate(1.0, 0.0));
        // The translation applies before the scale.
        let p = c.matrix().map_point(Point::new(0.0, 0.0));
        assert!(p.fuzzy_eq(&Point::new(2.0, 0.0)));
    }

    #[test]
    fn fill_resets_the_path_and_preserve_keeps_it() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.rect(0.0, 0.0, 2.0, 2.0);
        canvas.fill_preserve();
        assert!(!canvas.path().is_empty());
        canvas.fill();
        assert!(canvas.path().is_empty());
    }

    #[test]
    fn clip_limits_painting() {
        let mut canvas = Canvas::new(4, 1).unwrap();
        canvas.rect(0.0, 0.0, 2.0, 1.0);
        canvas.clip();

        canvas.set_rgb(1.0, 0.0, 0.0);
        canvas.paint();
        assert_eq!(canvas.surface().pixel(0, 0), 0xFFFF0000);
        assert_eq!(canvas.surface().pixel(1, 0), 0xFFFF0000);
        assert_eq!(canvas.surface().pixel(2, 0), 0);
        assert_eq!(canvas.surface().pixel(3, 0), 0);
    }

    #[test]
    fn second_clip_intersects() {
        let mut canvas = Canvas::new(8, 1).unwrap();
        canvas.rect(0.0, 0.0, 6.0, 1.0);
        canvas.clip();
        canvas.rect(4.0, 0.0, 4.0, 1.0);
        canvas.clip();

        canvas.set_rgb(0.0, 1.0, 0.0);
        canvas.paint();
        for x in 0..8 {
            let expected = if (4..6).contains(&x) { 0xFF00FF00 } else { 0 };
            assert_eq!(canvas.surface().pixel(x, 0), expected, "column {}", x);
        }
    }

    #[test]
    fn zero_area_clip_disables_drawing() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.rect(0.0, 0.0, 2.0, 2.0);
        canvas.clip();
        canvas.rect(2.0, 2.0, 2.0, 2.0);
        canvas.clip();

        canvas.set_rgb(1.0, 1.0, 1.0);
        canvas.paint();
        canvas.rect(0.0, 0.0, 4.0, 4.0);
        canvas.fill();
        assert!(canvas.surface().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_path_draws_nothing() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_rgb(1.0, 0.0, 0.0);
        canvas.fill();
        canvas.stroke();
        assert!(canvas.surface().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_width_stroke_is_a_noop() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_line_width(0.0);
        canvas.move_to(0.0, 2.0);
        canvas.line_to(4.0, 2.0);
        canvas.stroke();
        assert!(canvas.surface().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn color_is_clamped_on_set() {
        let mut canvas = Canvas::new(1, 1).unwrap();
        canvas.set_rgb(2.0, -1.0, 0.5);
        assert_eq!(canvas.color(), Color::new_rgba(1.0, 0.0, 0.5, 1.0));
    }
}
