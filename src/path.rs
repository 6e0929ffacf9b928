// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::Error;
use crate::geom::{Point, Rect};
use crate::transform::Transform;

/// The cubic Bezier control point distance that approximates a quarter circle.
pub(crate) const KAPPA: f32 = 0.552_284_75;

const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
const TWO_PI: f32 = std::f32::consts::TAU;

/// A path command.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo,
    LineTo,
    CubicTo,
    Close,
}

/// A path segment.
///
/// Can contain only absolute move/line/cubic/close segments.
/// All other segment kinds are converted into these on insertion.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
    /// Closes the current subpath.
    ///
    /// Stores the subpath starting point, so the segment can be handled
    /// as a line back to the start without extra bookkeeping.
    Close(Point),
}

/// A path data container.
///
/// All segments are in absolute coordinates.
#[derive(Clone, Default, Debug)]
pub struct Path {
    commands: Vec<PathCommand>,
    points: Vec<Point>,
    start_point: Point,
    num_contours: usize,
    num_points: usize,
    num_curves: usize,
}

impl Path {
    /// Creates a new empty path.
    #[inline]
    pub fn new() -> Self {
        Path::default()
    }

    /// Returns `true` if the path contains no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the number of segments in the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns the number of subpaths in the path.
    #[inline]
    pub fn subpaths(&self) -> usize {
        self.num_contours
    }

    /// Returns the number of stored points in the path.
    #[inline]
    pub fn points(&self) -> usize {
        self.num_points
    }

    /// Returns the number of curve segments in the path.
    #[inline]
    pub fn curves(&self) -> usize {
        self.num_curves
    }

    /// Returns the current point.
    ///
    /// Returns the origin for an empty path.
    #[inline]
    pub fn current_point(&self) -> Point {
        self.points.last().copied().unwrap_or_default()
    }

    /// Clears the path.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.points.clear();
        self.start_point = Point::default();
        self.num_contours = 0;
        self.num_points = 0;
        self.num_curves = 0;
    }

    /// Reserves capacity for at least `segments` additional segments.
    pub fn reserve(&mut self, segments: usize) {
        self.commands.reserve(segments);
        self.points.reserve(segments * 3);
    }

    /// Starts a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::MoveTo);
        self.points.push(Point::new(x, y));
        self.start_point = Point::new(x, y);
        self.num_contours += 1;
        self.num_points += 1;
    }

    /// Adds a line segment to `(x, y)`.
    ///
    /// When the path is empty, an implicit move to the origin is inserted first.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.ensure_subpath();
        self.commands.push(PathCommand::LineTo);
        self.points.push(Point::new(x, y));
        self.num_points += 1;
    }

    /// Adds a quadratic curve segment.
    ///
    /// Stored as an equivalent cubic curve.
    pub fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        #[inline]
        fn calc(n1: f32, n2: f32) -> f32 {
            (n1 + n2 * 2.0) / 3.0
        }

        let p = self.current_point();
        self.cubic_to(calc(p.x, x1), calc(p.y, y1), calc(x, x1), calc(y, y1), x, y);
    }

    /// Adds a cubic curve segment.
    ///
    /// When the path is empty, an implicit move to the origin is inserted first.
    pub fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.ensure_subpath();
        self.commands.push(PathCommand::CubicTo);
        self.points.push(Point::new(x1, y1));
        self.points.push(Point::new(x2, y2));
        self.points.push(Point::new(x, y));
        self.num_points += 3;
        self.num_curves += 1;
    }

    /// Closes the current subpath.
    ///
    /// Does nothing on an empty path.
    pub fn close(&mut self) {
        if self.commands.is_empty() {
            return;
        }

        self.commands.push(PathCommand::Close);
        self.points.push(self.start_point);
        self.num_points += 1;
    }

    fn ensure_subpath(&mut self) {
        if self.commands.is_empty() {
            self.move_to(0.0, 0.0);
        }
    }

    /// Starts a new subpath at the current point offset by `(dx, dy)`.
    pub fn rel_move_to(&mut self, dx: f32, dy: f32) {
        let p = self.current_point();
        self.move_to(p.x + dx, p.y + dy);
    }

    /// Adds a line segment relative to the current point.
    pub fn rel_line_to(&mut self, dx: f32, dy: f32) {
        let p = self.current_point();
        self.line_to(p.x + dx, p.y + dy);
    }

    /// Adds a quadratic curve segment relative to the current point.
    pub fn rel_quad_to(&mut self, dx1: f32, dy1: f32, dx: f32, dy: f32) {
        let p = self.current_point();
        self.quad_to(p.x + dx1, p.y + dy1, p.x + dx, p.y + dy);
    }

    /// Adds a cubic curve segment relative to the current point.
    pub fn rel_cubic_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx: f32, dy: f32) {
        let p = self.current_point();
        self.cubic_to(
            p.x + dx1,
            p.y + dy1,
            p.x + dx2,
            p.y + dy2,
            p.x + dx,
            p.y + dy,
        );
    }

    /// Adds a rectangle subpath.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.reserve(6);
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.line_to(x, y);
        self.close();
    }

    /// Adds a rounded rectangle subpath.
    pub fn add_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32) {
        let rx = rx.min(w * 0.5);
        let ry = ry.min(h * 0.5);

        let right = x + w;
        let bottom = y + h;

        let cpx = rx * KAPPA;
        let cpy = ry * KAPPA;

        self.reserve(10);
        self.move_to(x, y + ry);
        self.cubic_to(x, y + ry - cpy, x + rx - cpx, y, x + rx, y);
        self.line_to(right - rx, y);
        self.cubic_to(right - rx + cpx, y, right, y + ry - cpy, right, y + ry);
        self.line_to(right, bottom - ry);
        self.cubic_to(right, bottom - ry + cpy, right - rx + cpx, bottom, right - rx, bottom);
        self.line_to(x + rx, bottom);
        self.cubic_to(x + rx - cpx, bottom, x, bottom - ry + cpy, x, bottom - ry);
        self.line_to(x, y + ry);
        self.close();
    }

    /// Adds an ellipse subpath built from four cubic curves.
    pub fn add_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let left = cx - rx;
        let top = cy - ry;
        let right = cx + rx;
        let bottom = cy + ry;

        let cpx = rx * KAPPA;
        let cpy = ry * KAPPA;

        self.reserve(6);
        self.move_to(cx, top);
        self.cubic_to(cx + cpx, top, right, cy - cpy, right, cy);
        self.cubic_to(right, cy + cpy, cx + cpx, bottom, cx, bottom);
        self.cubic_to(cx - cpx, bottom, left, cy + cpy, left, cy);
        self.cubic_to(left, cy - cpy, cx - cpx, top, cx, top);
        self.close();
    }

    /// Adds a circle subpath.
    #[inline]
    pub fn add_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.add_ellipse(cx, cy, r, r);
    }

    /// Adds a circular arc around `(cx, cy)` with radius `r` from angle `a0` to `a1`.
    ///
    /// Angles are in radians. `ccw` selects the counterclockwise direction.
    /// The arc is connected to the current point with a line,
    /// or starts a new subpath when the path is empty.
    /// When `a0 == a1` no curves are emitted, but the current point
    /// still moves to the arc start.
    pub fn add_arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, ccw: bool) {
        let mut da = a1 - a0;
        if da.abs() > TWO_PI {
            da = TWO_PI;
        } else if da != 0.0 && ccw != (da < 0.0) {
            da += TWO_PI * if ccw { -1.0 } else { 1.0 };
        }

        let seg_n = (da.abs() / HALF_PI).ceil() as usize;
        let mut a = a0;
        let mut ax = cx + a.cos() * r;
        let mut ay = cy + a.sin() * r;

        self.reserve(1 + seg_n);
        if self.commands.is_empty() {
            self.move_to(ax, ay);
        } else {
            self.line_to(ax, ay);
        }

        if seg_n == 0 {
            return;
        }

        let seg_a = da / seg_n as f32;
        let d = (seg_a / HALF_PI) * KAPPA * r;
        let mut dx = -a.sin() * d;
        let mut dy = a.cos() * d;

        for _ in 0..seg_n {
            let cp1x = ax + dx;
            let cp1y = ay + dy;

            a += seg_a;
            ax = cx + a.cos() * r;
            ay = cy + a.sin() * r;

            dx = -a.sin() * d;
            dy = a.cos() * d;

            self.cubic_to(cp1x, cp1y, ax - dx, ay - dy, ax, ay);
        }
    }

    /// Adds an elliptical arc from the current point to `(x, y)`.
    ///
    /// Follows the SVG arc segment semantics: `rotation` is the x-axis
    /// rotation in radians, `large_arc` and `sweep` select one of the four
    /// candidate arcs. Degenerate radii produce a straight line.
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
        self.ensure_subpath();
        let from = self.current_point();
        let mut rx = rx.abs();
        let mut ry = ry.abs();
        if rx == 0.0 || ry == 0.0 || (from.x == x && from.y == y) {
            self.line_to(x, y);
            return;
        }

        let (sin_phi, cos_phi) = rotation.sin_cos();

        // Map the endpoints into the unrotated ellipse space.
        let dx = (from.x - x) * 0.5;
        let dy = (from.y - y) * 0.5;
        let x1p = cos_phi * dx + sin_phi * dy;
        let y1p = -sin_phi * dx + cos_phi * dy;

        // Inflate too-small radii.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let mut coef = (num / den).max(0.0).sqrt();
        if large_arc == sweep {
            coef = -coef;
        }

        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;
        let cx = cos_phi * cxp - sin_phi * cyp + (from.x + x) * 0.5;
        let cy = sin_phi * cxp + cos_phi * cyp + (from.y + y) * 0.5;

        let a0 = ((y1p - cyp) / ry).atan2((x1p - cxp) / rx);
        let a1 = ((-y1p - cyp) / ry).atan2((-x1p - cxp) / rx);
        let mut da = a1 - a0;
        if !sweep && da > 0.0 {
            da -= TWO_PI;
        } else if sweep && da < 0.0 {
            da += TWO_PI;
        }

        // Device transform from the unit circle.
        let ts = Transform::from_translate(cx, cy)
            .pre_concat(&Transform::from_rotate(rotation))
            .pre_concat(&Transform::from_scale(rx, ry));

        let seg_n = (da.abs() / HALF_PI).ceil().max(1.0) as usize;
        let seg_a = da / seg_n as f32;
        let d = (seg_a / HALF_PI) * KAPPA;

        let mut a = a0;
        for _ in 0..seg_n {
            let (sin_a, cos_a) = a.sin_cos();
            let cp1 = Point::new(cos_a - sin_a * d, sin_a + cos_a * d);

            a += seg_a;
            let (sin_a, cos_a) = a.sin_cos();
            let p1 = Point::new(cos_a, sin_a);
            let cp2 = Point::new(cos_a + sin_a * d, sin_a - cos_a * d);

            let cp1 = ts.map_point(cp1);
            let cp2 = ts.map_point(cp2);
            let p1 = ts.map_point(p1);
            self.cubic_to(cp1.x, cp1.y, cp2.x, cp2.y, p1.x, p1.y);
        }
    }

    /// Appends all segments of `source`, optionally transformed.
    pub fn add_path(&mut self, source: &Path, ts: Option<&Transform>) {
        let ts = match ts {
            Some(ts) if !ts.is_identity() => *ts,
            _ => {
                self.commands.extend_from_slice(&source.commands);
                self.points.extend_from_slice(&source.points);
                self.start_point = source.start_point;
                self.num_contours += source.num_contours;
                self.num_points += source.num_points;
                self.num_curves += source.num_curves;
                return;
            }
        };

        self.reserve(source.len());
        for segment in source.segments() {
            match segment {
                PathSegment::MoveTo(p) => {
                    let p = ts.map_point(p);
                    self.move_to(p.x, p.y);
                }
                PathSegment::LineTo(p) => {
                    let p = ts.map_point(p);
                    self.line_to(p.x, p.y);
                }
                PathSegment::CubicTo(p1, p2, p) => {
                    let p1 = ts.map_point(p1);
                    let p2 = ts.map_point(p2);
                    let p = ts.map_point(p);
                    self.cubic_to(p1.x, p1.y, p2.x, p2.y, p.x, p.y);
                }
                PathSegment::Close(_) => self.close(),
            }
        }
    }

    /// Transforms the path in place.
    pub fn transform(&mut self, ts: &Transform) {
        ts.map_points(&mut self.points);
        self.start_point = ts.map_point(self.start_point);
    }

    /// Returns an iterator over the path segments.
    #[inline]
    pub fn segments(&self) -> PathSegmentsIter {
        PathSegmentsIter {
            path: self,
            cmd_index: 0,
            point_index: 0,
        }
    }

    /// Calls `f` for every segment of the path.
    pub fn traverse<F: FnMut(PathSegment)>(&self, mut f: F) {
        for segment in self.segments() {
            f(segment);
        }
    }

    /// Calls `f` for every segment of the path with curves
    /// subdivided into line segments.
    pub fn traverse_flatten<F: FnMut(PathSegment)>(&self, mut f: F) {
        if self.num_curves == 0 {
            return self.traverse(f);
        }

        let mut current = Point::default();
        for segment in self.segments() {
            match segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => {
                    f(segment);
                    current = p;
                }
                PathSegment::Close(p) => {
                    f(segment);
                    current = p;
                }
                PathSegment::CubicTo(p1, p2, p) => {
                    flatten_cubic(current, p1, p2, p, &mut f);
                    current = p;
                }
            }
        }
    }

    /// Calls `f` for every segment of the flattened path split into dashes.
    ///
    /// The dash array is treated as a cycle. An odd array is logically
    /// doubled, an empty array (or one summing to zero) disables dashing.
    pub fn traverse_dashed<F: FnMut(PathSegment)>(&self, offset: f32, dashes: &[f32], f: F) {
        let mut dash_sum: f32 = dashes.iter().sum();
        if dashes.len() % 2 == 1 {
            dash_sum *= 2.0;
        }
        if dash_sum <= 0.0 {
            return self.traverse(f);
        }

        let mut start_phase = offset % dash_sum;
        if start_phase < 0.0 {
            start_phase += dash_sum;
        }
        let mut start_index = 0;
        let mut start_toggle = true;
        while start_phase >= dashes[start_index % dashes.len()] {
            start_phase -= dashes[start_index % dashes.len()];
            start_toggle = !start_toggle;
            start_index += 1;
        }

        let mut dasher = Dasher {
            dashes,
            start_phase,
            phase: start_phase,
            start_index,
            index: start_index,
            start_toggle,
            toggle: start_toggle,
            current_point: Point::default(),
            f,
        };
        self.traverse_flatten(|segment| dasher.segment(segment));
    }

    /// Returns the bounding rect of the flattened path
    /// and the total polyline length.
    pub fn extents(&self) -> (Rect, f32) {
        let mut current = Point::default();
        let mut is_first = true;
        let mut length = 0.0;
        let mut x1 = 0.0;
        let mut y1 = 0.0;
        let mut x2 = 0.0;
        let mut y2 = 0.0;
        self.traverse_flatten(|segment| {
            let p = match segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) | PathSegment::Close(p) => p,
                PathSegment::CubicTo(..) => unreachable!(),
            };

            if is_first {
                is_first = false;
                current = p;
                x1 = p.x;
                y1 = p.y;
                x2 = p.x;
                y2 = p.y;
                return;
            }

            if !matches!(segment, PathSegment::MoveTo(_)) {
                length += current.distance_to(p);
            }

            x1 = f32::min(x1, p.x);
            y1 = f32::min(y1, p.y);
            x2 = f32::max(x2, p.x);
            y2 = f32::max(y2, p.y);
            current = p;
        });

        (Rect::new(x1, y1, x2 - x1, y2 - y1), length)
    }

    /// Returns the total polyline length of the flattened path.
    #[inline]
    pub fn length(&self) -> f32 {
        self.extents().1
    }

    /// Returns a copy with all curves subdivided into line segments.
    pub fn clone_flatten(&self) -> Path {
        let mut clone = Path::new();
        clone.reserve(self.len());
        self.traverse_flatten(|segment| clone.push_segment(segment));
        clone
    }

    /// Returns a flattened copy split into dashes.
    pub fn clone_dashed(&self, offset: f32, dashes: &[f32]) -> Path {
        let mut clone = Path::new();
        clone.reserve(self.len());
        self.traverse_dashed(offset, dashes, |segment| clone.push_segment(segment));
        clone
    }

    fn push_segment(&mut self, segment: PathSegment) {
        match segment {
            PathSegment::MoveTo(p) => self.move_to(p.x, p.y),
            PathSegment::LineTo(p) => self.line_to(p.x, p.y),
            PathSegment::CubicTo(p1, p2, p) => self.cubic_to(p1.x, p1.y, p2.x, p2.y, p.x, p.y),
            PathSegment::Close(_) => self.close(),
        }
    }

    /// Creates a path from an SVG path data string.
    pub fn from_svg(text: &str) -> Result<Path, Error> {
        let mut path = Path::new();
        for segment in svgtypes::SimplifyingPathParser::from(text) {
            let segment = match segment {
                Ok(v) => v,
                Err(_) => return Err(Error::InvalidPathData),
            };

            match segment {
                svgtypes::SimplePathSegment::MoveTo { x, y } => {
                    path.move_to(x as f32, y as f32);
                }
                svgtypes::SimplePathSegment::LineTo { x, y } => {
                    path.line_to(x as f32, y as f32);
                }
                svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    path.quad_to(x1 as f32, y1 as f32, x as f32, y as f32);
                }
                svgtypes::SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                    path.cubic_to(
                        x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
                    );
                }
                svgtypes::SimplePathSegment::ClosePath => {
                    path.close();
                }
            }
        }

        Ok(path)
    }
}

/// A path segments iterator.
#[derive(Clone)]
pub struct PathSegmentsIter<'a> {
    path: &'a Path,
    cmd_index: usize,
    point_index: usize,
}

impl Iterator for PathSegmentsIter<'_> {
    type Item = PathSegment;

    fn next(&mut self) -> Option<PathSegment> {
        let cmd = self.path.commands.get(self.cmd_index)?;
        self.cmd_index += 1;
        let points = &self.path.points[self.point_index..];
        Some(match cmd {
            PathCommand::MoveTo => {
                self.point_index += 1;
                PathSegment::MoveTo(points[0])
            }
            PathCommand::LineTo => {
                self.point_index += 1;
                PathSegment::LineTo(points[0])
            }
            PathCommand::CubicTo => {
                self.point_index += 3;
                PathSegment::CubicTo(points[0], points[1], points[2])
            }
            PathCommand::Close => {
                self.point_index += 1;
                PathSegment::Close(points[0])
            }
        })
    }
}

const FLATTEN_THRESHOLD: f32 = 0.25;
const FLATTEN_MAX_DEPTH: usize = 32;

#[derive(Clone, Copy, Default)]
struct Bezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    x3: f32,
    y3: f32,
    x4: f32,
    y4: f32,
}

fn split_bezier(b: &Bezier) -> (Bezier, Bezier) {
    let mut first = Bezier::default();
    let mut second = Bezier::default();

    let c = (b.x2 + b.x3) * 0.5;
    first.x2 = (b.x1 + b.x2) * 0.5;
    second.x3 = (b.x3 + b.x4) * 0.5;
    first.x1 = b.x1;
    second.x4 = b.x4;
    first.x3 = (first.x2 + c) * 0.5;
    second.x2 = (second.x3 + c) * 0.5;
    first.x4 = (first.x3 + second.x2) * 0.5;
    second.x1 = first.x4;

    let c = (b.y2 + b.y3) * 0.5;
    first.y2 = (b.y1 + b.y2) * 0.5;
    second.y3 = (b.y3 + b.y4) * 0.5;
    first.y1 = b.y1;
    second.y4 = b.y4;
    first.y3 = (first.y2 + c) * 0.5;
    second.y2 = (second.y3 + c) * 0.5;
    first.y4 = (first.y3 + second.y2) * 0.5;
    second.y1 = first.y4;

    (first, second)
}

fn flatten_cubic<F: FnMut(PathSegment)>(from: Point, p1: Point, p2: Point, to: Point, f: &mut F) {
    let mut beziers = [Bezier::default(); FLATTEN_MAX_DEPTH];
    beziers[0] = Bezier {
        x1: from.x,
        y1: from.y,
        x2: p1.x,
        y2: p1.y,
        x3: p2.x,
        y3: p2.y,
        x4: to.x,
        y4: to.y,
    };

    let mut sp = 0;
    loop {
        let b = beziers[sp];
        let x4x1 = b.x4 - b.x1;
        let y4y1 = b.y4 - b.y1;
        let mut l = x4x1.abs() + y4y1.abs();
        let d;
        if l > 1.0 {
            d = (x4x1 * (b.y1 - b.y2) - y4y1 * (b.x1 - b.x2)).abs()
                + (x4x1 * (b.y1 - b.y3) - y4y1 * (b.x1 - b.x3)).abs();
        } else {
            d = (b.x1 - b.x2).abs()
                + (b.y1 - b.y2).abs()
                + (b.x1 - b.x3).abs()
                + (b.y1 - b.y3).abs();
            l = 1.0;
        }

        if d < FLATTEN_THRESHOLD * l || sp == FLATTEN_MAX_DEPTH - 1 {
            f(PathSegment::LineTo(Point::new(b.x4, b.y4)));
            if sp == 0 {
                break;
            }
            sp -= 1;
        } else {
            let (first, second) = split_bezier(&b);
            beziers[sp] = second;
            beziers[sp + 1] = first;
            sp += 1;
        }
    }
}

struct Dasher<'a, F> {
    dashes: &'a [f32],
    start_phase: f32,
    phase: f32,
    start_index: usize,
    index: usize,
    start_toggle: bool,
    toggle: bool,
    current_point: Point,
    f: F,
}

impl<F: FnMut(PathSegment)> Dasher<'_, F> {
    fn dash(&self, index: usize) -> f32 {
        self.dashes[index % self.dashes.len()]
    }

    fn segment(&mut self, segment: PathSegment) {
        let p1 = match segment {
            PathSegment::MoveTo(p) => {
                if self.start_toggle {
                    (self.f)(PathSegment::MoveTo(p));
                }
                self.current_point = p;
                self.phase = self.start_phase;
                self.index = self.start_index;
                self.toggle = self.start_toggle;
                return;
            }
            PathSegment::LineTo(p) | PathSegment::Close(p) => p,
            PathSegment::CubicTo(..) => unreachable!(),
        };

        let p0 = self.current_point;
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let dist0 = dx.hypot(dy);
        let mut dist1 = 0.0;
        while dist0 - dist1 > self.dash(self.index) - self.phase {
            dist1 += self.dash(self.index) - self.phase;
            let a = dist1 / dist0;
            let p = Point::new(p0.x + a * dx, p0.y + a * dy);
            if self.toggle {
                (self.f)(PathSegment::LineTo(p));
            } else {
                (self.f)(PathSegment::MoveTo(p));
            }

            self.phase = 0.0;
            self.toggle = !self.toggle;
            self.index += 1;
        }

        if self.toggle {
            (self.f)(PathSegment::LineTo(p1));
        }

        self.phase += dist0 - dist1;
        self.current_point = p1;
    }
}
