// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::Point;
use crate::path::{Path, PathSegment, KAPPA};

const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
const PI: f32 = std::f32::consts::PI;

/// A line cap.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl Default for LineCap {
    #[inline]
    fn default() -> Self {
        LineCap::Butt
    }
}

/// A line join.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl Default for LineJoin {
    #[inline]
    fn default() -> Self {
        LineJoin::Miter
    }
}

/// A stroke style.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StrokeStyle {
    /// The stroke width. A non-positive width disables stroking.
    pub width: f32,
    /// The cap drawn at the ends of open subpaths.
    pub cap: LineCap,
    /// The join drawn at interior vertices.
    pub join: LineJoin,
    /// The miter length to half-width ratio above which
    /// a miter join falls back to a bevel join.
    pub miter_limit: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        StrokeStyle {
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 10.0,
        }
    }
}

/// A stroke dash pattern.
///
/// An empty array disables dashing.
#[allow(missing_docs)]
#[derive(Clone, Default, Debug)]
pub struct StrokeDash {
    pub offset: f32,
    pub array: Vec<f32>,
}

impl StrokeDash {
    pub(crate) fn is_active(&self) -> bool {
        !self.array.is_empty() && self.array.iter().sum::<f32>() > 0.0
    }
}

/// Converts a path and a stroke style into a filled outline path.
///
/// The outline is built from one quad per polyline segment plus join
/// wedges and cap shapes, all wound the same way, so overlapping parts
/// saturate instead of cancelling. The result is meant to be filled
/// with the non-zero rule. The input path is never modified.
pub fn stroke_path(path: &Path, style: &StrokeStyle, dash: Option<&StrokeDash>) -> Path {
    let mut out = Path::new();
    if style.width <= 0.0 {
        return out;
    }

    let mut chains = ChainCollector::default();
    match dash {
        Some(dash) if dash.is_active() => {
            path.traverse_dashed(dash.offset, &dash.array, |s| chains.segment(s));
        }
        _ => path.traverse_flatten(|s| chains.segment(s)),
    }
    chains.finish();

    let half = style.width * 0.5;
    for chain in &chains.chains {
        stroke_chain(&mut out, &chain.points, chain.closed, half, style);
    }

    out
}

#[derive(Default)]
struct Chain {
    points: Vec<Point>,
    closed: bool,
}

#[derive(Default)]
struct ChainCollector {
    chains: Vec<Chain>,
    current: Chain,
}

impl ChainCollector {
    fn segment(&mut self, segment: PathSegment) {
        match segment {
            PathSegment::MoveTo(p) => {
                self.finish();
                self.current.points.push(p);
            }
            PathSegment::LineTo(p) => {
                if self.current.points.last() != Some(&p) {
                    self.current.points.push(p);
                }
            }
            PathSegment::Close(anchor) => {
                // Drop an explicitly drawn closing edge back to the start.
                if self.current.points.last() == Some(&anchor) && self.current.points.len() > 1 {
                    self.current.points.pop();
                }
                self.current.closed = true;
                // Segments after a close continue from the anchor.
                let next = Chain {
                    points: vec![anchor],
                    closed: false,
                };
                self.chains.push(std::mem::replace(&mut self.current, next));
            }
            PathSegment::CubicTo(..) => unreachable!(),
        }
    }

    fn finish(&mut self) {
        if self.current.points.len() > 1 {
            self.chains.push(std::mem::take(&mut self.current));
        } else {
            self.current.points.clear();
            self.current.closed = false;
        }
    }
}

#[inline]
fn direction(from: Point, to: Point) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    Point::new(dx / len, dy / len)
}

#[inline]
fn side_normal(d: Point) -> Point {
    Point::new(d.y, -d.x)
}

#[inline]
fn offset(p: Point, n: Point, half: f32) -> Point {
    Point::new(p.x + n.x * half, p.y + n.y * half)
}

fn stroke_chain(out: &mut Path, points: &[Point], closed: bool, half: f32, style: &StrokeStyle) {
    if points.len() < 2 {
        return;
    }

    let n = points.len();
    let seg_count = if closed { n } else { n - 1 };
    let dirs: Vec<Point> = (0..seg_count)
        .map(|i| direction(points[i], points[(i + 1) % n]))
        .collect();

    for i in 0..seg_count {
        emit_segment_quad(out, points[i], points[(i + 1) % n], dirs[i], half);
    }

    if closed {
        for i in 0..seg_count {
            let next = (i + 1) % seg_count;
            emit_join(out, points[next], dirs[i], dirs[next], half, style);
        }
    } else {
        for i in 0..seg_count - 1 {
            emit_join(out, points[i + 1], dirs[i], dirs[i + 1], half, style);
        }
        emit_cap(out, points[n - 1], dirs[seg_count - 1], half, style.cap);
        emit_cap(out, points[0], Point::new(-dirs[0].x, -dirs[0].y), half, style.cap);
    }
}

fn emit_segment_quad(out: &mut Path, p: Point, q: Point, d: Point, half: f32) {
    let n = side_normal(d);
    let a = offset(p, n, half);
    let b = offset(q, n, half);
    let c = offset(q, Point::new(-n.x, -n.y), half);
    let e = offset(p, Point::new(-n.x, -n.y), half);
    out.move_to(a.x, a.y);
    out.line_to(b.x, b.y);
    out.line_to(c.x, c.y);
    out.line_to(e.x, e.y);
    out.close();
}

/// Fills the gap between two segment quads on the outer side of the turn.
///
/// The wedge winds the same way as the quads for either turn direction.
fn emit_join(
    out: &mut Path,
    center: Point,
    d_in: Point,
    d_out: Point,
    half: f32,
    style: &StrokeStyle,
) {
    let cross = d_in.x * d_out.y - d_in.y * d_out.x;
    let dot = d_in.x * d_out.x + d_in.y * d_out.y;
    if cross == 0.0 && dot >= 0.0 {
        return;
    }

    let n_in = side_normal(d_in);
    let n_out = side_normal(d_out);
    let (n1, n2) = if cross >= 0.0 {
        (n_in, n_out)
    } else {
        (Point::new(-n_out.x, -n_out.y), Point::new(-n_in.x, -n_in.y))
    };
    let a1 = offset(center, n1, half);
    let a2 = offset(center, n2, half);

    out.move_to(center.x, center.y);
    out.line_to(a1.x, a1.y);
    match style.join {
        LineJoin::Bevel => {}
        LineJoin::Miter => {
            // Ratio of miter length to half-width is 1 / cos(theta / 2).
            let ratio2 = 2.0 / (1.0 + dot);
            if 1.0 + dot > 0.0 && ratio2 <= style.miter_limit * style.miter_limit {
                let scale = half / (1.0 + (n1.x * n2.x + n1.y * n2.y));
                let m = Point::new(
                    center.x + (n1.x + n2.x) * scale,
                    center.y + (n1.y + n2.y) * scale,
                );
                out.line_to(m.x, m.y);
            }
        }
        LineJoin::Round => {
            let a0 = n1.y.atan2(n1.x);
            let mut da = n2.y.atan2(n2.x) - a0;
            if da <= 0.0 {
                da += 2.0 * PI;
            }
            emit_arc(out, center, half, a0, da);
        }
    }
    out.line_to(a2.x, a2.y);
    out.close();
}

/// Appends a cap shape beyond an open end.
///
/// `d` is the outward direction at the end. A butt cap adds nothing,
/// the segment quad is already flat there.
fn emit_cap(out: &mut Path, end: Point, d: Point, half: f32, cap: LineCap) {
    let n = side_normal(d);
    let a = offset(end, n, half);
    let b = offset(end, Point::new(-n.x, -n.y), half);
    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            out.move_to(a.x, a.y);
            out.line_to(a.x + d.x * half, a.y + d.y * half);
            out.line_to(b.x + d.x * half, b.y + d.y * half);
            out.line_to(b.x, b.y);
            out.close();
        }
        LineCap::Round => {
            out.move_to(a.x, a.y);
            emit_arc(out, end, half, n.y.atan2(n.x), PI);
            out.close();
        }
    }
}

/// Appends circular arc curves around `center`.
///
/// The current point must already sit at angle `a0`.
fn emit_arc(out: &mut Path, center: Point, radius: f32, a0: f32, da: f32) {
    let seg_n = (da.abs() / HALF_PI).ceil().max(1.0) as usize;
    let seg_a = da / seg_n as f32;
    let d = (seg_a / HALF_PI) * KAPPA * radius;

    let mut a = a0;
    let mut ax = center.x + a.cos() * radius;
    let mut ay = center.y + a.sin() * radius;
    let mut dx = -a.sin() * d;
    let mut dy = a.cos() * d;
    for _ in 0..seg_n {
        let cp1x = ax + dx;
        let cp1y = ay + dy;

        a += seg_a;
        ax = center.x + a.cos() * radius;
        ay = center.y + a.sin() * radius;
        dx = -a.sin() * d;
        dy = a.cos() * d;

        out.cubic_to(cp1x, cp1y, ax - dx, ay - dy, ax, ay);
    }
}
