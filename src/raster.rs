// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::{IntRect, Point};
use crate::path::{Path, PathSegment};
use crate::span::SpanBuffer;
use crate::stroke::{stroke_path, StrokeDash, StrokeStyle};
use crate::transform::Transform;

/// A path filling rule.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FillRule {
    /// "Inside" is computed by a non-zero sum of signed edge crossings.
    NonZero,
    /// "Inside" is computed by an odd number of edge crossings.
    EvenOdd,
}

impl Default for FillRule {
    #[inline]
    fn default() -> Self {
        FillRule::NonZero
    }
}

// The rasterizer accumulates coverage on a 1/256 subpixel grid.
const PIXEL_BITS: i32 = 8;
const ONE_PIXEL: i32 = 1 << PIXEL_BITS;

/// Converts a path into a sorted span list.
///
/// The path is transformed by `ts`, optionally stroked, flattened and
/// scan-converted with analytic antialiasing. Every produced span lies
/// inside `clip`. Stroking forces the non-zero fill rule.
pub fn rasterize(
    spans: &mut SpanBuffer,
    path: &Path,
    ts: &Transform,
    clip: &IntRect,
    stroke: Option<(&StrokeStyle, &StrokeDash)>,
    fill_rule: FillRule,
) {
    spans.reset();
    if path.is_empty() || clip.is_empty() {
        return;
    }

    let (mut device_path, fill_rule) = match stroke {
        Some((style, dash)) => {
            if style.width <= 0.0 {
                return;
            }
            (stroke_path(path, style, Some(dash)), FillRule::NonZero)
        }
        None => (path.clone(), fill_rule),
    };
    device_path.transform(ts);

    let mut raster = Rasterizer::new(*clip);
    let mut first = Point::default();
    let mut current = Point::default();
    let mut has_subpath = false;
    device_path.traverse_flatten(|segment| match segment {
        PathSegment::MoveTo(p) => {
            if has_subpath {
                raster.add_edge(current, first);
            }
            first = p;
            current = p;
            has_subpath = true;
        }
        PathSegment::LineTo(p) => {
            raster.add_edge(current, p);
            current = p;
        }
        PathSegment::Close(p) => {
            raster.add_edge(current, p);
            current = p;
        }
        PathSegment::CubicTo(..) => unreachable!(),
    });
    if has_subpath {
        raster.add_edge(current, first);
    }

    raster.sweep(spans, fill_rule);
}

#[derive(Clone, Copy)]
struct Cell {
    x: i32,
    y: i32,
    cover: i32,
    area: i32,
}

struct Rasterizer {
    cells: Vec<Cell>,
    clip: IntRect,
}

impl Rasterizer {
    fn new(clip: IntRect) -> Self {
        Rasterizer {
            cells: Vec::new(),
            clip,
        }
    }

    /// Adds a line edge, clipping it to the clip rect.
    ///
    /// The parts above/below the clip contribute nothing and are dropped.
    /// The parts to the left/right are clamped to the clip columns,
    /// which preserves their winding contribution.
    fn add_edge(&mut self, p0: Point, p1: Point) {
        if p0.y == p1.y {
            return;
        }

        let top = self.clip.top() as f32;
        let bottom = self.clip.bottom() as f32;
        if p0.y.max(p1.y) <= top || p0.y.min(p1.y) >= bottom {
            return;
        }

        // Trim to the clip rows.
        let mut p0 = p0;
        let mut p1 = p1;
        let dxdy = (p1.x - p0.x) / (p1.y - p0.y);
        if p0.y < top {
            p0 = Point::new(p0.x + (top - p0.y) * dxdy, top);
        } else if p0.y > bottom {
            p0 = Point::new(p0.x + (bottom - p0.y) * dxdy, bottom);
        }
        if p1.y < top {
            p1 = Point::new(p1.x + (top - p1.y) * dxdy, top);
        } else if p1.y > bottom {
            p1 = Point::new(p1.x + (bottom - p1.y) * dxdy, bottom);
        }
        if p0.y == p1.y {
            return;
        }

        // Split at the clip columns and clamp the outside parts.
        let left = self.clip.left() as f32;
        let right = self.clip.right() as f32;
        if p0.x.max(p1.x) <= left {
            self.render_line(Point::new(left, p0.y), Point::new(left, p1.y));
            return;
        }
        if p0.x.min(p1.x) >= right {
            self.render_line(Point::new(right, p0.y), Point::new(right, p1.y));
            return;
        }

        let mut points = [p0, p1, p1, p1];
        let mut count = 2;
        if p0.x != p1.x {
            let dydx = (p1.y - p0.y) / (p1.x - p0.x);
            for border in [left, right] {
                if (p0.x < border) != (p1.x < border) {
                    let p = Point::new(border, p0.y + (border - p0.x) * dydx);
                    points[count] = p;
                    count += 1;
                }
            }
        }
        points[..count].sort_unstable_by(|a, b| {
            let ta = (a.y - p0.y) / (p1.y - p0.y);
            let tb = (b.y - p0.y) / (p1.y - p0.y);
            ta.partial_cmp(&tb).unwrap_or(std::cmp::Ordering::Equal)
        });

        for pair in points[..count].windows(2) {
            let (mut a, mut b) = (pair[0], pair[1]);
            if a.y == b.y {
                continue;
            }
            let mid = (a.x + b.x) * 0.5;
            if mid <= left {
                a.x = left;
                b.x = left;
            } else if mid >= right {
                a.x = right;
                b.x = right;
            }
            self.render_line(a, b);
        }
    }

    /// Rasterizes a clipped line into coverage cells.
    fn render_line(&mut self, p0: Point, p1: Point) {
        let x0 = to_fixed(p0.x);
        let y0 = to_fixed(p0.y);
        let x1 = to_fixed(p1.x);
        let y1 = to_fixed(p1.y);
        if y0 == y1 {
            return;
        }

        // Walk top to bottom; the direction only affects the sign.
        let (sign, x0, y0, x1, y1) = if y0 < y1 {
            (1, x0, y0, x1, y1)
        } else {
            (-1, x1, y1, x0, y0)
        };

        let dx = (x1 - x0) as i64;
        let dy = (y1 - y0) as i64;

        let x_at = |y: i32| -> i32 { x0 + ((dx * (y - y0) as i64) / dy) as i32 };

        let mut y = y0;
        let mut x = x0;
        let mut ey = y0 >> PIXEL_BITS;
        while y < y1 {
            let row_end = ((ey + 1) << PIXEL_BITS).min(y1);
            let x_end = if row_end == y1 { x1 } else { x_at(row_end) };
            self.render_row_piece(ey, x, y, x_end, row_end, sign);
            y = row_end;
            x = x_end;
            ey += 1;
        }
    }

    /// Rasterizes a line piece contained in the single scanline `ey`.
    fn render_row_piece(&mut self, ey: i32, x0: i32, y0: i32, x1: i32, y1: i32, sign: i32) {
        debug_assert!(y1 > y0);

        if x0 == x1 {
            let ex = x0 >> PIXEL_BITS;
            let fx = x0 - (ex << PIXEL_BITS);
            let dy = y1 - y0;
            self.push_cell(ex, ey, dy * sign, dy * 2 * fx * sign);
            return;
        }

        let dx = (x1 - x0) as i64;
        let dy = (y1 - y0) as i64;
        let y_at = |x: i32| -> i32 { y0 + ((dy * (x - x0) as i64) / dx) as i32 };

        let step = if x1 > x0 { 1 } else { -1 };
        let mut x = x0;
        let mut y = y0;
        let mut ex = x0 >> PIXEL_BITS;
        // When moving left and starting exactly on a cell border,
        // the first piece belongs to the cell on the left.
        if step < 0 && x0 == ex << PIXEL_BITS {
            ex -= 1;
        }

        loop {
            let border = if step > 0 {
                ((ex + 1) << PIXEL_BITS).min(x1)
            } else {
                (ex << PIXEL_BITS).max(x1)
            };
            let is_last = border == x1;
            let y_next = if is_last { y1 } else { y_at(border) };

            let cell_origin = ex << PIXEL_BITS;
            let fx0 = x - cell_origin;
            let fx1 = border - cell_origin;
            let piece_dy = y_next - y;
            if piece_dy != 0 {
                self.push_cell(ex, ey, piece_dy * sign, piece_dy * (fx0 + fx1) * sign);
            }

            if is_last {
                break;
            }
            x = border;
            y = y_next;
            ex += step;
        }
    }

    fn push_cell(&mut self, x: i32, y: i32, cover: i32, area: i32) {
        if let Some(last) = self.cells.last_mut() {
            if last.x == x && last.y == y {
                last.cover += cover;
                last.area += area;
                return;
            }
        }
        self.cells.push(Cell { x, y, cover, area });
    }

    /// Resolves the accumulated cells into spans.
    fn sweep(&mut self, spans: &mut SpanBuffer, fill_rule: FillRule) {
        if self.cells.is_empty() {
            return;
        }

        self.cells.sort_unstable_by_key(|c| (c.y, c.x));

        let left = self.clip.left();
        let right = self.clip.right();

        let mut i = 0;
        while i < self.cells.len() {
            let y = self.cells[i].y;

            let mut cover = 0i32;
            let mut x = left;
            while i < self.cells.len() && self.cells[i].y == y {
                // Merge duplicates produced by separate edges.
                let cx = self.cells[i].x;
                let mut cell_cover = 0i32;
                let mut cell_area = 0i32;
                while i < self.cells.len() && self.cells[i].y == y && self.cells[i].x == cx {
                    cell_cover += self.cells[i].cover;
                    cell_area += self.cells[i].area;
                    i += 1;
                }

                if cx > x && cover != 0 {
                    let alpha = compute_alpha(cover * (ONE_PIXEL * 2), fill_rule);
                    spans.push(y, x, cx.min(right) - x, alpha);
                }

                cover += cell_cover;
                let area = cover * (ONE_PIXEL * 2) - cell_area;
                if area != 0 && cx < right {
                    spans.push(y, cx, 1, compute_alpha(area, fill_rule));
                }
                x = cx + 1;
            }

            if cover != 0 && x < right {
                let alpha = compute_alpha(cover * (ONE_PIXEL * 2), fill_rule);
                spans.push(y, x, right - x, alpha);
            }
        }
    }
}

#[inline]
fn to_fixed(v: f32) -> i32 {
    (v * ONE_PIXEL as f32).round() as i32
}

fn compute_alpha(area: i32, fill_rule: FillRule) -> u8 {
    // Area is in `2 * ONE_PIXEL^2` units per full pixel.
    let mut coverage = area >> (PIXEL_BITS * 2 + 1 - 8);
    if coverage < 0 {
        coverage = -coverage;
    }

    match fill_rule {
        FillRule::EvenOdd => {
            coverage &= 511;
            if coverage > 256 {
                coverage = 512 - coverage;
            } else if coverage == 256 {
                coverage = 255;
            }
        }
        FillRule::NonZero => {
            if coverage >= 256 {
                coverage = 255;
            }
        }
    }

    coverage as u8
}
