// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::paint::{Gradient, GradientKind, Paint, SpreadMethod, Texture, TextureKind};
use crate::span::SpanBuffer;
use crate::surface::Surface;
use crate::transform::Transform;

/// A compositing operator.
///
/// All operators work on premultiplied pixels and are applied
/// span-by-span, scaled by span coverage and global opacity.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Operator {
    /// Replaces the destination.
    Src,
    /// Blends the source over the destination.
    SrcOver,
    /// Keeps the destination weighted by the source alpha.
    DstIn,
    /// Keeps the destination weighted by the inverse source alpha.
    DstOut,
}

impl Default for Operator {
    #[inline]
    fn default() -> Self {
        Operator::SrcOver
    }
}

#[inline]
fn alpha(p: u32) -> u32 {
    p >> 24
}

// The classic two-lane multiply with the `(x + (x >> 8) + 0x80) >> 8`
// divide-by-255 approximation.
#[inline]
fn byte_mul(x: u32, a: u32) -> u32 {
    let rb = (x & 0x00ff_00ff) * a;
    let rb = ((rb + ((rb >> 8) & 0x00ff_00ff) + 0x0080_0080) >> 8) & 0x00ff_00ff;
    let ag = ((x >> 8) & 0x00ff_00ff) * a;
    let ag = (ag + ((ag >> 8) & 0x00ff_00ff) + 0x0080_0080) & 0xff00_ff00;
    rb | ag
}

#[inline]
fn lerp8(a: u32, b: u32, w: u32) -> u32 {
    byte_mul(a, 255 - w) + byte_mul(b, w)
}

#[inline]
fn load_pixel(chunk: &[u8]) -> u32 {
    u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
}

#[inline]
fn store_pixel(chunk: &mut [u8], p: u32) {
    chunk.copy_from_slice(&p.to_le_bytes());
}

#[inline]
fn composite(d: u32, s: u32, op: Operator) -> u32 {
    match op {
        Operator::Src => s,
        Operator::SrcOver => s.wrapping_add(byte_mul(d, 255 - alpha(s))),
        Operator::DstIn => byte_mul(d, alpha(s)),
        Operator::DstOut => byte_mul(d, 255 - alpha(s)),
    }
}

/// Composites `spans` onto the surface using the given paint.
///
/// `ts` is the canvas transform at draw time; paint-space transforms
/// are combined with it to map device pixels back into paint space.
pub(crate) fn blend_spans(
    surface: &mut Surface,
    spans: &SpanBuffer,
    paint: &Paint,
    ts: &Transform,
    op: Operator,
    opacity: f32,
) {
    if spans.is_empty() {
        return;
    }

    let opacity = opacity.clamp(0.0, 1.0);
    match paint {
        Paint::Solid(color) => {
            blend_solid(surface, spans, color.to_argb32(opacity), op);
        }
        Paint::Gradient(gradient) => match GradientValues::new(gradient, ts, opacity) {
            Some(values) => blend_gradient(surface, spans, &values, op),
            None => blend_solid(surface, spans, 0, op),
        },
        Paint::Texture(texture) => match TextureValues::new(texture, ts, opacity) {
            Some(values) => blend_texture(surface, spans, &values, op),
            None => blend_solid(surface, spans, 0, op),
        },
    }
}

fn blend_solid(surface: &mut Surface, spans: &SpanBuffer, solid: u32, op: Operator) {
    for span in spans.spans() {
        let s = if span.coverage == 255 {
            solid
        } else {
            byte_mul(solid, span.coverage as u32)
        };

        let row = surface.row_mut(span.y);
        let start = span.x as usize * 4;
        let end = start + span.len as usize * 4;
        for chunk in row[start..end].chunks_exact_mut(4) {
            let d = load_pixel(chunk);
            store_pixel(chunk, composite(d, s, op));
        }
    }
}

fn composite_row(row: &mut [u8], src: &[u32], coverage: u8, op: Operator) {
    for (chunk, &s) in row.chunks_exact_mut(4).zip(src) {
        let s = if coverage == 255 {
            s
        } else {
            byte_mul(s, coverage as u32)
        };
        let d = load_pixel(chunk);
        store_pixel(chunk, composite(d, s, op));
    }
}

const LUT_SIZE: usize = 256;

struct GradientValues {
    // Device space to gradient space.
    inverse: Transform,
    spread: SpreadMethod,
    lut: Vec<u32>,
    kind: GradientValuesKind,
}

#[derive(Clone, Copy)]
enum GradientValuesKind {
    Linear {
        x1: f32,
        y1: f32,
        dx: f32,
        dy: f32,
        len2: f32,
    },
    Radial {
        fx: f32,
        fy: f32,
        fr: f32,
        cdx: f32,
        cdy: f32,
        dr: f32,
        a: f32,
    },
}

impl GradientValues {
    fn new(gradient: &Gradient, ts: &Transform, opacity: f32) -> Option<Self> {
        if gradient.stops.is_empty() {
            log::warn!("A gradient without stops is fully transparent.");
            return None;
        }

        let inverse = match ts.pre_concat(&gradient.transform).invert() {
            Some(ts) => ts,
            None => {
                log::warn!("A non-invertible gradient transform is fully transparent.");
                return None;
            }
        };

        let kind = match gradient.kind {
            GradientKind::Linear { x1, y1, x2, y2 } => {
                let dx = x2 - x1;
                let dy = y2 - y1;
                GradientValuesKind::Linear {
                    x1,
                    y1,
                    dx,
                    dy,
                    len2: dx * dx + dy * dy,
                }
            }
            GradientKind::Radial { cx, cy, cr, fx, fy, fr } => {
                let cr = cr.max(0.0);
                let fr = fr.max(0.0);
                if cr == 0.0 && fr == 0.0 {
                    log::warn!("A radial gradient with zero radii is fully transparent.");
                    return None;
                }

                let cdx = cx - fx;
                let cdy = cy - fy;
                let dr = cr - fr;
                GradientValuesKind::Radial {
                    fx,
                    fy,
                    fr,
                    cdx,
                    cdy,
                    dr,
                    a: cdx * cdx + cdy * cdy - dr * dr,
                }
            }
        };

        Some(GradientValues {
            inverse,
            spread: gradient.spread,
            lut: build_lut(gradient, opacity),
            kind,
        })
    }

    fn lookup(&self, t: f32) -> u32 {
        let t = match self.spread {
            SpreadMethod::Pad => t.clamp(0.0, 1.0),
            SpreadMethod::Repeat => t - t.floor(),
            SpreadMethod::Reflect => {
                let t = t.rem_euclid(2.0);
                if t > 1.0 {
                    2.0 - t
                } else {
                    t
                }
            }
        };

        let index = (t * (LUT_SIZE - 1) as f32 + 0.5) as usize;
        self.lut[index.min(LUT_SIZE - 1)]
    }
}

/// Builds a premultiplied color table with `opacity` folded in.
///
/// Colors are flat before the first and after the last stop
/// and interpolate linearly in between.
fn build_lut(gradient: &Gradient, opacity: f32) -> Vec<u32> {
    let stops = &gradient.stops;
    let mut lut = Vec::with_capacity(LUT_SIZE);
    for i in 0..LUT_SIZE {
        let pos = i as f32 / (LUT_SIZE - 1) as f32;

        let pixel = if pos <= stops[0].offset {
            stops[0].color.to_argb32(opacity)
        } else if pos >= stops[stops.len() - 1].offset {
            stops[stops.len() - 1].color.to_argb32(opacity)
        } else {
            let i1 = stops.iter().rposition(|s| s.offset <= pos).unwrap();
            let s1 = stops[i1];
            let s2 = stops[i1 + 1];
            let range = s2.offset - s1.offset;
            let t = if range > 0.0 { (pos - s1.offset) / range } else { 0.0 };

            let c1 = s1.color;
            let c2 = s2.color;
            crate::paint::Color::new_rgba(
                c1.r + (c2.r - c1.r) * t,
                c1.g + (c2.g - c1.g) * t,
                c1.b + (c2.b - c1.b) * t,
                c1.a + (c2.a - c1.a) * t,
            )
            .to_argb32(opacity)
        };

        lut.push(pixel);
    }

    lut
}

fn blend_gradient(surface: &mut Surface, spans: &SpanBuffer, values: &GradientValues, op: Operator) {
    let mut src = Vec::new();
    for span in spans.spans() {
        src.clear();

        let (gx, gy) = values
            .inverse
            .map(span.x as f32 + 0.5, span.y as f32 + 0.5);
        match values.kind {
            GradientValuesKind::Linear { x1, y1, dx, dy, len2 } => {
                if len2 == 0.0 {
                    src.resize(span.len as usize, values.lookup(0.0));
                } else {
                    let mut t = ((gx - x1) * dx + (gy - y1) * dy) / len2;
                    let dt = (values.inverse.a * dx + values.inverse.b * dy) / len2;
                    for _ in 0..span.len {
                        src.push(values.lookup(t));
                        t += dt;
                    }
                }
            }
            GradientValuesKind::Radial { fx, fy, fr, cdx, cdy, dr, a } => {
                let mut gx = gx;
                let mut gy = gy;
                for _ in 0..span.len {
                    src.push(radial_pixel(values, gx, gy, fx, fy, fr, cdx, cdy, dr, a));
                    gx += values.inverse.a;
                    gy += values.inverse.b;
                }
            }
        }

        let row = surface.row_mut(span.y);
        let start = span.x as usize * 4;
        let end = start + span.len as usize * 4;
        composite_row(&mut row[start..end], &src, span.coverage, op);
    }
}

/// Solves the SVG two-circle quadratic for one pixel.
///
/// Rays with no real root are transparent.
fn radial_pixel(
    values: &GradientValues,
    gx: f32,
    gy: f32,
    fx: f32,
    fy: f32,
    fr: f32,
    cdx: f32,
    cdy: f32,
    dr: f32,
    a: f32,
) -> u32 {
    let px = gx - fx;
    let py = gy - fy;
    let b = 2.0 * (px * cdx + py * cdy + fr * dr);
    let c = px * px + py * py - fr * fr;

    let t = if a.abs() < 1e-6 {
        if b == 0.0 {
            return 0;
        }
        let t = c / b;
        if fr + t * dr < 0.0 {
            return 0;
        }
        t
    } else {
        let det = b * b - 4.0 * a * c;
        if det < 0.0 {
            return 0;
        }
        let det = det.sqrt();
        let t1 = (b + det) / (2.0 * a);
        let t2 = (b - det) / (2.0 * a);
        if fr + t1.max(t2) * dr >= 0.0 {
            t1.max(t2)
        } else if fr + t1.min(t2) * dr >= 0.0 {
            t1.min(t2)
        } else {
            return 0;
        }
    };

    values.lookup(t)
}

struct TextureValues<'a> {
    surface: &'a Surface,
    kind: TextureKind,
    // Device space to texture space.
    inverse: Transform,
    opacity: u32,
}

impl<'a> TextureValues<'a> {
    fn new(texture: &'a Texture, ts: &Transform, opacity: f32) -> Option<Self> {
        let inverse = match ts.pre_concat(&texture.transform).invert() {
            Some(ts) => ts,
            None => {
                log::warn!("A non-invertible texture transform is fully transparent.");
                return None;
            }
        };

        let opacity = ((texture.opacity * opacity).clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
        Some(TextureValues {
            surface: &texture.surface,
            kind: texture.kind,
            inverse,
            opacity,
        })
    }
}

fn blend_texture(surface: &mut Surface, spans: &SpanBuffer, values: &TextureValues, op: Operator) {
    let mut src = Vec::new();
    for span in spans.spans() {
        src.clear();

        let (mut gx, mut gy) = values
            .inverse
            .map(span.x as f32 + 0.5, span.y as f32 + 0.5);
        for _ in 0..span.len {
            src.push(fetch_texture(values, gx, gy));
            gx += values.inverse.a;
            gy += values.inverse.b;
        }

        let row = surface.row_mut(span.y);
        let start = span.x as usize * 4;
        let end = start + span.len as usize * 4;
        composite_row(&mut row[start..end], &src, span.coverage, op);
    }
}

/// Samples the texture at a device pixel mapped to `(gx, gy)` in
/// texture space, bilinearly interpolating four source pixels.
fn fetch_texture(values: &TextureValues, gx: f32, gy: f32) -> u32 {
    let w = values.surface.width();
    let h = values.surface.height();

    if values.kind == TextureKind::Plain
        && (gx < 0.0 || gx >= w as f32 || gy < 0.0 || gy >= h as f32)
    {
        return 0;
    }

    let tx = gx - 0.5;
    let ty = gy - 0.5;
    let x0 = tx.floor();
    let y0 = ty.floor();
    let wx = ((tx - x0) * 255.0 + 0.5) as u32;
    let wy = ((ty - y0) * 255.0 + 0.5) as u32;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let (x0, x1, y0, y1) = match values.kind {
        TextureKind::Plain => (
            x0.clamp(0, w as i64 - 1) as i32,
            (x0 + 1).clamp(0, w as i64 - 1) as i32,
            y0.clamp(0, h as i64 - 1) as i32,
            (y0 + 1).clamp(0, h as i64 - 1) as i32,
        ),
        TextureKind::Tiled => (
            x0.rem_euclid(w as i64) as i32,
            (x0 + 1).rem_euclid(w as i64) as i32,
            y0.rem_euclid(h as i64) as i32,
            (y0 + 1).rem_euclid(h as i64) as i32,
        ),
    };

    let p00 = values.surface.pixel(x0, y0);
    let p10 = values.surface.pixel(x1, y0);
    let p01 = values.surface.pixel(x0, y1);
    let p11 = values.surface.pixel(x1, y1);

    let top = lerp8(p00, p10, wx);
    let bottom = lerp8(p01, p11, wx);
    let pixel = lerp8(top, bottom, wy);
    if values.opacity == 255 {
        pixel
    } else {
        byte_mul(pixel, values.opacity)
    }
}
