// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use crate::surface::Surface;
use crate::transform::Transform;

/// A non-premultiplied RGBA color. All channels are in the 0..=1 range.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// An opaque black color.
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    /// An opaque white color.
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    /// A fully transparent color.
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// Creates an opaque color. Out of range values are clamped.
    #[inline]
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Self {
        Color::new_rgba(r, g, b, 1.0)
    }

    /// Creates a color. Out of range values are clamped.
    #[inline]
    pub fn new_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Converts into a premultiplied ARGB32 pixel, scaled by `opacity`.
    pub(crate) fn to_argb32(self, opacity: f32) -> u32 {
        let a = self.a * opacity.clamp(0.0, 1.0);
        let alpha = (a * 255.0 + 0.5) as u32;
        let r = (self.r * a * 255.0 + 0.5) as u32;
        let g = (self.g * a * 255.0 + 0.5) as u32;
        let b = (self.b * a * 255.0 + 0.5) as u32;
        (alpha << 24) | (r << 16) | (g << 8) | b
    }
}

/// A gradient color stop.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GradientStop {
    /// Stop position in the 0..=1 range.
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    /// Creates a new stop. The offset is clamped to 0..=1.
    #[inline]
    pub fn new(offset: f32, color: Color) -> Self {
        GradientStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// A spread method.
///
/// Defines how a gradient behaves outside its bounds.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SpreadMethod {
    /// The edge stop colors extend indefinitely.
    Pad,
    /// The gradient mirrors back and forth.
    Reflect,
    /// The gradient repeats.
    Repeat,
}

impl Default for SpreadMethod {
    #[inline]
    fn default() -> Self {
        SpreadMethod::Pad
    }
}

/// A gradient kind with its geometry.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GradientKind {
    /// A linear gradient between two points.
    Linear {
        /// Start point.
        x1: f32,
        /// Start point.
        y1: f32,
        /// End point.
        x2: f32,
        /// End point.
        y2: f32,
    },
    /// A two-circle radial gradient as defined by SVG.
    Radial {
        /// End circle center.
        cx: f32,
        /// End circle center.
        cy: f32,
        /// End circle radius.
        cr: f32,
        /// Focal circle center.
        fx: f32,
        /// Focal circle center.
        fy: f32,
        /// Focal circle radius.
        fr: f32,
    },
}

/// A gradient paint.
#[derive(Clone, Debug)]
pub struct Gradient {
    /// The gradient geometry.
    pub kind: GradientKind,
    /// The spread method.
    pub spread: SpreadMethod,
    /// Color stops, ordered by offset.
    pub stops: Vec<GradientStop>,
    /// Gradient space to user space transform.
    pub transform: Transform,
}

impl Gradient {
    /// Creates a linear gradient without stops.
    pub fn new_linear(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Gradient {
            kind: GradientKind::Linear { x1, y1, x2, y2 },
            spread: SpreadMethod::default(),
            stops: Vec::new(),
            transform: Transform::identity(),
        }
    }

    /// Creates a radial gradient without stops.
    pub fn new_radial(cx: f32, cy: f32, cr: f32, fx: f32, fy: f32, fr: f32) -> Self {
        Gradient {
            kind: GradientKind::Radial { cx, cy, cr, fx, fy, fr },
            spread: SpreadMethod::default(),
            stops: Vec::new(),
            transform: Transform::identity(),
        }
    }

    /// Adds a stop, keeping the list ordered by offset.
    ///
    /// A stop with an existing offset is inserted after it.
    pub fn add_stop(&mut self, offset: f32, color: Color) {
        let stop = GradientStop::new(offset, color);
        let index = self
            .stops
            .iter()
            .position(|s| stop.offset < s.offset)
            .unwrap_or(self.stops.len());
        self.stops.insert(index, stop);
    }
}

/// How a texture repeats outside its source rect.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TextureKind {
    Plain,
    Tiled,
}

/// A texture paint.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Source pixels.
    pub surface: Rc<Surface>,
    /// Repeat behavior.
    pub kind: TextureKind,
    /// Texture opacity in the 0..=1 range.
    pub opacity: f32,
    /// Texture space to user space transform.
    pub transform: Transform,
}

/// A paint source for filling and stroking.
#[derive(Clone, Debug)]
pub enum Paint {
    /// A solid color.
    Solid(Color),
    /// A gradient.
    Gradient(Gradient),
    /// A texture.
    Texture(Texture),
}

impl Paint {
    /// Creates a solid opaque color paint.
    #[inline]
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Paint::Solid(Color::new_rgb(r, g, b))
    }

    /// Creates a solid color paint.
    #[inline]
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Paint::Solid(Color::new_rgba(r, g, b, a))
    }

    /// Creates a linear gradient paint.
    pub fn from_linear_gradient(
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        spread: SpreadMethod,
        stops: &[GradientStop],
        transform: Transform,
    ) -> Self {
        let mut gradient = Gradient::new_linear(x1, y1, x2, y2);
        gradient.spread = spread;
        gradient.transform = transform;
        for stop in stops {
            gradient.add_stop(stop.offset, stop.color);
        }
        Paint::Gradient(gradient)
    }

    /// Creates a radial gradient paint.
    pub fn from_radial_gradient(
        cx: f32,
        cy: f32,
        cr: f32,
        fx: f32,
        fy: f32,
        fr: f32,
        spread: SpreadMethod,
        stops: &[GradientStop],
        transform: Transform,
    ) -> Self {
        let mut gradient = Gradient::new_radial(cx, cy, cr, fx, fy, fr);
        gradient.spread = spread;
        gradient.transform = transform;
        for stop in stops {
            gradient.add_stop(stop.offset, stop.color);
        }
        Paint::Gradient(gradient)
    }

    /// Creates a texture paint.
    pub fn from_texture(
        surface: Rc<Surface>,
        kind: TextureKind,
        opacity: f32,
        transform: Transform,
    ) -> Self {
        Paint::Texture(Texture {
            surface,
            kind,
            opacity: opacity.clamp(0.0, 1.0),
            transform,
        })
    }
}
