// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
*picovg* is a tiny 2D vector graphics rasterization library.

It is a self-contained immediate-mode canvas: build paths, set paint,
transform and stroke state, then fill, stroke or clip into a
premultiplied ARGB32 pixel buffer. No display server, no GPU.

```
use picovg::Canvas;

let mut canvas = Canvas::new(64, 64).unwrap();
canvas.set_rgb(0.8, 0.2, 0.2);
canvas.circle(32.0, 32.0, 24.0);
canvas.fill();
let surface = canvas.into_surface();
assert_eq!(surface.pixel(32, 32), 0xFFCC3333);
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::identity_op)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]

mod blend;
mod canvas;
mod error;
mod geom;
#[cfg(feature = "raster-images")]
mod image;
mod paint;
mod path;
mod raster;
mod span;
mod stroke;
mod surface;
#[cfg(feature = "text")]
mod text;
mod transform;

pub use blend::Operator;
pub use canvas::Canvas;
pub use error::Error;
pub use geom::{FuzzyEq, FuzzyZero, IntRect, Point, Rect};
pub use paint::{
    Color, Gradient, GradientKind, GradientStop, Paint, SpreadMethod, Texture, TextureKind,
};
pub use path::{Path, PathCommand, PathSegment, PathSegmentsIter};
pub use raster::{rasterize, FillRule};
pub use span::{Span, SpanBuffer};
pub use stroke::{stroke_path, LineCap, LineJoin, StrokeDash, StrokeStyle};
pub use surface::Surface;
#[cfg(feature = "text")]
pub use text::{codepoints, Codepoints, FaceMetrics, FontFace, GlyphMetrics, TextEncoding};
pub use transform::Transform;

/// The major version number.
pub const VERSION_MAJOR: u32 = 0;
/// The minor version number.
pub const VERSION_MINOR: u32 = 1;
/// The patch version number.
pub const VERSION_PATCH: u32 = 0;

/// The library version as `major * 10000 + minor * 100 + patch`.
pub const VERSION: u32 = VERSION_MAJOR * 10000 + VERSION_MINOR * 100 + VERSION_PATCH;

/// Returns the library version as a `major.minor.patch` string.
pub fn version_string() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #[test]
    fn version_encoding() {
        assert_eq!(crate::VERSION, 100);
        assert_eq!(crate::version_string(), "0.1.0");
    }
}
