// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Error;
use crate::geom::Rect;
use crate::path::Path;
use crate::transform::Transform;

/// A text byte encoding.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TextEncoding {
    Utf8,
    /// Little-endian UTF-16.
    Utf16,
    /// Little-endian UTF-32.
    Utf32,
    Latin1,
}

/// Scaled face-wide metrics.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct FaceMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    /// The union of all glyph bounding boxes.
    pub extents: Rect,
}

/// Scaled per-glyph metrics.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct GlyphMetrics {
    pub advance: f32,
    pub left_side_bearing: f32,
    pub extents: Rect,
}

#[derive(Clone, Default)]
struct Glyph {
    // In font units, y pointing up.
    path: Path,
    advance: f32,
    left_side_bearing: f32,
    bbox: Rect,
}

/// A font face that yields glyph outlines on demand.
///
/// Outlines are extracted lazily with `ttf-parser` and memoized in
/// font units, so repeated draws of the same codepoint only pay for
/// a transform. The cache is internally synchronized; everything else
/// on the face is read-only after construction.
pub struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    ascent: f32,
    descent: f32,
    line_gap: f32,
    global_bbox: Rect,
    cache: Mutex<HashMap<char, Option<Glyph>>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl FontFace {
    /// Parses a face from raw font data.
    ///
    /// `index` selects a face inside a font collection
    /// and is zero for plain font files.
    pub fn from_data(data: Vec<u8>, index: u32) -> Result<Self, Error> {
        let face = match ttf_parser::Face::parse(&data, index) {
            Ok(face) => face,
            Err(_) => return Err(Error::FaceParsingFailed),
        };

        let units_per_em = face.units_per_em() as f32;
        let ascent = face.ascender() as f32;
        let descent = face.descender() as f32;
        let line_gap = face.line_gap() as f32;
        let bbox = face.global_bounding_box();
        let global_bbox = Rect::new(
            bbox.x_min as f32,
            bbox.y_min as f32,
            (bbox.x_max - bbox.x_min) as f32,
            (bbox.y_max - bbox.y_min) as f32,
        );

        Ok(FontFace {
            data,
            index,
            units_per_em,
            ascent,
            descent,
            line_gap,
            global_bbox,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Reads a face from a font file.
    pub fn load(path: impl AsRef<std::path::Path>, index: u32) -> Result<Self, Error> {
        let data = std::fs::read(path)?;
        FontFace::from_data(data, index)
    }

    /// Returns the number of font units per em.
    #[inline]
    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    /// Returns face-wide metrics scaled to `size`.
    pub fn metrics(&self, size: f32) -> FaceMetrics {
        let scale = size / self.units_per_em;
        FaceMetrics {
            ascent: self.ascent * scale,
            descent: self.descent * scale,
            line_gap: self.line_gap * scale,
            extents: scale_rect(self.global_bbox, scale),
        }
    }

    /// Returns the metrics of a single codepoint scaled to `size`.
    ///
    /// Returns `None` when the face has no glyph for the codepoint.
    pub fn glyph_metrics(&self, c: char, size: f32) -> Option<GlyphMetrics> {
        let scale = size / self.units_per_em;
        self.with_glyph(c, |glyph| GlyphMetrics {
            advance: glyph.advance * scale,
            left_side_bearing: glyph.left_side_bearing * scale,
            extents: scale_rect(glyph.bbox, scale),
        })
    }

    /// Appends the outline of a codepoint to `path`.
    ///
    /// The glyph baseline origin is placed at `(x, y)` and the outline
    /// is scaled to `size` pixels per em, y pointing down.
    /// Returns the scaled advance width, zero for a missing glyph.
    pub fn append_glyph(&self, c: char, x: f32, y: f32, size: f32, path: &mut Path) -> f32 {
        let scale = size / self.units_per_em;
        let ts = Transform::new(scale, 0.0, 0.0, -scale, x, y);
        self.with_glyph(c, |glyph| {
            path.add_path(&glyph.path, Some(&ts));
            glyph.advance * scale
        })
        .unwrap_or(0.0)
    }

    /// Appends the outlines of a whole string, advancing between glyphs.
    ///
    /// Returns the total advance width.
    pub fn append_text(&self, text: &str, x: f32, y: f32, size: f32, path: &mut Path) -> f32 {
        let mut advance = 0.0;
        for c in text.chars() {
            advance += self.append_glyph(c, x + advance, y, size, path);
        }
        advance
    }

    /// Returns the bounding rect and the total advance of a string
    /// laid out at the origin.
    pub fn text_extents(&self, text: &str, size: f32) -> (Rect, f32) {
        let mut path = Path::new();
        let advance = self.append_text(text, 0.0, 0.0, size, &mut path);
        (path.extents().0, advance)
    }

    fn with_glyph<T>(&self, c: char, f: impl FnOnce(&Glyph) -> T) -> Option<T> {
        let mut cache = match self.cache.lock() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        let glyph = cache.entry(c).or_insert_with(|| self.load_glyph(c));
        glyph.as_ref().map(f)
    }

    fn load_glyph(&self, c: char) -> Option<Glyph> {
        let face = ttf_parser::Face::parse(&self.data, self.index).ok()?;
        let id = face.glyph_index(c)?;

        let mut builder = GlyphPathBuilder { path: Path::new() };
        let bbox = face.outline_glyph(id, &mut builder).map(|b| {
            Rect::new(
                b.x_min as f32,
                b.y_min as f32,
                (b.x_max - b.x_min) as f32,
                (b.y_max - b.y_min) as f32,
            )
        });

        Some(Glyph {
            path: builder.path,
            advance: face.glyph_hor_advance(id).unwrap_or(0) as f32,
            left_side_bearing: face.glyph_hor_side_bearing(id).unwrap_or(0) as f32,
            // Empty glyphs, like a space, have no outline.
            bbox: bbox.unwrap_or_default(),
        })
    }
}

fn scale_rect(r: Rect, scale: f32) -> Rect {
    Rect::new(r.x * scale, r.y * scale, r.w * scale, r.h * scale)
}

struct GlyphPathBuilder {
    path: Path,
}

impl ttf_parser::OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.path.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.path.close();
    }
}

/// Returns an iterator over the codepoints of an encoded byte string.
///
/// Invalid sequences yield `U+FFFD`.
pub fn codepoints(data: &[u8], encoding: TextEncoding) -> Codepoints {
    Codepoints {
        data,
        encoding,
        pos: 0,
    }
}

/// An iterator over the codepoints of an encoded byte string.
#[derive(Clone, Debug)]
pub struct Codepoints<'a> {
    data: &'a [u8],
    encoding: TextEncoding,
    pos: usize,
}

impl Iterator for Codepoints<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.pos >= self.data.len() {
            return None;
        }

        match self.encoding {
            TextEncoding::Latin1 => {
                let b = self.data[self.pos];
                self.pos += 1;
                Some(char::from(b))
            }
            TextEncoding::Utf8 => {
                let b = self.data[self.pos];
                let len = match b {
                    0x00..=0x7f => 1,
                    0xc0..=0xdf => 2,
                    0xe0..=0xef => 3,
                    0xf0..=0xf7 => 4,
                    _ => 1,
                };
                let end = (self.pos + len).min(self.data.len());
                match std::str::from_utf8(&self.data[self.pos..end]) {
                    Ok(s) => {
                        self.pos = end;
                        s.chars().next().or(Some(char::REPLACEMENT_CHARACTER))
                    }
                    Err(_) => {
                        self.pos += 1;
                        Some(char::REPLACEMENT_CHARACTER)
                    }
                }
            }
            TextEncoding::Utf16 => {
                let unit = self.read_u16()?;
                if (0xd800..0xdc00).contains(&unit) {
                    let start = self.pos;
                    match self.read_u16() {
                        Some(low) if (0xdc00..0xe000).contains(&low) => {
                            let c = 0x10000
                                + ((unit as u32 - 0xd800) << 10)
                                + (low as u32 - 0xdc00);
                            Some(char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER))
                        }
                        _ => {
                            self.pos = start;
                            Some(char::REPLACEMENT_CHARACTER)
                        }
                    }
                } else {
                    Some(char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER))
                }
            }
            TextEncoding::Utf32 => {
                if self.pos + 4 > self.data.len() {
                    self.pos = self.data.len();
                    return Some(char::REPLACEMENT_CHARACTER);
                }
                let c = u32::from_le_bytes([
                    self.data[self.pos],
                    self.data[self.pos + 1],
                    self.data[self.pos + 2],
                    self.data[self.pos + 3],
                ]);
                self.pos += 4;
                Some(char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
        }
    }
}

impl Codepoints<'_> {
    fn read_u16(&mut self) -> Option<u16> {
        if self.pos + 2 > self.data.len() {
            self.pos = self.data.len();
            return None;
        }
        let v = u16::from_le_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_font_data() {
        assert!(FontFace::from_data(vec![0, 1, 2, 3], 0).is_err());
    }

    #[test]
    fn utf8_codepoints() {
        let out: Vec<char> = codepoints("aé€".as_bytes(), TextEncoding::Utf8).collect();
        assert_eq!(out, vec!['a', 'é', '€']);

        let out: Vec<char> = codepoints(&[0x61, 0xff, 0x62], TextEncoding::Utf8).collect();
        assert_eq!(out, vec!['a', char::REPLACEMENT_CHARACTER, 'b']);
    }

    #[test]
    fn utf16_codepoints() {
        // "a𝄞" with a surrogate pair.
        let data = [0x61, 0x00, 0x34, 0xd8, 0x1e, 0xdd];
        let out: Vec<char> = codepoints(&data, TextEncoding::Utf16).collect();
        assert_eq!(out, vec!['a', '𝄞']);
    }

    #[test]
    fn utf32_codepoints() {
        let data = [0x41, 0x00, 0x00, 0x00, 0xac, 0x20, 0x00, 0x00];
        let out: Vec<char> = codepoints(&data, TextEncoding::Utf32).collect();
        assert_eq!(out, vec!['A', '€']);
    }

    #[test]
    fn latin1_codepoints() {
        let out: Vec<char> = codepoints(&[0x41, 0xe9], TextEncoding::Latin1).collect();
        assert_eq!(out, vec!['A', 'é']);
    }
}
