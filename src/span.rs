// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::IntRect;

/// A horizontal pixel run with a single coverage value.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Span {
    pub x: i32,
    pub len: i32,
    pub y: i32,
    pub coverage: u8,
}

/// A sorted list of non-overlapping spans.
///
/// Spans are ordered by `(y, x)`. Adjacent spans with equal coverage
/// are coalesced on insertion.
#[derive(Clone, Default, Debug)]
pub struct SpanBuffer {
    spans: Vec<Span>,
}

impl SpanBuffer {
    /// Creates a new empty buffer.
    #[inline]
    pub fn new() -> Self {
        SpanBuffer::default()
    }

    /// Returns `true` if the buffer contains no spans.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the spans.
    #[inline]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Clears the buffer, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.spans.clear();
    }

    /// Replaces the content with a copy of `source`, reusing the allocation.
    pub fn copy_from(&mut self, source: &SpanBuffer) {
        self.spans.clear();
        self.spans.extend_from_slice(&source.spans);
    }

    /// Appends a span, merging it with the previous one when possible.
    ///
    /// Spans must be pushed in `(y, x)` order.
    pub(crate) fn push(&mut self, y: i32, x: i32, len: i32, coverage: u8) {
        if len <= 0 || coverage == 0 {
            return;
        }

        if let Some(last) = self.spans.last_mut() {
            if last.y == y && last.coverage == coverage && last.x + last.len == x {
                last.len += len;
                return;
            }
        }

        self.spans.push(Span { x, len, y, coverage });
    }

    /// Returns the bounding rect of all spans.
    ///
    /// Returns an empty rect for an empty buffer.
    pub fn extents(&self) -> IntRect {
        if self.spans.is_empty() {
            return IntRect::default();
        }

        let y1 = self.spans[0].y;
        let y2 = self.spans[self.spans.len() - 1].y;
        let mut x1 = i32::MAX;
        let mut x2 = i32::MIN;
        for span in &self.spans {
            x1 = x1.min(span.x);
            x2 = x2.max(span.x + span.len);
        }

        IntRect::new(x1, y1, x2 - x1, y2 - y1 + 1)
    }

    /// Fills the buffer with a fully covered rect.
    pub fn add_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        if w <= 0 || h <= 0 {
            return;
        }

        self.spans.reserve(h as usize);
        for row in y..y + h {
            self.push(row, x, w, 255);
        }
    }

    /// Replaces the content with the intersection of `a` and `b`.
    ///
    /// The coverage of an output span is `(covA * covB + 127) / 255`.
    pub fn intersect(&mut self, a: &SpanBuffer, b: &SpanBuffer) {
        self.spans.clear();

        let mut ai = a.spans.iter().peekable();
        let mut bi = b.spans.iter().peekable();
        while let (Some(&sa), Some(&sb)) = (ai.peek(), bi.peek()) {
            if sa.y != sb.y {
                if sa.y < sb.y {
                    ai.next();
                } else {
                    bi.next();
                }
                continue;
            }

            let x1 = sa.x.max(sb.x);
            let x2 = (sa.x + sa.len).min(sb.x + sb.len);
            if x1 < x2 {
                let coverage =
                    ((sa.coverage as u32 * sb.coverage as u32 + 127) / 255) as u8;
                self.push(sa.y, x1, x2 - x1, coverage);
            }

            // Advance the span that ends first.
            if sa.x + sa.len <= sb.x + sb.len {
                ai.next();
            } else {
                bi.next();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(spans: &[(i32, i32, i32, u8)]) -> SpanBuffer {
        let mut buf = SpanBuffer::new();
        for &(y, x, len, coverage) in spans {
            buf.push(y, x, len, coverage);
        }
        buf
    }

    #[test]
    fn push_coalesces_equal_neighbors() {
        let buf = buffer(&[(0, 0, 2, 255), (0, 2, 3, 255), (0, 5, 1, 128)]);
        assert_eq!(
            buf.spans(),
            &[
                Span { x: 0, len: 5, y: 0, coverage: 255 },
                Span { x: 5, len: 1, y: 0, coverage: 128 },
            ]
        );
    }

    #[test]
    fn add_rect_fills_rows() {
        let mut buf = SpanBuffer::new();
        buf.add_rect(1, 2, 3, 2);
        assert_eq!(
            buf.spans(),
            &[
                Span { x: 1, len: 3, y: 2, coverage: 255 },
                Span { x: 1, len: 3, y: 3, coverage: 255 },
            ]
        );
        assert_eq!(buf.extents(), IntRect::new(1, 2, 3, 2));
    }

    #[test]
    fn intersect_overlapping_rows() {
        let a = buffer(&[(0, 0, 10, 255), (1, 0, 4, 255)]);
        let b = buffer(&[(0, 5, 10, 255), (2, 0, 4, 255)]);

        let mut out = SpanBuffer::new();
        out.intersect(&a, &b);
        assert_eq!(out.spans(), &[Span { x: 5, len: 5, y: 0, coverage: 255 }]);
    }

    #[test]
    fn intersect_multiplies_coverage() {
        let a = buffer(&[(0, 0, 4, 128)]);
        let b = buffer(&[(0, 2, 4, 128)]);

        let mut out = SpanBuffer::new();
        out.intersect(&a, &b);
        assert_eq!(out.spans(), &[Span { x: 2, len: 2, y: 0, coverage: 64 }]);
    }

    #[test]
    fn intersect_walks_multiple_spans_per_row() {
        let a = buffer(&[(0, 0, 2, 255), (0, 4, 2, 255)]);
        let b = buffer(&[(0, 0, 6, 255)]);

        let mut out = SpanBuffer::new();
        out.intersect(&a, &b);
        assert_eq!(
            out.spans(),
            &[
                Span { x: 0, len: 2, y: 0, coverage: 255 },
                Span { x: 4, len: 2, y: 0, coverage: 255 },
            ]
        );
    }
}
