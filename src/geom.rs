// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use float_cmp::ApproxEqUlps;

/// A trait for fuzzy/approximate equality comparisons of float numbers.
pub trait FuzzyEq<Rhs: ?Sized = Self> {
    /// Returns `true` if values are approximately equal.
    fn fuzzy_eq(&self, other: &Rhs) -> bool;

    /// Returns `true` if values are not approximately equal.
    #[inline]
    fn fuzzy_ne(&self, other: &Rhs) -> bool {
        !self.fuzzy_eq(other)
    }
}

/// A trait for fuzzy/approximate comparisons of float numbers.
pub trait FuzzyZero: FuzzyEq {
    /// Returns `true` if the number is approximately zero.
    fn is_fuzzy_zero(&self) -> bool;
}

impl FuzzyEq for f32 {
    #[inline]
    fn fuzzy_eq(&self, other: &f32) -> bool {
        self.approx_eq_ulps(other, 4)
    }
}

impl FuzzyZero for f32 {
    #[inline]
    fn is_fuzzy_zero(&self) -> bool {
        self.fuzzy_eq(&0.0)
    }
}

/// A 2D point.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Returns the distance to `other`.
    #[inline]
    pub fn distance_to(&self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl FuzzyEq for Point {
    #[inline]
    fn fuzzy_eq(&self, other: &Self) -> bool {
        self.x.fuzzy_eq(&other.x) && self.y.fuzzy_eq(&other.y)
    }
}

/// A rect.
///
/// Unlike most geometry libraries, a rect with a non-positive width or height
/// is representable and treated as empty.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Creates a new rect.
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Checks that the rect is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Returns the left edge.
    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Returns the top edge.
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Returns the right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Returns the bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Expands the rect on all sides by `delta`.
    #[inline]
    pub fn inflate(&self, delta: f32) -> Rect {
        Rect::new(
            self.x - delta,
            self.y - delta,
            self.w + delta * 2.0,
            self.h + delta * 2.0,
        )
    }
}

impl FuzzyEq for Rect {
    #[inline]
    fn fuzzy_eq(&self, other: &Self) -> bool {
        self.x.fuzzy_eq(&other.x)
            && self.y.fuzzy_eq(&other.y)
            && self.w.fuzzy_eq(&other.w)
            && self.h.fuzzy_eq(&other.h)
    }
}

/// A pixel-aligned rect.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    /// Creates a new rect.
    #[inline]
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        IntRect { x, y, w, h }
    }

    /// Checks that the rect is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Returns the left edge.
    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    /// Returns the top edge.
    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Returns the right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Returns the bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Intersects two rects.
    ///
    /// The result of intersecting with an empty rect is empty.
    pub fn intersect(&self, other: &IntRect) -> IntRect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        IntRect::new(x, y, right - x, bottom - y)
    }

    /// Converts into a float rect.
    #[inline]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }
}
