// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::{FuzzyEq, Point, Rect};

/// A 2D affine transform.
///
/// Maps a point as `(x', y') = (a*x + c*y + e, b*x + d*y + f)`.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Transform::identity()
    }
}

impl Transform {
    /// Creates a new transform.
    #[inline]
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Transform { a, b, c, d, e, f }
    }

    /// Creates an identity transform.
    #[inline]
    pub fn identity() -> Self {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Creates a translating transform.
    #[inline]
    pub fn from_translate(tx: f32, ty: f32) -> Self {
        Transform::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Creates a scaling transform.
    #[inline]
    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Creates a rotating transform. The angle is in radians.
    #[inline]
    pub fn from_rotate(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Transform::new(c, s, -s, c, 0.0, 0.0)
    }

    /// Creates a shearing transform. The angles are in radians.
    #[inline]
    pub fn from_shear(x: f32, y: f32) -> Self {
        Transform::new(1.0, y.tan(), x.tan(), 1.0, 0.0, 0.0)
    }

    /// Checks that the transform is the identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.fuzzy_eq(&Transform::identity())
    }

    /// Returns the combined transform that applies `other` first and `self` second.
    pub fn pre_concat(&self, other: &Transform) -> Transform {
        Transform::new(
            other.a * self.a + other.b * self.c,
            other.a * self.b + other.b * self.d,
            other.c * self.a + other.d * self.c,
            other.c * self.b + other.d * self.d,
            other.e * self.a + other.f * self.c + self.e,
            other.e * self.b + other.f * self.d + self.f,
        )
    }

    /// Returns the combined transform that applies `self` first and `other` second.
    #[inline]
    pub fn post_concat(&self, other: &Transform) -> Transform {
        other.pre_concat(self)
    }

    /// Returns the inverted transform.
    ///
    /// Returns `None` when the determinant `a*d - b*c` is zero.
    pub fn invert(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Transform::new(
            self.d * inv_det,
            -self.b * inv_det,
            -self.c * inv_det,
            self.a * inv_det,
            (self.c * self.f - self.d * self.e) * inv_det,
            (self.b * self.e - self.a * self.f) * inv_det,
        ))
    }

    /// Maps `(x, y)`.
    #[inline]
    pub fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Maps a point.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        let (x, y) = self.map(p.x, p.y);
        Point::new(x, y)
    }

    /// Maps a slice of points in place.
    pub fn map_points(&self, points: &mut [Point]) {
        for p in points {
            *p = self.map_point(*p);
        }
    }

    /// Maps a rect into the bounding rect of its transformed corners.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let mut points = [
            Point::new(rect.x, rect.y),
            Point::new(rect.x + rect.w, rect.y),
            Point::new(rect.x + rect.w, rect.y + rect.h),
            Point::new(rect.x, rect.y + rect.h),
        ];
        self.map_points(&mut points);

        let mut x1 = points[0].x;
        let mut y1 = points[0].y;
        let mut x2 = points[0].x;
        let mut y2 = points[0].y;
        for p in &points[1..] {
            x1 = x1.min(p.x);
            y1 = y1.min(p.y);
            x2 = x2.max(p.x);
            y2 = y2.max(p.y);
        }

        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }
}

impl FuzzyEq for Transform {
    fn fuzzy_eq(&self, other: &Self) -> bool {
        self.a.fuzzy_eq(&other.a)
            && self.b.fuzzy_eq(&other.b)
            && self.c.fuzzy_eq(&other.c)
            && self.d.fuzzy_eq(&other.d)
            && self.e.fuzzy_eq(&other.e)
            && self.f.fuzzy_eq(&other.f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(p: Point, x: f32, y: f32) {
        assert!((p.x - x).abs() < 1e-6, "{} != {}", p.x, x);
        assert!((p.y - y).abs() < 1e-6, "{} != {}", p.y, y);
    }

    #[test]
    fn rotate_quarter_turn() {
        let ts = Transform::from_rotate(std::f32::consts::FRAC_PI_2);
        assert_point_eq(ts.map_point(Point::new(1.0, 0.0)), 0.0, 1.0);
    }

    #[test]
    fn pre_concat_applies_other_first() {
        let scale = Transform::from_scale(2.0, 2.0);
        let translate = Transform::from_translate(10.0, 0.0);

        // Translate first, scale second.
        let ts = scale.pre_concat(&translate);
        assert_point_eq(ts.map_point(Point::new(1.0, 0.0)), 22.0, 0.0);

        // Scale first, translate second.
        let ts = scale.post_concat(&translate);
        assert_point_eq(ts.map_point(Point::new(1.0, 0.0)), 12.0, 0.0);
    }

    #[test]
    fn invert_round_trip() {
        let ts = Transform::from_rotate(0.7)
            .pre_concat(&Transform::from_scale(2.0, 3.0))
            .pre_concat(&Transform::from_translate(-4.0, 5.5));
        let inv = ts.invert().unwrap();
        let id = ts.pre_concat(&inv);
        assert!((id.a - 1.0).abs() < 1e-5);
        assert!(id.b.abs() < 1e-5);
        assert!(id.c.abs() < 1e-5);
        assert!((id.d - 1.0).abs() < 1e-5);
        assert!(id.e.abs() < 1e-4);
        assert!(id.f.abs() < 1e-4);
    }

    #[test]
    fn invert_degenerate() {
        assert!(Transform::from_scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn map_rect_rotated() {
        let ts = Transform::from_rotate(std::f32::consts::FRAC_PI_2);
        let r = ts.map_rect(&Rect::new(0.0, 0.0, 2.0, 1.0));
        assert!((r.x - -1.0).abs() < 1e-6);
        assert!((r.y - 0.0).abs() < 1e-6);
        assert!((r.w - 1.0).abs() < 1e-6);
        assert!((r.h - 2.0).abs() < 1e-6);
    }
}
