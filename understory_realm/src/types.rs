// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

/// A position in 3D space: `[x, y, z]`.
pub type Point3 = [f32; 3];

/// Axis-aligned box in 3D with half-open extents.
///
/// A point `p` is inside when `min <= p < max` holds on every axis. Tree nodes and
/// query boxes share this convention, so a vertex lying exactly on a query's upper
/// face is not reported for that query. Use [`Aabb3D::from_closed`] when the upper
/// face should be included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D {
    /// Minimum x (inclusive)
    pub min_x: f32,
    /// Minimum y (inclusive)
    pub min_y: f32,
    /// Minimum z (inclusive)
    pub min_z: f32,
    /// Maximum x (exclusive)
    pub max_x: f32,
    /// Maximum y (exclusive)
    pub max_y: f32,
    /// Maximum z (exclusive)
    pub max_z: f32,
}

impl Aabb3D {
    /// Create a new box from min/max coordinates.
    pub const fn new(min_x: f32, min_y: f32, min_z: f32, max_x: f32, max_y: f32, max_z: f32) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Create a box from its inclusive minimum and exclusive maximum corners.
    pub const fn from_corners(min: Point3, max: Point3) -> Self {
        Self::new(min[0], min[1], min[2], max[0], max[1], max[2])
    }

    /// Create a box covering the closed ranges `[min, max]` on every axis.
    ///
    /// Each maximum is widened by one representable step so that points lying on
    /// the maximum face are inside.
    pub fn from_closed(min: Point3, max: Point3) -> Self {
        Self::from_corners(min, max.map(f32::next_up))
    }

    /// The smallest non-empty box containing `p`.
    pub fn around_point(p: Point3) -> Self {
        Self::from_closed(p, p)
    }

    /// Tight closed bounds of a set of points, or `None` for an empty set.
    pub fn bounding(points: impl IntoIterator<Item = Point3>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1]), lo[2].min(p[2])],
                [hi[0].max(p[0]), hi[1].max(p[1]), hi[2].max(p[2])],
            )
        });
        Some(Self::from_closed(min, max))
    }

    /// The inclusive minimum corner.
    pub const fn min(&self) -> Point3 {
        [self.min_x, self.min_y, self.min_z]
    }

    /// The exclusive maximum corner.
    pub const fn max(&self) -> Point3 {
        [self.max_x, self.max_y, self.max_z]
    }

    /// Whether this box contains the point (half-open on every axis).
    pub fn contains_point(&self, p: Point3) -> bool {
        self.min_x <= p[0]
            && p[0] < self.max_x
            && self.min_y <= p[1]
            && p[1] < self.max_y
            && self.min_z <= p[2]
            && p[2] < self.max_z
    }

    /// Whether the two boxes share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
            && self.min_z < other.max_z
            && other.min_z < self.max_z
    }

    /// The intersection of two boxes. May be empty.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            min_z: self.min_z.max(other.min_z),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
            max_z: self.max_z.min(other.max_z),
        }
    }

    /// Return true if the box holds no points. Boxes with NaN extents are empty.
    pub fn is_empty(&self) -> bool {
        !(self.min_x < self.max_x && self.min_y < self.max_y && self.min_z < self.max_z)
    }

    /// Per-axis midpoint, used as the split plane of an octree node.
    ///
    /// Always lies within `[min, max]`, so both halves of a split are well formed.
    pub fn midpoint(&self) -> Point3 {
        [
            mid(self.min_x, self.max_x),
            mid(self.min_y, self.max_y),
            mid(self.min_z, self.max_z),
        ]
    }
}

// Halving each end first avoids overflow for coordinates near f32::MAX. A root
// holding a vertex at f32::MAX has an infinite upper bound; split that axis as if
// it ended at f32::MAX.
fn mid(lo: f32, hi: f32) -> f32 {
    (lo * 0.5 + hi.min(f32::MAX) * 0.5).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_containment() {
        let b = Aabb3D::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert!(b.contains_point([0.0, 0.0, 0.0]));
        assert!(b.contains_point([9.99, 5.0, 5.0]));
        assert!(!b.contains_point([10.0, 5.0, 5.0]));
        assert!(!b.contains_point([5.0, 5.0, -0.01]));
    }

    #[test]
    fn closed_box_includes_upper_face() {
        let b = Aabb3D::from_closed([0.0; 3], [10.0; 3]);
        assert!(b.contains_point([10.0, 10.0, 10.0]));
        assert!(!b.contains_point([10.001, 10.0, 10.0]));
    }

    #[test]
    fn around_point_holds_only_that_point_on_the_grid() {
        let p = [1.5, -2.0, 3.25];
        let b = Aabb3D::around_point(p);
        assert!(!b.is_empty());
        assert!(b.contains_point(p));
        assert!(!b.contains_point([1.5, -2.0, 3.25f32.next_up()]));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let b = Aabb3D::new(1.0, 0.0, 0.0, 2.0, 1.0, 1.0);
        assert!(!a.intersects(&b));
        assert!(a.intersect(&b).is_empty());
        let c = Aabb3D::new(0.5, 0.5, 0.5, 2.0, 2.0, 2.0);
        assert!(a.intersects(&c));
        assert_eq!(a.intersect(&c), Aabb3D::new(0.5, 0.5, 0.5, 1.0, 1.0, 1.0));
    }

    #[test]
    fn bounding_is_closed_and_tight() {
        let b = Aabb3D::bounding([[1.0, 2.0, 3.0], [-1.0, 5.0, 0.0]]).unwrap();
        assert_eq!(b.min(), [-1.0, 2.0, 0.0]);
        assert!(b.contains_point([1.0, 5.0, 3.0]));
        assert_eq!(b.max(), [1.0f32.next_up(), 5.0f32.next_up(), 3.0f32.next_up()]);
        assert!(Aabb3D::bounding([]).is_none());
    }

    #[test]
    fn midpoint_of_unbounded_axis_is_finite() {
        let b = Aabb3D::from_closed([0.0; 3], [f32::MAX, 1.0, 1.0]);
        assert_eq!(b.max_x, f32::INFINITY);
        let m = b.midpoint();
        assert!(m[0].is_finite());
        assert!(m[0] > 0.0 && m[0] < f32::MAX);
    }

    #[test]
    fn midpoint_stays_inside_degenerate_extent() {
        let b = Aabb3D::from_closed([3.0; 3], [3.0; 3]);
        for (m, (lo, hi)) in b.midpoint().into_iter().zip(b.min().into_iter().zip(b.max())) {
            assert!(lo <= m && m <= hi, "midpoint {m} escaped [{lo}, {hi}]");
        }
    }
}
