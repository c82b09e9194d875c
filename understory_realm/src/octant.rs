// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octant selection for octree splits.

use crate::types::{Aabb3D, Point3};

bitflags::bitflags! {
    /// One of the eight children of a split node.
    ///
    /// Each bit selects the upper half of an axis, so the raw bits double as the
    /// child index: `(x >= mid.x) + 2 * (y >= mid.y) + 4 * (z >= mid.z)`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Octant: u8 {
        /// Upper half along x.
        const UPPER_X = 0b001;
        /// Upper half along y.
        const UPPER_Y = 0b010;
        /// Upper half along z.
        const UPPER_Z = 0b100;
    }
}

impl Octant {
    /// Number of octants per split.
    pub const COUNT: usize = 8;

    /// The octant with the given child index. Bits above the low three are ignored.
    pub const fn from_index(index: usize) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Masked to three bits before narrowing."
        )]
        let bits = (index & 0b111) as u8;
        Self::from_bits_truncate(bits)
    }

    /// Child index of this octant, in `0..8`.
    pub const fn index(self) -> usize {
        self.bits() as usize
    }

    /// The octant of a node split at `mid` that holds `p`.
    pub fn of_point(mid: Point3, p: Point3) -> Self {
        let mut o = Self::empty();
        o.set(Self::UPPER_X, p[0] >= mid[0]);
        o.set(Self::UPPER_Y, p[1] >= mid[1]);
        o.set(Self::UPPER_Z, p[2] >= mid[2]);
        o
    }

    /// The octant of a node split at `mid` that holds all of `region`, or `None`
    /// when the region straddles a split plane.
    ///
    /// `region` must be non-empty.
    pub fn of_region(mid: Point3, region: &Aabb3D) -> Option<Self> {
        let mut o = Self::empty();
        for (axis, flag) in [Self::UPPER_X, Self::UPPER_Y, Self::UPPER_Z]
            .into_iter()
            .enumerate()
        {
            if region.min()[axis] >= mid[axis] {
                o |= flag;
            } else if region.max()[axis] > mid[axis] {
                return None;
            }
        }
        Some(o)
    }

    /// Bounds of this octant within `parent` split at `mid`.
    ///
    /// The eight octants of a parent partition it exactly: lower halves are
    /// `[min, mid)` and upper halves `[mid, max)`.
    pub fn child_bounds(self, parent: &Aabb3D, mid: Point3) -> Aabb3D {
        let mut min = parent.min();
        let mut max = parent.max();
        for (axis, flag) in [Self::UPPER_X, Self::UPPER_Y, Self::UPPER_Z]
            .into_iter()
            .enumerate()
        {
            if self.contains(flag) {
                min[axis] = mid[axis];
            } else {
                max[axis] = mid[axis];
            }
        }
        Aabb3D::from_corners(min, max)
    }
}
