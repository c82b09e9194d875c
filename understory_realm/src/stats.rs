// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape statistics for a realm tree.

use crate::node::MAX_DEPTH;

/// Counts describing the shape of a [`RealmTree`](crate::RealmTree).
///
/// Returned by [`RealmTree::stats`](crate::RealmTree::stats). Useful for tuning and
/// for spotting degenerate input, such as many coincident vertices piling up in
/// one deep leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total nodes, internal and leaf.
    pub nodes: usize,
    /// Leaf nodes.
    pub leaves: usize,
    /// Leaves holding no vertices.
    pub empty_leaves: usize,
    /// Depth of the deepest leaf.
    pub max_depth: u8,
    /// Vertex count of the fullest leaf.
    pub largest_leaf: usize,
    /// Indexed vertices.
    pub vertices: usize,
    /// Hosted faces.
    pub faces: usize,
    /// Faces hosted at each depth.
    pub hosted_by_depth: [usize; MAX_DEPTH as usize + 1],
}
