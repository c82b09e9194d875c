// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena nodes of a realm tree.

use alloc::vec::Vec;

use crate::types::{Aabb3D, Point3};

/// Maximum number of vertices a leaf holds before it splits.
pub const LEAF_CAPACITY: usize = 8;

/// Bits of a cursor position that address a slot within a leaf.
pub(crate) const SLOT_BITS: u32 = 32;

/// Deepest level at which a leaf may sit; the root is level 0.
///
/// A cursor position packs a slot index into its low [`SLOT_BITS`] and, above
/// them, a sentinel bit followed by three bits per level below the anchor. The
/// depth bound keeps that path inside the remaining bits. Leaves at this depth
/// grow instead of splitting.
pub const MAX_DEPTH: u8 = {
    let levels = (u64::BITS - SLOT_BITS - 1) / 3;
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Ten levels; fits u8 trivially."
    )]
    let levels = levels as u8;
    levels
};

/// Handle of a node in a [`RealmTree`](crate::RealmTree).
///
/// Valid for the lifetime of the tree that produced it. Ids from one tree mean
/// nothing to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: Self = Self(0);

    pub(crate) const fn new(idx: usize) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Node counts are bounded by vertex count, which is checked against u32."
        )]
        let idx = idx as u32;
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// The raw arena index.
    pub const fn get(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    Leaf(Vec<u32>),
    Internal { mid: Point3, children: [NodeId; 8] },
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) bounds: Aabb3D,
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: u8,
    pub(crate) kind: NodeKind,
    /// Number of faces hosted here.
    pub(crate) hosted_len: u32,
    /// First face of the hosted list; the rest hang off the tree's `face_next`.
    pub(crate) hosted_head: Option<u32>,
}

impl Node {
    pub(crate) fn leaf(bounds: Aabb3D, parent: Option<NodeId>, depth: u8) -> Self {
        Self {
            bounds,
            parent,
            depth,
            kind: NodeKind::Leaf(Vec::with_capacity(LEAF_CAPACITY)),
            hosted_len: 0,
            hosted_head: None,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub(crate) fn vertices(&self) -> &[u32] {
        match &self.kind {
            NodeKind::Leaf(vnos) => vnos.as_slice(),
            NodeKind::Internal { .. } => &[],
        }
    }

    pub(crate) fn children(&self) -> Option<&[NodeId; 8]> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal { children, .. } => Some(children),
        }
    }
}
