// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Realms: box-scoped queries against a [`RealmTree`].
//!
//! A realm is anchored at the deepest node whose box contains the part of the query
//! box that lies inside the tree. Everything a realm reports is drawn from that
//! anchor's subtree (vertices) or from the anchor's subtree plus its ancestors
//! (faces). Answers are conservative: a realm may report an element that turns out
//! not to touch the box, but never misses one that does.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::RealmError;
use crate::node::{NodeId, NodeKind};
use crate::octant::Octant;
use crate::tree::RealmTree;
use crate::types::Aabb3D;

impl RealmTree {
    /// Create a realm for `bounds`.
    ///
    /// Query boxes are half-open like node boxes. A box that misses the tree, or
    /// that is empty, yields a realm with no anchor, which reports nothing.
    pub fn realm(&self, bounds: Aabb3D) -> Realm<'_> {
        Realm::new(self, bounds)
    }

    /// Deepest node whose box contains `query` clipped to the root.
    fn anchor_for(&self, query: &Aabb3D) -> Option<NodeId> {
        // Clipping would replace a NaN extent with the root's.
        if query.is_empty() {
            return None;
        }
        let root = self.nodes.first()?;
        let region = query.intersect(&root.bounds);
        if region.is_empty() {
            return None;
        }
        let mut id = NodeId::ROOT;
        while let NodeKind::Internal { mid, children } = &self.node(id).kind {
            match Octant::of_region(*mid, &region) {
                Some(octant) => id = children[octant.index()],
                None => break,
            }
        }
        Some(id)
    }
}

/// A box-scoped view of a [`RealmTree`].
///
/// Cheap to create and to copy; holds the query box and its anchor node.
#[derive(Clone, Copy, Debug)]
pub struct Realm<'t> {
    tree: &'t RealmTree,
    bounds: Aabb3D,
    anchor: Option<NodeId>,
}

impl<'t> Realm<'t> {
    /// Create a realm for `bounds` over `tree`. Same as [`RealmTree::realm`].
    pub fn new(tree: &'t RealmTree, bounds: Aabb3D) -> Self {
        Self {
            tree,
            bounds,
            anchor: tree.anchor_for(&bounds),
        }
    }

    /// The tree this realm queries.
    pub fn tree(&self) -> &'t RealmTree {
        self.tree
    }

    /// The query box.
    pub fn bounds(&self) -> Aabb3D {
        self.bounds
    }

    /// The anchor node, or `None` when the query box misses the tree.
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Whether this realm can report nothing at all.
    pub fn is_empty(&self) -> bool {
        self.anchor.is_none()
    }

    /// Whether vertex `vno` might lie inside the query box.
    ///
    /// True exactly when the vertex's leaf is in the anchor's subtree and the leaf's
    /// box intersects the query box. Every vertex inside the box passes; vertices
    /// sharing a leaf with one may pass too.
    pub fn might_touch_vertex(&self, vno: u32) -> bool {
        let (Some(anchor), Some(leaf)) = (self.anchor, self.tree.vertex_leaf(vno)) else {
            return false;
        };
        self.tree.node(leaf).bounds.intersects(&self.bounds) && self.tree.is_ancestor_or_self(anchor, leaf)
    }

    /// Whether face `fno` is among this realm's candidate faces.
    ///
    /// Agrees with [`Realm::candidate_faces`]: true when the face's host is the
    /// anchor, one of its ancestors, or one of its descendants.
    pub fn might_touch_face(&self, fno: u32) -> bool {
        let (Some(anchor), Some(host)) = (self.anchor, self.tree.face_host(fno)) else {
            return false;
        };
        self.tree.is_ancestor_or_self(host, anchor) || self.tree.is_ancestor_or_self(anchor, host)
    }

    /// Number of candidate faces. Equals what [`Realm::list_candidate_faces`] writes.
    pub fn count_candidate_faces(&self) -> usize {
        let mut count = 0;
        self.for_each_candidate_node(|id| count += self.tree.node(id).hosted_len as usize);
        count
    }

    /// Write every candidate face into `out` and return how many were written.
    ///
    /// Faces hosted at the anchor's strict ancestors come first, nearest ancestor
    /// first, followed by faces hosted in the anchor's subtree in depth-first order.
    /// Each face appears once. When `out` is shorter than
    /// [`Realm::count_candidate_faces`], nothing is written and
    /// [`RealmError::BufferTooSmall`] is returned.
    pub fn list_candidate_faces(&self, out: &mut [u32]) -> Result<usize, RealmError> {
        let needed = self.count_candidate_faces();
        if needed > out.len() {
            return Err(RealmError::BufferTooSmall {
                needed,
                capacity: out.len(),
            });
        }
        let mut written = 0;
        self.for_each_candidate_face(|fno| {
            out[written] = fno;
            written += 1;
        });
        debug_assert_eq!(written, needed, "candidate count and listing disagree");
        Ok(written)
    }

    /// Call `f` with every candidate face, in [`Realm::list_candidate_faces`] order.
    pub fn for_each_candidate_face(&self, mut f: impl FnMut(u32)) {
        self.for_each_candidate_node(|id| {
            for fno in self.tree.hosted_faces(id) {
                f(fno);
            }
        });
    }

    /// Collect the candidate faces into a new vector.
    pub fn candidate_faces(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.count_candidate_faces());
        self.for_each_candidate_face(|fno| out.push(fno));
        out
    }

    /// Visit strict ancestors of the anchor bottom-up, then the anchor's subtree
    /// depth-first in octant order.
    fn for_each_candidate_node(&self, mut f: impl FnMut(NodeId)) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let mut up = self.tree.node(anchor).parent;
        while let Some(id) = up {
            f(id);
            up = self.tree.node(id).parent;
        }

        let mut stack = vec![anchor];
        while let Some(id) = stack.pop() {
            f(id);
            if let Some(children) = self.tree.node(id).children() {
                stack.extend(children.iter().rev());
            }
        }
    }
}
