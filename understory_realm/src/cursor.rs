// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy, allocation-free enumeration of the vertices a realm might touch.

use core::iter::FusedIterator;

use crate::node::{NodeId, SLOT_BITS};
use crate::realm::Realm;

const SLOT_MASK: u64 = (1 << SLOT_BITS) - 1;

/// Path of the anchor itself: just the sentinel bit.
const ANCHOR_PATH: u64 = 1;

/// Resumable position of a depth-first walk over a realm's vertices.
///
/// Two words: the current leaf, and a packed position holding the slot within
/// that leaf in its low bits and the path from the anchor to the leaf above them,
/// three bits (one octant) per level behind a sentinel bit. The cursor owns no
/// memory and is only meaningful with the realm that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RealmCursor {
    position: u64,
    leaf: Option<NodeId>,
}

impl RealmCursor {
    /// A cursor that yields nothing.
    pub const EXHAUSTED: Self = Self {
        position: 0,
        leaf: None,
    };

    /// Whether the walk has finished.
    pub const fn is_exhausted(&self) -> bool {
        self.leaf.is_none()
    }

    const fn at(path: u64, leaf: NodeId) -> Self {
        Self {
            position: path << SLOT_BITS,
            leaf: Some(leaf),
        }
    }

    const fn path(&self) -> u64 {
        self.position >> SLOT_BITS
    }

    const fn slot(&self) -> usize {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Slots index leaf vectors, so they fit usize."
        )]
        let slot = (self.position & SLOT_MASK) as usize;
        slot
    }
}

impl<'t> Realm<'t> {
    /// A cursor at the first vertex of this realm.
    ///
    /// Leaves are visited depth-first in octant order starting from the anchor.
    /// Subtrees whose boxes miss the query box and empty leaves are skipped, so the
    /// walk yields exactly the vertices for which
    /// [`might_touch_vertex`](Realm::might_touch_vertex) holds, each once.
    pub fn cursor(&self) -> RealmCursor {
        let Some(anchor) = self.anchor() else {
            return RealmCursor::EXHAUSTED;
        };
        self.first_leaf(anchor, ANCHOR_PATH)
            .map_or(RealmCursor::EXHAUSTED, |(leaf, path)| RealmCursor::at(path, leaf))
    }

    /// Yield the vertex under `cursor` and advance it, or `None` once exhausted.
    pub fn next_vertex(&self, cursor: &mut RealmCursor) -> Option<u32> {
        let leaf = cursor.leaf?;
        let vnos = self.tree().leaf_vertices(leaf);
        let slot = cursor.slot();
        let Some(&vno) = vnos.get(slot) else {
            *cursor = RealmCursor::EXHAUSTED;
            return None;
        };
        if slot + 1 < vnos.len() {
            cursor.position += 1;
        } else {
            *cursor = self.after_leaf(leaf, cursor.path());
        }
        Some(vno)
    }

    /// Iterate the vertices of this realm.
    pub fn vertices(&self) -> Vertices<'t> {
        Vertices {
            realm: *self,
            cursor: self.cursor(),
        }
    }

    /// First non-empty leaf at or below `id` whose box intersects the query box.
    fn first_leaf(&self, id: NodeId, path: u64) -> Option<(NodeId, u64)> {
        let node = self.tree().node(id);
        if !node.bounds.intersects(&self.bounds()) {
            return None;
        }
        match node.children() {
            None => (!node.vertices().is_empty()).then_some((id, path)),
            Some(children) => self.first_leaf_among(children, 0, path),
        }
    }

    fn first_leaf_among(&self, children: &[NodeId; 8], from: usize, path: u64) -> Option<(NodeId, u64)> {
        children
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(c, &child)| self.first_leaf(child, (path << 3) | c as u64))
    }

    /// Cursor at the first qualifying leaf after `leaf` in walk order.
    fn after_leaf(&self, leaf: NodeId, mut path: u64) -> RealmCursor {
        let mut id = leaf;
        while path > ANCHOR_PATH {
            #[allow(clippy::cast_possible_truncation, reason = "Three bits.")]
            let c = (path & 0b111) as usize;
            path >>= 3;
            let Some(parent) = self.tree().node(id).parent else {
                break;
            };
            id = parent;
            if let Some(children) = self.tree().node(id).children()
                && let Some((next, next_path)) = self.first_leaf_among(children, c + 1, path)
            {
                return RealmCursor::at(next_path, next);
            }
        }
        RealmCursor::EXHAUSTED
    }
}

/// Iterator over a realm's vertices. Created by [`Realm::vertices`].
#[derive(Clone, Debug)]
pub struct Vertices<'t> {
    realm: Realm<'t>,
    cursor: RealmCursor,
}

impl Vertices<'_> {
    /// The position of the next vertex, for resuming with [`Realm::next_vertex`].
    pub fn cursor(&self) -> RealmCursor {
        self.cursor
    }
}

impl Iterator for Vertices<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.realm.next_vertex(&mut self.cursor)
    }
}

impl FusedIterator for Vertices<'_> {}
