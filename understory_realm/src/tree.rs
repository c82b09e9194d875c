// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The realm tree: an octree over surface vertices, with each face hosted at the
//! deepest node that contains all three of its vertices.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::RealmError;
use crate::node::{LEAF_CAPACITY, MAX_DEPTH, Node, NodeId, NodeKind};
use crate::octant::Octant;
use crate::options::{BuildOptions, StalenessPolicy};
use crate::stats::TreeStats;
use crate::surface::Surface;
use crate::types::{Aabb3D, Point3};

/// Octree over the vertices of a surface snapshot.
///
/// Built once with [`RealmTree::build`]; queried through [`Realm`](crate::Realm)s
/// created by [`RealmTree::realm`]. The tree keeps only indices, so it goes stale
/// as soon as any indexed vertex moves. [`RealmTree::verify`] detects that by
/// comparing a fingerprint of the surface against the one taken at build time.
pub struct RealmTree {
    pub(crate) nodes: Vec<Node>,
    vertex_leaf: Vec<NodeId>,
    face_host: Vec<NodeId>,
    face_next: Vec<Option<u32>>,
    fingerprint: blake3::Hash,
    options: BuildOptions,
}

impl core::fmt::Debug for RealmTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let leaves = self.nodes.iter().filter(|n| n.is_leaf()).count();
        f.debug_struct("RealmTree")
            .field("nodes", &self.nodes.len())
            .field("leaves", &leaves)
            .field("vertices", &self.vertex_leaf.len())
            .field("faces", &self.face_host.len())
            .field("bounds", &self.bounds())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RealmTree {
    /// Build a tree over `surface` with default [`BuildOptions`].
    pub fn build<S: Surface + ?Sized>(surface: &S) -> Result<Self, RealmError> {
        Self::build_with(surface, BuildOptions::default())
    }

    /// Build a tree over `surface`.
    ///
    /// Vertices are inserted in index order, each starting from the leaf that took
    /// the previous one; consecutive vertices of a mesh tend to be close, so most
    /// insertions only climb a level or two. Faces are hosted afterwards.
    #[tracing::instrument(skip_all, name = "realm::build")]
    pub fn build_with<S: Surface + ?Sized>(
        surface: &S,
        options: BuildOptions,
    ) -> Result<Self, RealmError> {
        let vertex_count = checked_count(surface.vertex_count(), "vertices")?;
        let face_count = checked_count(surface.face_count(), "faces")?;

        let mut tree = Self {
            nodes: Vec::new(),
            vertex_leaf: Vec::new(),
            face_host: Vec::with_capacity(face_count),
            face_next: Vec::with_capacity(face_count),
            fingerprint: fingerprint(surface),
            options,
        };
        if let Some(bounds) = root_bounds(surface)? {
            tree.place_vertices(surface, bounds);
        }
        tree.host_faces(surface)?;

        if options.validate {
            tree.validate(surface)?;
        }
        if tracing::enabled!(tracing::Level::DEBUG) {
            let stats = tree.stats();
            tracing::debug!(
                vertices = vertex_count,
                faces = face_count,
                nodes = stats.nodes,
                leaves = stats.leaves,
                max_depth = stats.max_depth,
                "realm tree built"
            );
        }
        Ok(tree)
    }

    /// Check that `surface` still matches the data this tree was built from.
    ///
    /// A mismatch is handled according to [`BuildOptions::staleness`].
    #[tracing::instrument(skip_all, name = "realm::verify")]
    pub fn verify<S: Surface + ?Sized>(&self, surface: &S) -> Result<(), RealmError> {
        let found = fingerprint(surface);
        if found == self.fingerprint {
            return Ok(());
        }
        let expected = self.fingerprint;
        match self.options.staleness {
            StalenessPolicy::Error => Err(RealmError::Stale { expected, found }),
            StalenessPolicy::Warn => {
                tracing::warn!(%expected, %found, "surface changed since the realm tree was built");
                Ok(())
            }
            StalenessPolicy::Panic => panic!(
                "surface changed since the realm tree was built (fingerprint {found}, expected {expected})"
            ),
        }
    }

    /// Check every structural invariant of the tree against `surface`.
    ///
    /// This walks all nodes, vertices, and faces; it is meant for tests and debug
    /// builds (see [`BuildOptions::validate`]).
    #[tracing::instrument(skip_all, name = "realm::validate")]
    pub fn validate<S: Surface + ?Sized>(&self, surface: &S) -> Result<(), RealmError> {
        fn bad(what: &'static str, index: usize) -> Result<(), RealmError> {
            Err(RealmError::Inconsistent { what, index })
        }

        if self.vertex_leaf.len() != surface.vertex_count() {
            return bad("vertex table length differs from the surface", self.vertex_leaf.len());
        }
        if self.face_host.len() != surface.face_count() || self.face_next.len() != self.face_host.len() {
            return bad("face tables differ from the surface", self.face_host.len());
        }
        if self.nodes.is_empty() != (surface.vertex_count() == 0) {
            return bad("root presence does not match vertex count", self.nodes.len());
        }

        let mut listed_vertices = vec![false; self.vertex_leaf.len()];
        let mut listed_total = 0;
        let mut hosted_total = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let id = NodeId::new(i);
            match &node.kind {
                NodeKind::Internal { mid, children } => {
                    for (c, &child) in children.iter().enumerate() {
                        let Some(ch) = self.nodes.get(child.idx()) else {
                            return bad("child id out of range", i);
                        };
                        if ch.parent != Some(id) {
                            return bad("child does not point back at its parent", child.idx());
                        }
                        if ch.depth != node.depth + 1 {
                            return bad("child depth is not its parent's plus one", child.idx());
                        }
                        if ch.bounds != Octant::from_index(c).child_bounds(&node.bounds, *mid) {
                            return bad("child box is not its octant of the parent", child.idx());
                        }
                    }
                }
                NodeKind::Leaf(vnos) => {
                    if node.depth > MAX_DEPTH {
                        return bad("leaf below the depth limit", i);
                    }
                    if vnos.len() > LEAF_CAPACITY && node.depth < MAX_DEPTH {
                        return bad("leaf over capacity above the depth limit", i);
                    }
                    for &vno in vnos {
                        if self.vertex_leaf.get(vno as usize) != Some(&id) {
                            return bad("leaf holds a vertex recorded elsewhere", vno as usize);
                        }
                        if core::mem::replace(&mut listed_vertices[vno as usize], true) {
                            return bad("leaf lists a vertex twice", vno as usize);
                        }
                    }
                    listed_total += vnos.len();
                }
            }

            let mut listed = 0;
            for fno in self.hosted_faces(id).take(self.face_host.len() + 1) {
                if self.face_host.get(fno as usize) != Some(&id) {
                    return bad("face listed at a node other than its host", fno as usize);
                }
                listed += 1;
            }
            if listed != node.hosted_len as usize {
                return bad("hosted list length differs from the hosted count", i);
            }
            hosted_total += listed;
        }
        if hosted_total != self.face_host.len() {
            return bad("hosted lists do not cover every face", hosted_total);
        }
        // No repeats and the right total: every vertex is listed exactly once, in
        // the leaf it records.
        if listed_total != self.vertex_leaf.len() {
            return bad("leaves do not list every vertex", listed_total);
        }

        for (vno, &leaf) in self.vertex_leaf.iter().enumerate() {
            let Some(node) = self.nodes.get(leaf.idx()) else {
                return bad("vertex recorded in a missing node", vno);
            };
            if !node.is_leaf() {
                return bad("vertex recorded in an internal node", vno);
            }
            if !node.bounds.contains_point(surface.vertex(vno)) {
                return bad("vertex outside its leaf box", vno);
            }
        }

        for (fno, &host) in self.face_host.iter().enumerate() {
            let mut leaves = [NodeId::ROOT; 3];
            for (leaf, vno) in leaves.iter_mut().zip(surface.face(fno)) {
                let Some(&l) = self.vertex_leaf.get(vno as usize) else {
                    return bad("face references a missing vertex", fno);
                };
                *leaf = l;
            }
            let [a, b, c] = leaves;
            if host != self.common_ancestor(self.common_ancestor(a, b), c) {
                return bad("face hosted away from its vertices' common ancestor", fno);
            }
        }
        Ok(())
    }

    /// Summary counts for diagnostics.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            nodes: self.nodes.len(),
            vertices: self.vertex_leaf.len(),
            faces: self.face_host.len(),
            ..TreeStats::default()
        };
        for node in &self.nodes {
            stats.hosted_by_depth[usize::from(node.depth)] += node.hosted_len as usize;
            if let NodeKind::Leaf(vnos) = &node.kind {
                stats.leaves += 1;
                if vnos.is_empty() {
                    stats.empty_leaves += 1;
                }
                stats.max_depth = stats.max_depth.max(node.depth);
                stats.largest_leaf = stats.largest_leaf.max(vnos.len());
            }
        }
        stats
    }

    /// Bounds of the root node, or `None` for a tree without vertices.
    ///
    /// Upper bounds sit one representable step above the largest coordinate.
    pub fn bounds(&self) -> Option<Aabb3D> {
        self.nodes.first().map(|n| n.bounds)
    }

    /// The root node, or `None` for a tree without vertices.
    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId::ROOT)
    }

    /// Whether the tree indexes no vertices.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of indexed vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_leaf.len()
    }

    /// Number of hosted faces.
    pub fn face_count(&self) -> usize {
        self.face_host.len()
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Options the tree was built with.
    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Fingerprint of the surface taken at build time.
    pub fn fingerprint(&self) -> blake3::Hash {
        self.fingerprint
    }

    /// The leaf holding vertex `vno`.
    pub fn vertex_leaf(&self, vno: u32) -> Option<NodeId> {
        self.vertex_leaf.get(vno as usize).copied()
    }

    /// The node hosting face `fno`.
    pub fn face_host(&self, fno: u32) -> Option<NodeId> {
        self.face_host.get(fno as usize).copied()
    }

    /// Box of node `id`.
    pub fn node_bounds(&self, id: NodeId) -> Option<Aabb3D> {
        self.nodes.get(id.idx()).map(|n| n.bounds)
    }

    /// Parent of node `id`; `None` for the root or an unknown id.
    pub fn node_parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.idx()).and_then(|n| n.parent)
    }

    /// Depth of node `id`; the root is at depth 0.
    pub fn node_depth(&self, id: NodeId) -> Option<u8> {
        self.nodes.get(id.idx()).map(|n| n.depth)
    }

    /// Children of node `id` in octant order, or `None` for a leaf.
    pub fn children(&self, id: NodeId) -> Option<[NodeId; 8]> {
        self.nodes.get(id.idx()).and_then(|n| n.children().copied())
    }

    /// Vertices held directly by node `id`. Empty for internal nodes.
    pub fn leaf_vertices(&self, id: NodeId) -> &[u32] {
        self.nodes.get(id.idx()).map_or(&[], Node::vertices)
    }

    /// Faces hosted at node `id`, most recently hosted first.
    pub fn hosted_faces(&self, id: NodeId) -> impl Iterator<Item = u32> + '_ {
        let head = self.nodes.get(id.idx()).and_then(|n| n.hosted_head);
        core::iter::successors(head, |&fno| self.face_next.get(fno as usize).copied().flatten())
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let (Some(a), Some(_)) = (self.nodes.get(ancestor.idx()), self.nodes.get(node.idx())) else {
            return false;
        };
        let mut id = node;
        while self.nodes[id.idx()].depth > a.depth {
            id = self.parent_or_self(id);
        }
        id == ancestor
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    fn parent_or_self(&self, id: NodeId) -> NodeId {
        self.nodes[id.idx()].parent.unwrap_or(id)
    }

    fn common_ancestor(&self, mut a: NodeId, mut b: NodeId) -> NodeId {
        while self.nodes[a.idx()].depth > self.nodes[b.idx()].depth {
            a = self.parent_or_self(a);
        }
        while self.nodes[b.idx()].depth > self.nodes[a.idx()].depth {
            b = self.parent_or_self(b);
        }
        while a != b {
            a = self.parent_or_self(a);
            b = self.parent_or_self(b);
        }
        a
    }

    fn place_vertices<S: Surface + ?Sized>(&mut self, surface: &S, bounds: Aabb3D) {
        let vertex_count = surface.vertex_count();
        self.nodes.push(Node::leaf(bounds, None, 0));
        self.vertex_leaf = vec![NodeId::ROOT; vertex_count];

        let mut recent = NodeId::ROOT;
        for vno in 0..vertex_count {
            let p = surface.vertex(vno);
            recent = self.climb(recent, p);
            recent = self.insert(recent, narrow(vno), p, surface);
        }
    }

    /// First ancestor-or-self of `id` whose box contains `p`.
    fn climb(&self, mut id: NodeId, p: Point3) -> NodeId {
        while !self.nodes[id.idx()].bounds.contains_point(p) {
            match self.nodes[id.idx()].parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        id
    }

    /// Insert `vno` at or below `id`, returning the leaf that took it.
    fn insert<S: Surface + ?Sized>(&mut self, mut id: NodeId, vno: u32, p: Point3, surface: &S) -> NodeId {
        loop {
            let node = &mut self.nodes[id.idx()];
            debug_assert!(
                node.bounds.contains_point(p),
                "vertex {vno} at {p:?} inserted into node {} that does not contain it",
                id.get()
            );
            let depth = node.depth;
            match &mut node.kind {
                NodeKind::Internal { mid, children } => {
                    id = children[Octant::of_point(*mid, p).index()];
                }
                NodeKind::Leaf(vnos) if vnos.len() < LEAF_CAPACITY || depth >= MAX_DEPTH => {
                    if vnos.len() == vnos.capacity() {
                        // Leaves at the depth limit grow by doubling.
                        vnos.reserve_exact(vnos.len().max(LEAF_CAPACITY));
                    }
                    vnos.push(vno);
                    self.vertex_leaf[vno as usize] = id;
                    return id;
                }
                NodeKind::Leaf(_) => self.split(id, surface),
            }
        }
    }

    /// Turn leaf `id` into an internal node and redistribute its vertices.
    fn split<S: Surface + ?Sized>(&mut self, id: NodeId, surface: &S) {
        let Node { bounds, depth, .. } = self.nodes[id.idx()];
        let mid = bounds.midpoint();
        let first = self.nodes.len();
        let children: [NodeId; 8] = core::array::from_fn(|c| NodeId::new(first + c));
        for c in 0..Octant::COUNT {
            let child_bounds = Octant::from_index(c).child_bounds(&bounds, mid);
            self.nodes.push(Node::leaf(child_bounds, Some(id), depth + 1));
        }

        let held = core::mem::replace(&mut self.nodes[id.idx()].kind, NodeKind::Internal { mid, children });
        if let NodeKind::Leaf(vnos) = held {
            for vno in vnos {
                let q = surface.vertex(vno as usize);
                let child = children[Octant::of_point(mid, q).index()];
                self.insert(child, vno, q, surface);
            }
        }
    }

    fn host_faces<S: Surface + ?Sized>(&mut self, surface: &S) -> Result<(), RealmError> {
        let vertex_count = self.vertex_leaf.len();
        for fno in 0..surface.face_count() {
            let fno = narrow(fno);
            let leaf = |vno: u32| {
                self.vertex_leaf
                    .get(vno as usize)
                    .copied()
                    .ok_or(RealmError::VertexOutOfRange {
                        fno,
                        vno,
                        vertex_count,
                    })
            };
            let [a, b, c] = surface.face(fno as usize);
            let (a, b, c) = (leaf(a)?, leaf(b)?, leaf(c)?);
            let host = self.common_ancestor(self.common_ancestor(a, b), c);

            let node = &mut self.nodes[host.idx()];
            self.face_next.push(node.hosted_head.replace(fno));
            node.hosted_len += 1;
            self.face_host.push(host);
        }
        Ok(())
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Vertex and face counts are checked against u32 before any index is narrowed."
)]
const fn narrow(index: usize) -> u32 {
    index as u32
}

fn checked_count(count: usize, what: &'static str) -> Result<usize, RealmError> {
    if u32::try_from(count).is_ok() {
        Ok(count)
    } else {
        Err(RealmError::TooManyElements { what, count })
    }
}

/// Root box of the tree: tight vertex bounds, upper faces pushed out by one step.
fn root_bounds<S: Surface + ?Sized>(surface: &S) -> Result<Option<Aabb3D>, RealmError> {
    let vertices = (0..surface.vertex_count()).map(|vno| surface.vertex(vno));
    if let Some(vno) = vertices
        .clone()
        .position(|p| !p.iter().all(|c| c.is_finite()))
    {
        return Err(RealmError::NonFiniteVertex { vno: narrow(vno) });
    }
    Ok(Aabb3D::bounding(vertices))
}

/// Order-dependent digest of every vertex coordinate and face index.
fn fingerprint<S: Surface + ?Sized>(surface: &S) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(surface.vertex_count() as u64).to_le_bytes());
    let mut buf = [0_u8; 12];
    for vno in 0..surface.vertex_count() {
        for (chunk, c) in buf.chunks_exact_mut(4).zip(surface.vertex(vno)) {
            chunk.copy_from_slice(&c.to_le_bytes());
        }
        hasher.update(&buf);
    }
    hasher.update(&(surface.face_count() as u64).to_le_bytes());
    for fno in 0..surface.face_count() {
        for (chunk, v) in buf.chunks_exact_mut(4).zip(surface.face(fno)) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        hasher.update(&buf);
    }
    hasher.finalize()
}
