// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_realm --heading-base-level=0

//! Understory Realm: an octree broad phase for triangle surfaces.
//!
//! A [`RealmTree`] indexes the vertices of a triangulated surface in an octree and
//! hosts every face at the deepest node containing all three of its vertices.
//! A [`Realm`] scopes the tree to a query box and answers, conservatively:
//!
//! - which vertices might lie in the box ([`Realm::might_touch_vertex`], [`Realm::vertices`]),
//! - which faces might intersect it ([`Realm::might_touch_face`], [`Realm::list_candidate_faces`]).
//!
//! "Conservatively" means no element that touches the box is ever missed; some that
//! do not may be reported. Callers run exact tests on the candidates.
//!
//! The tree keeps indices only. Positions and faces are read through the
//! [`Surface`] trait while building, so one tree can index any coordinate set a
//! mesh carries. Moving an indexed vertex makes the tree stale; rebuild it, and use
//! [`RealmTree::verify`] to catch the cases where that was forgotten.
//!
//! # Example
//!
//! ```rust
//! use understory_realm::{Aabb3D, RealmTree, SurfaceSnapshot};
//!
//! // A unit square split into two triangles, plus a far-away triangle.
//! let surface = SurfaceSnapshot::new(
//!     vec![
//!         [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
//!         [9.0, 9.0, 9.0], [9.5, 9.0, 9.0], [9.0, 9.5, 9.0],
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3], [4, 5, 6]],
//! );
//! let tree = RealmTree::build(&surface)?;
//!
//! let realm = tree.realm(Aabb3D::new(0.25, 0.25, -0.5, 0.75, 0.75, 0.5));
//! let faces = realm.candidate_faces();
//! assert!(faces.contains(&0) && faces.contains(&1));
//!
//! let mut vertices: Vec<u32> = realm.vertices().collect();
//! vertices.sort_unstable();
//! assert!(vertices.iter().all(|&v| realm.might_touch_vertex(v)));
//!
//! // The surface has not changed, so the tree is still current.
//! tree.verify(&surface)?;
//! # Ok::<(), understory_realm::RealmError>(())
//! ```
//!
//! ## Walking vertices without allocating
//!
//! [`Realm::cursor`] returns a two-word [`RealmCursor`] that can be stored and
//! resumed later with [`Realm::next_vertex`]:
//!
//! ```rust
//! use understory_realm::{Aabb3D, RealmTree, SurfaceSlices};
//!
//! let vertices: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]];
//! let tree = RealmTree::build(&SurfaceSlices::new(&vertices, &[]))?;
//! let realm = tree.realm(Aabb3D::new(0.0, 0.0, 0.0, 3.0, 3.0, 3.0));
//!
//! let mut cursor = realm.cursor();
//! let mut count = 0;
//! while let Some(_vno) = realm.next_vertex(&mut cursor) {
//!     count += 1;
//! }
//! assert_eq!(count, 3);
//! # Ok::<(), understory_realm::RealmError>(())
//! ```
//!
//! ## Tree shape
//!
//! The root box is the tight bounding box of all vertices, with its upper faces
//! pushed out by one representable step so every vertex is strictly inside. A
//! leaf splits into eight octants at its midpoint when it would exceed
//! [`LEAF_CAPACITY`] vertices, except at [`MAX_DEPTH`], where it grows instead.
//! Boxes are half-open: `min <= p < max` on every axis.
//!
//! ### Float semantics
//!
//! Building rejects NaN and infinite coordinates. Query boxes with NaN extents are
//! treated as empty.

#![no_std]

extern crate alloc;

pub mod cursor;
pub mod error;
mod node;
pub mod octant;
pub mod options;
pub mod realm;
pub mod stats;
pub mod surface;
pub mod tree;
pub mod types;

pub use cursor::{RealmCursor, Vertices};
pub use error::RealmError;
pub use node::{LEAF_CAPACITY, MAX_DEPTH, NodeId};
pub use octant::Octant;
pub use options::{BuildOptions, StalenessPolicy};
pub use realm::Realm;
pub use stats::TreeStats;
pub use surface::{Surface, SurfaceSlices, SurfaceSnapshot};
pub use tree::RealmTree;
pub use types::{Aabb3D, Point3};
