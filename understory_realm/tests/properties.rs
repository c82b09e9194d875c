// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based tests for realm queries.
//!
//! Random surfaces and query boxes are checked against brute-force answers.
//!
//! Run with: cargo test -p understory_realm --test properties

use proptest::prelude::*;
use understory_realm::{Aabb3D, Point3, RealmTree, SurfaceSnapshot};

// =============================================================================
// Strategies
// =============================================================================

/// Either a spread-out position or one from a coarse lattice, so that coincident
/// and axis-aligned vertices show up often.
fn arb_position() -> impl Strategy<Value = Point3> {
    prop_oneof![
        prop::array::uniform3(-10.0f32..10.0),
        prop::array::uniform3(0u8..4).prop_map(|a| a.map(f32::from)),
    ]
}

fn arb_surface(max_vertices: usize, max_faces: usize) -> impl Strategy<Value = SurfaceSnapshot> {
    prop::collection::vec(arb_position(), 1..=max_vertices).prop_flat_map(move |vertices| {
        let n = u32::try_from(vertices.len()).unwrap();
        let faces = prop::collection::vec(prop::array::uniform3(0..n), 0..=max_faces);
        faces.prop_map(move |faces| SurfaceSnapshot::new(vertices.clone(), faces))
    })
}

/// Query boxes that may be empty, partly outside the surface, or entirely outside it.
fn arb_query() -> impl Strategy<Value = Aabb3D> {
    (
        prop::array::uniform3(-12.0f32..12.0),
        prop::array::uniform3(0.0f32..8.0),
    )
        .prop_map(|(min, size)| {
            Aabb3D::from_corners(min, [min[0] + size[0], min[1] + size[1], min[2] + size[2]])
        })
}

fn face_bounds(s: &SurfaceSnapshot, face: [u32; 3]) -> Aabb3D {
    Aabb3D::bounding(face.map(|v| s.vertices[v as usize])).unwrap()
}

fn sorted(mut v: Vec<u32>) -> Vec<u32> {
    v.sort_unstable();
    v
}

// =============================================================================
// Vertices
// =============================================================================

proptest! {
    /// Every vertex inside the query box is yielded.
    #[test]
    fn walk_finds_every_contained_vertex(s in arb_surface(200, 0), query in arb_query()) {
        let tree = RealmTree::build(&s).unwrap();
        let realm = tree.realm(query);
        let seen: Vec<u32> = realm.vertices().collect();
        for (vno, &p) in s.vertices.iter().enumerate() {
            if query.contains_point(p) {
                prop_assert!(seen.contains(&(vno as u32)), "vertex {} at {:?} missed", vno, p);
            }
        }
    }

    /// No vertex is yielded twice.
    #[test]
    fn walk_yields_each_vertex_once(s in arb_surface(200, 0), query in arb_query()) {
        let tree = RealmTree::build(&s).unwrap();
        let seen: Vec<u32> = tree.realm(query).vertices().collect();
        let mut unique = sorted(seen.clone());
        unique.dedup();
        prop_assert_eq!(seen.len(), unique.len());
    }

    /// `might_touch_vertex` holds exactly for the vertices the walk yields.
    #[test]
    fn membership_matches_walk(s in arb_surface(200, 0), query in arb_query()) {
        let tree = RealmTree::build(&s).unwrap();
        let realm = tree.realm(query);
        let seen = sorted(realm.vertices().collect());
        let members: Vec<u32> = (0..s.vertices.len() as u32)
            .filter(|&vno| realm.might_touch_vertex(vno))
            .collect();
        prop_assert_eq!(seen, members);
    }
}

// =============================================================================
// Faces
// =============================================================================

proptest! {
    /// Every face whose bounding box meets the query box is a candidate.
    #[test]
    fn candidates_cover_intersecting_faces(s in arb_surface(120, 200), query in arb_query()) {
        let tree = RealmTree::build(&s).unwrap();
        let realm = tree.realm(query);
        let candidates = realm.candidate_faces();
        for (fno, &face) in s.faces.iter().enumerate() {
            if face_bounds(&s, face).intersects(&query) {
                prop_assert!(candidates.contains(&(fno as u32)), "face {} missed", fno);
                prop_assert!(realm.might_touch_face(fno as u32));
            }
        }
    }

    /// The count is exactly what the listing writes, and the listing has no repeats.
    #[test]
    fn count_matches_listing(s in arb_surface(120, 200), query in arb_query()) {
        let tree = RealmTree::build(&s).unwrap();
        let realm = tree.realm(query);
        let count = realm.count_candidate_faces();
        let mut buf = vec![u32::MAX; count];
        let written = realm.list_candidate_faces(&mut buf).unwrap();
        prop_assert_eq!(written, count);

        let unique = {
            let mut u = sorted(buf.clone());
            u.dedup();
            u
        };
        prop_assert_eq!(unique.len(), count);
        for fno in 0..s.faces.len() as u32 {
            prop_assert_eq!(realm.might_touch_face(fno), unique.binary_search(&fno).is_ok());
        }

        if count > 0 {
            let mut short = vec![0; count - 1];
            prop_assert!(realm.list_candidate_faces(&mut short).is_err());
        }
    }
}

// =============================================================================
// Construction
// =============================================================================

proptest! {
    /// Two builds of the same surface answer every query identically.
    #[test]
    fn rebuild_gives_same_answers(s in arb_surface(150, 100), query in arb_query()) {
        let a = RealmTree::build(&s).unwrap();
        let b = RealmTree::build(&s).unwrap();
        let (ra, rb) = (a.realm(query), b.realm(query));
        prop_assert_eq!(sorted(ra.vertices().collect()), sorted(rb.vertices().collect()));
        prop_assert_eq!(sorted(ra.candidate_faces()), sorted(rb.candidate_faces()));
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
    }

    /// Built trees always pass their own consistency checks.
    #[test]
    fn built_trees_validate(s in arb_surface(300, 150)) {
        let tree = RealmTree::build(&s).unwrap();
        prop_assert!(tree.validate(&s).is_ok());
        tree.verify(&s).unwrap();
    }
}
