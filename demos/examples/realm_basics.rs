// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Realm basics
//!
//! Run:
//! - `cargo run -p understory_realm_demos --example realm_basics`
//!
//! Shows how a tree is shaped for a small cloud of vertices, where realms anchor,
//! and how the vertex cursor can be paused and resumed.

use understory_realm::{Aabb3D, LEAF_CAPACITY, RealmTree, SurfaceSnapshot};

fn main() {
    // Two clusters: one dense enough to split, one sparse.
    let mut vertices = Vec::new();
    for i in 0..(LEAF_CAPACITY * 3) {
        let t = i as f32 * 0.1;
        vertices.push([t.cos(), t.sin(), t * 0.05]);
    }
    vertices.push([20.0, 20.0, 20.0]);
    vertices.push([21.0, 20.0, 20.0]);
    let surface = SurfaceSnapshot::new(vertices, Vec::new());

    let tree = RealmTree::build(&surface).expect("finite vertices");
    let stats = tree.stats();
    println!("root: {:?}", tree.bounds());
    println!(
        "nodes={} leaves={} empty_leaves={} max_depth={} largest_leaf={}",
        stats.nodes, stats.leaves, stats.empty_leaves, stats.max_depth, stats.largest_leaf
    );

    for (label, query) in [
        ("dense cluster", Aabb3D::new(-1.5, -1.5, -1.0, 1.5, 1.5, 1.0)),
        ("sparse cluster", Aabb3D::new(19.0, 19.0, 19.0, 22.0, 21.0, 21.0)),
        ("between", Aabb3D::new(5.0, 5.0, 5.0, 15.0, 15.0, 15.0)),
        ("outside", Aabb3D::new(-50.0, -50.0, -50.0, -40.0, -40.0, -40.0)),
    ] {
        let realm = tree.realm(query);
        let depth = realm.anchor().and_then(|a| tree.node_depth(a));
        let vertices: Vec<u32> = realm.vertices().collect();
        println!("{label}: anchor depth {depth:?}, {} vertices {vertices:?}", vertices.len());
    }

    // Walk a few vertices, stash the cursor, and pick up later.
    let realm = tree.realm(Aabb3D::new(-1.5, -1.5, -1.0, 1.5, 1.5, 1.0));
    let mut cursor = realm.cursor();
    let first: Vec<u32> = (0..4).filter_map(|_| realm.next_vertex(&mut cursor)).collect();
    let stashed = cursor;
    let mut resumed = stashed;
    let rest: Vec<u32> = core::iter::from_fn(|| realm.next_vertex(&mut resumed)).collect();
    println!("first four: {first:?}; after resuming: {rest:?}");
}
