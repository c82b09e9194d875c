// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Realm: build a tree, query a box, check staleness.

use understory_realm::{Aabb3D, RealmTree, SurfaceSnapshot};

fn main() {
    // A 4×4 grid of vertices in the z = 0 plane, triangulated.
    let mut vertices = Vec::new();
    for j in 0..4 {
        for i in 0..4 {
            vertices.push([i as f32, j as f32, 0.0]);
        }
    }
    let mut faces = Vec::new();
    for j in 0..3 {
        for i in 0..3 {
            let v = j * 4 + i;
            faces.push([v, v + 1, v + 5]);
            faces.push([v, v + 5, v + 4]);
        }
    }
    let mut surface = SurfaceSnapshot::new(vertices, faces);
    let tree = RealmTree::build(&surface).expect("grid surface is well formed");
    println!("{tree:?}");

    // Query a box around the grid's lower-left cell.
    let realm = tree.realm(Aabb3D::new(-0.5, -0.5, -0.5, 1.5, 1.5, 0.5));
    let near: Vec<u32> = realm.vertices().collect();
    println!("vertices that might be in the box: {near:?}");
    println!("candidate faces: {:?}", realm.candidate_faces());

    // Move a vertex; the tree no longer matches.
    surface.vertices[0] = [0.1, 0.1, 0.2];
    match tree.verify(&surface) {
        Ok(()) => println!("tree is current"),
        Err(err) => println!("{err}"),
    }
}
