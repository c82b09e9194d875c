// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Realm faces
//!
//! Run:
//! - `cargo run -p understory_realm_demos --example realm_faces`
//!
//! Builds a tetrahedron-like mesh with one large face spanning the whole tree and
//! many small ones, then lists candidate faces for a few boxes. The large face is
//! hosted at the root and so is a candidate for every realm.

use understory_realm::{Aabb3D, RealmError, RealmTree, SurfaceSnapshot};

fn main() -> Result<(), RealmError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    // A fan of small triangles around the origin.
    vertices.push([0.0, 0.0, 0.0]);
    for i in 0..32_u32 {
        let a = i as f32 / 32.0 * core::f32::consts::TAU;
        vertices.push([a.cos(), a.sin(), 0.0]);
        faces.push([0, 1 + i, 1 + (i + 1) % 32]);
    }
    // One large face reaching far away.
    let far = vertices.len() as u32;
    vertices.extend([[50.0, 0.0, 0.0], [0.0, 50.0, 0.0], [0.0, 0.0, 50.0]]);
    faces.push([far, far + 1, far + 2]);

    let surface = SurfaceSnapshot::new(vertices, faces);
    let tree = RealmTree::build(&surface)?;
    println!("faces hosted by depth: {:?}", tree.stats().hosted_by_depth);

    for query in [
        Aabb3D::new(0.5, 0.5, -0.1, 1.0, 1.0, 0.1),
        Aabb3D::new(-1.0, -1.0, -0.1, 1.0, 1.0, 0.1),
        Aabb3D::new(20.0, 20.0, 5.0, 21.0, 21.0, 6.0),
    ] {
        let realm = tree.realm(query);
        let mut buf = vec![0; realm.count_candidate_faces()];
        let n = realm.list_candidate_faces(&mut buf)?;
        println!("{query:?}: {n} candidates {buf:?}");
    }

    // A buffer that is too short is rejected without being written.
    let realm = tree.realm(Aabb3D::new(-1.0, -1.0, -0.1, 1.0, 1.0, 0.1));
    let mut short = [u32::MAX; 2];
    if let Err(err) = realm.list_candidate_faces(&mut short) {
        println!("{err}; buffer left as {short:?}");
    }
    Ok(())
}
