// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface sources: where a realm tree reads vertex positions and faces from.

use alloc::vec::Vec;

use crate::types::Point3;

/// Read access to a triangulated surface.
///
/// A [`RealmTree`](crate::RealmTree) reads positions and faces only while building,
/// verifying, or validating; it keeps indices, never coordinates. Implement this for
/// your own mesh type to choose which coordinate set a tree indexes (for example the
/// current positions or a reference configuration).
///
/// Indices passed in are always below the corresponding count.
pub trait Surface {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Position of vertex `vno`.
    fn vertex(&self, vno: usize) -> Point3;

    /// Number of triangular faces.
    fn face_count(&self) -> usize;

    /// Vertex indices of face `fno`.
    fn face(&self, fno: usize) -> [u32; 3];
}

impl<S: Surface + ?Sized> Surface for &S {
    fn vertex_count(&self) -> usize {
        (**self).vertex_count()
    }

    fn vertex(&self, vno: usize) -> Point3 {
        (**self).vertex(vno)
    }

    fn face_count(&self) -> usize {
        (**self).face_count()
    }

    fn face(&self, fno: usize) -> [u32; 3] {
        (**self).face(fno)
    }
}

/// An owned surface: vertex positions and faces as plain vectors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceSnapshot {
    /// Vertex positions, indexed by vno.
    pub vertices: Vec<Point3>,
    /// Faces as vertex-index triples, indexed by fno.
    pub faces: Vec<[u32; 3]>,
}

impl SurfaceSnapshot {
    /// Create a snapshot from vertices and faces.
    pub fn new(vertices: Vec<Point3>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Borrow this snapshot as slices.
    pub fn as_slices(&self) -> SurfaceSlices<'_> {
        SurfaceSlices::new(&self.vertices, &self.faces)
    }
}

impl Surface for SurfaceSnapshot {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, vno: usize) -> Point3 {
        self.vertices[vno]
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, fno: usize) -> [u32; 3] {
        self.faces[fno]
    }
}

/// A borrowed surface over caller-owned slices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSlices<'a> {
    /// Vertex positions, indexed by vno.
    pub vertices: &'a [Point3],
    /// Faces as vertex-index triples, indexed by fno.
    pub faces: &'a [[u32; 3]],
}

impl<'a> SurfaceSlices<'a> {
    /// Create a surface view over the given slices.
    pub const fn new(vertices: &'a [Point3], faces: &'a [[u32; 3]]) -> Self {
        Self { vertices, faces }
    }
}

impl Surface for SurfaceSlices<'_> {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, vno: usize) -> Point3 {
        self.vertices[vno]
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, fno: usize) -> [u32; 3] {
        self.faces[fno]
    }
}
