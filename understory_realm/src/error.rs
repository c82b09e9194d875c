// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for building, verifying, and querying realm trees.

/// Errors reported by [`RealmTree`](crate::RealmTree) and [`Realm`](crate::Realm).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RealmError {
    /// The surface has more vertices or faces than a 32-bit index can address.
    #[error("surface has {count} {what}, more than a 32-bit index can address")]
    TooManyElements {
        /// Which element kind overflowed (`"vertices"` or `"faces"`).
        what: &'static str,
        /// The offending count.
        count: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {vno} has a non-finite coordinate")]
    NonFiniteVertex {
        /// The offending vertex.
        vno: u32,
    },

    /// A face names a vertex the surface does not have.
    #[error("face {fno} references vertex {vno}, but the surface has {vertex_count} vertices")]
    VertexOutOfRange {
        /// The offending face.
        fno: u32,
        /// The missing vertex index.
        vno: u32,
        /// Number of vertices in the surface.
        vertex_count: usize,
    },

    /// The surface changed since the tree was built.
    #[error("surface changed since the realm tree was built (fingerprint {found}, expected {expected})")]
    Stale {
        /// Fingerprint recorded at build time.
        expected: blake3::Hash,
        /// Fingerprint of the surface as passed now.
        found: blake3::Hash,
    },

    /// A caller-provided buffer cannot hold every candidate.
    #[error("candidate buffer holds {capacity} faces, {needed} required")]
    BufferTooSmall {
        /// Number of entries required.
        needed: usize,
        /// Length of the buffer that was passed.
        capacity: usize,
    },

    /// An internal tree invariant does not hold.
    #[error("realm tree invariant violated: {what} (index {index})")]
    Inconsistent {
        /// Which check failed.
        what: &'static str,
        /// The vertex, face, or node index the check failed on.
        index: usize,
    },
}
