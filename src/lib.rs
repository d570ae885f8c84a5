//! # Meshweave
//!
//! Polygon mesh topology for computational geometry experiments.
//!
//! Meshweave stores meshes as flat coordinate and index arrays
//! ([`IndexedMesh`](mesh::IndexedMesh)) and reconstructs a fully linked
//! half-edge structure ([`HalfMesh`](mesh::HalfMesh)) from them, including
//! ghost half-edges along open boundaries. On top of that it provides
//! triangle neighbor tables, vertex adjacency lists and exact 2D predicates
//! for point location and Delaunay-style algorithms.
//!
//! ## Features
//!
//! - **Half-edge reconstruction**: twins matched in one pass, boundary loops stitched
//! - **Mixed arity**: triangles, quads and arbitrary polygons in one mesh
//! - **Typed handles**: 16-bit, 32-bit or 64-bit arena indices
//! - **Exact predicates**: orientation and in-circle tests from the `robust` crate
//! - **Local edits**: edge flip and edge collapse with tombstoned elements
//!
//! ## Quick Start
//!
//! ```
//! use meshweave::prelude::*;
//!
//! let mesh = grid(&GridOptions::new(ElementKind::Triangle, 2, 2));
//! let hmesh: HalfMesh = build(&mesh);
//!
//! assert_eq!(hmesh.num_nodes(), 9);
//! assert_eq!(hmesh.num_faces(), 8);
//! assert_eq!(hmesh.num_halfedges(), 32);
//! assert_eq!(hmesh.boundary_loops().len(), 1);
//!
//! let out = extract(&hmesh);
//! assert_eq!(out.num_triangles(), 8);
//! assert_eq!(out.num_lines(), 8);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use meshweave::prelude::*;
//!
//! let hmesh: HalfMesh = build(&icosahedron());
//! let n = NodeId::new(0);
//! assert_eq!(hmesh.node_ring(n).len(), 5);
//! for f in hmesh.node_faces(n) {
//!     assert_eq!(hmesh.face_arity(f), 3);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adjacency;
pub mod error;
pub mod generate;
pub mod io;
pub mod mesh;
pub mod predicates;
pub mod validate;

/// Prelude module for convenient imports.
///
/// ```
/// use meshweave::prelude::*;
/// ```
pub mod prelude {
    pub use crate::adjacency::{vertex_adjacency, EncodedTriangleAdjacency, TriangleAdjacency};
    pub use crate::error::{MeshError, Result};
    pub use crate::generate::{grid, icosahedron, ElementKind, GridOptions};
    pub use crate::mesh::{
        build, extract, FaceId, HalfEdge, HalfEdgeId, HalfFace, HalfMesh, HalfNode, IndexedMesh,
        MeshIndex, NodeId,
    };
    pub use crate::validate::validate;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
