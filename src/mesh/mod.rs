//! Core mesh data structures.
//!
//! Two representations live here:
//!
//! - [`IndexedMesh`]: flat coordinate and index arrays, the interchange format
//!   with loaders and renderers.
//! - [`HalfMesh`]: a half-edge (doubly-connected edge list) representation of
//!   a polygon mesh, supporting ring traversal and local edits.
//!
//! # Handles
//!
//! Half-edge elements are identified by typed arena handles:
//! - [`NodeId`] - Identifies a node
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! Handles are generic over the underlying integer type ([`MeshIndex`]),
//! allowing `u16`, `u32`, or `u64` depending on mesh size.
//!
//! # Conversion
//!
//! ```
//! use meshweave::mesh::{build, extract, HalfMesh, IndexedMesh};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
//! mesh.add_quad([0, 1, 2, 3]);
//!
//! let hmesh: HalfMesh = build(&mesh);
//! let out = extract(&hmesh);
//! assert_eq!(out.quads, mesh.quads);
//! assert_eq!(out.num_lines(), 4);
//! ```

mod builder;
mod edit;
mod halfedge;
mod index;
mod indexed;

pub use builder::{build, extract};
pub use halfedge::{FaceCycleIter, HalfEdge, HalfFace, HalfMesh, HalfNode, NodeRingIter};
pub use index::{FaceId, HalfEdgeId, MeshIndex, NodeId};
pub use indexed::{edge_key, IndexedMesh, Polygons, QUAD_FACE_NODES, TRIANGLE_FACE_NODES};
