//! Error types for meshweave.
//!
//! Construction, adjacency and predicates do not check their input. The errors
//! here come from the optional validation pass, the local edit operations and
//! file output.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A face array length is not a multiple of its arity.
    #[error("{kind} array has length {len}, which is not a multiple of {arity}")]
    InvalidArity {
        /// The face kind ("triangle", "quad", "line", ...).
        kind: &'static str,
        /// Length of the flat array.
        len: usize,
        /// Expected arity.
        arity: usize,
    },

    /// A face references an invalid vertex index.
    #[error("{kind} {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face kind.
        kind: &'static str,
        /// The face index within its kind.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face uses the same vertex twice.
    #[error("{kind} {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face kind.
        kind: &'static str,
        /// The face index within its kind.
        face: usize,
    },

    /// An edge is shared by more than two faces, or twice in the same direction.
    #[error("edge ({v0}, {v1}) is non-manifold")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// Several separate fans of faces meet at a vertex.
    #[error("vertex {vertex} is non-manifold")]
    NonManifoldVertex {
        /// The shared vertex.
        vertex: usize,
    },

    /// The requested edit targets a boundary edge.
    #[error("edge ({v0}, {v1}) is on the boundary")]
    BoundaryEdge {
        /// Origin node index.
        v0: usize,
        /// Destination node index.
        v1: usize,
    },

    /// The requested edit needs triangles on both sides of the edge.
    #[error("face {face} has {arity} sides, expected a triangle")]
    NotTriangle {
        /// Arena index of the offending face.
        face: usize,
        /// Its arity.
        arity: usize,
    },

    /// The requested edit touches a deactivated element.
    #[error("{0} is deactivated")]
    Inactive(String),

    /// Collapsing the edge would produce non-manifold topology.
    #[error("collapsing edge ({v0}, {v1}) would create non-manifold topology: {reason}")]
    NonManifoldCollapse {
        /// Origin node index.
        v0: usize,
        /// Destination node index.
        v1: usize,
        /// Which check rejected the collapse.
        reason: &'static str,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
