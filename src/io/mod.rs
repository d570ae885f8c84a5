//! Mesh file output.
//!
//! Meshes leave the crate as [`IndexedMesh`] snapshots; this module writes
//! them to disk. Reading mesh files is left to external loaders, which hand
//! their arrays to [`IndexedMesh::from_faces`].
//!
//! # Supported Formats
//!
//! | Format | Extension | Save |
//! |--------|-----------|------|
//! | Wavefront OBJ | `.obj` | ✓ |
//!
//! # Usage
//!
//! ```no_run
//! use meshweave::generate::{grid, GridOptions};
//! use meshweave::io::save;
//!
//! save(&grid(&GridOptions::default()), "grid.obj").unwrap();
//! ```

pub mod obj;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::IndexedMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Save a mesh to a file, picking the format from its extension.
pub fn save<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Obj => obj::save(mesh, path),
    }
}
