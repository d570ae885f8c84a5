//! Procedural test meshes.
//!
//! # Example
//!
//! ```
//! use meshweave::generate::{grid, ElementKind, GridOptions};
//!
//! let options = GridOptions::new(ElementKind::Quad, 4, 2).with_width(2.0);
//! let mesh = grid(&options);
//! assert_eq!(mesh.num_vertices(), 15);
//! assert_eq!(mesh.num_quads(), 8);
//! ```

use log::debug;

use crate::error::{MeshError, Result};
use crate::mesh::IndexedMesh;

/// Cell type of a structured grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementKind {
    /// Each cell split into two triangles along its `(0,0)-(1,1)` diagonal.
    #[default]
    Triangle,
    /// One quad per cell.
    Quad,
}

/// Options for [`grid`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Cell type.
    pub kind: ElementKind,
    /// Number of cells along `x`.
    pub nx: usize,
    /// Number of cells along `y`.
    pub ny: usize,
    /// Extent along `x`.
    pub width: f64,
    /// Extent along `y`.
    pub height: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::new(ElementKind::Triangle, 10, 10)
    }
}

impl GridOptions {
    /// An `nx` by `ny` grid over the unit square.
    pub fn new(kind: ElementKind, nx: usize, ny: usize) -> Self {
        Self {
            kind,
            nx,
            ny,
            width: 1.0,
            height: 1.0,
        }
    }

    /// Set the extent along `x`.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Set the extent along `y`.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Check that the grid has at least one cell and a finite positive extent.
    pub fn validate(&self) -> Result<()> {
        if self.nx == 0 {
            return Err(MeshError::invalid_param("nx", self.nx, "must be at least 1"));
        }
        if self.ny == 0 {
            return Err(MeshError::invalid_param("ny", self.ny, "must be at least 1"));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(MeshError::invalid_param("width", self.width, "must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(MeshError::invalid_param("height", self.height, "must be positive"));
        }
        Ok(())
    }
}

/// Structured grid on `[0, width] x [0, height]` in the `z = 0` plane.
///
/// Vertex `j * (nx + 1) + i` sits at column `i`, row `j`. Cells are emitted
/// row by row, every face counter-clockwise. A zero cell count yields a mesh
/// without faces; see [`GridOptions::validate`].
pub fn grid(options: &GridOptions) -> IndexedMesh {
    let GridOptions {
        kind, nx, ny, width, height,
    } = *options;

    let mut mesh = IndexedMesh::new();
    if nx == 0 || ny == 0 {
        return mesh;
    }

    let dx = width / nx as f64;
    let dy = height / ny as f64;
    mesh.vertices.reserve(3 * (nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            mesh.vertices
                .extend_from_slice(&[i as f64 * dx, j as f64 * dy, 0.0]);
        }
    }

    for j in 0..ny {
        for i in 0..nx {
            let k = j * (nx + 1) + i;
            match kind {
                ElementKind::Triangle => {
                    mesh.add_triangle([k, k + 1, k + nx + 2]);
                    mesh.add_triangle([k, k + nx + 2, k + nx + 1]);
                }
                ElementKind::Quad => mesh.add_quad([k, k + 1, k + nx + 2, k + nx + 1]),
            }
        }
    }

    debug!("generated {:?} grid {}x{} with {} faces", kind, nx, ny, mesh.num_faces());
    mesh
}

/// Regular icosahedron inscribed in the unit sphere.
///
/// All twenty triangles face outward.
pub fn icosahedron() -> IndexedMesh {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let a = (1.0 + t * t).sqrt();
    let (t, s) = (t / a, 1.0 / a);

    #[rustfmt::skip]
    let vertices = vec![
         t,  s, 0.0,
        -t,  s, 0.0,
         t, -s, 0.0,
        -t, -s, 0.0,
         s, 0.0,  t,
         s, 0.0, -t,
        -s, 0.0,  t,
        -s, 0.0, -t,
        0.0,  t,  s,
        0.0, -t,  s,
        0.0,  t, -s,
        0.0, -t, -s,
    ];

    #[rustfmt::skip]
    let triangles = vec![
        0, 8, 4,   0, 5, 10,  2, 4, 9,   2, 11, 5,
        1, 6, 8,   1, 10, 7,  3, 9, 6,   3, 7, 11,
        0, 10, 8,  1, 8, 10,  2, 9, 11,  3, 11, 9,
        4, 2, 0,   5, 0, 2,   6, 1, 3,   7, 3, 1,
        8, 6, 4,   9, 4, 6,   10, 5, 7,  11, 7, 5,
    ];

    IndexedMesh {
        vertices,
        triangles,
        ..IndexedMesh::default()
    }
}
