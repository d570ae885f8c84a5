//! Flat-array face container.
//!
//! [`IndexedMesh`] is the interchange format between meshweave and the outside
//! world (loaders, generators, renderers): vertex coordinates and face indices
//! stored in flat arrays, with faces sorted by arity into lines, triangles,
//! quads and run-length encoded polygons.
//!
//! Appending never validates indices. Use [`validate`](crate::validate::validate)
//! when referential integrity or manifoldness has to be checked.

use log::debug;
use nalgebra::Point3;

/// Local triangle vertices along each face (edge).
///
/// Face `j` is opposite vertex `j`:
///
/// ```text
/// (V2) |\
///      |  \
/// F1   |    \   F0
///      |      \
/// (V0) ---------\ (V1)
///         F2
/// ```
pub const TRIANGLE_FACE_NODES: [[usize; 2]; 3] = [[1, 2], [2, 0], [0, 1]];

/// Local quad vertices along each face (edge).
///
/// Face `j` starts at vertex `j`, counter-clockwise:
///
/// ```text
///         F2
///  (V3) -------- (V2)
///    |            |
/// F3 |            | F1
///    |            |
///  (V0) -------- (V1)
///         F0
/// ```
pub const QUAD_FACE_NODES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];

/// Pack a directed edge `(p, q)` into a single map key.
///
/// Both indices must fit in 32 bits.
#[inline]
pub fn edge_key(p: usize, q: usize) -> u64 {
    debug_assert!(p <= u32::MAX as usize && q <= u32::MAX as usize);
    ((p as u64) << 32) | q as u64
}

/// Polygons of arbitrary arity in run-length form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polygons {
    /// Offset of the first vertex of polygon `i` in `indices`.
    pub first: Vec<usize>,
    /// Flattened vertex indices of all polygons.
    pub indices: Vec<usize>,
    /// Number of vertices of polygon `i`.
    pub size: Vec<usize>,
}

impl Polygons {
    /// Number of polygons.
    #[inline]
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// Whether there are no polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Append a polygon.
    pub fn push(&mut self, polygon: &[usize]) {
        self.first.push(self.indices.len());
        self.indices.extend_from_slice(polygon);
        self.size.push(polygon.len());
    }

    /// Vertex indices of polygon `i`.
    #[inline]
    pub fn get(&self, i: usize) -> &[usize] {
        let first = self.first[i];
        &self.indices[first..first + self.size[i]]
    }

    /// Iterate over all polygons.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

/// A mesh stored as flat coordinate and index arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex coordinates (3 per vertex).
    pub vertices: Vec<f64>,
    /// Line segment indices (2 per line).
    pub lines: Vec<usize>,
    /// Triangle indices (3 per triangle).
    pub triangles: Vec<usize>,
    /// Quad indices (4 per quad).
    pub quads: Vec<usize>,
    /// Faces of any other arity.
    pub polygons: Polygons,
}

impl IndexedMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from loader output.
    ///
    /// Each face is sorted into triangle, quad or polygon storage by its arity.
    pub fn from_faces<F: AsRef<[usize]>>(
        vertices: Vec<f64>,
        faces: &[F],
        lines: Vec<usize>,
    ) -> Self {
        let mut mesh = Self {
            vertices,
            lines,
            ..Self::default()
        };
        for face in faces {
            mesh.add_face(face.as_ref());
        }
        debug!(
            "sorted faces by arity: {} triangles, {} quads, {} polygons",
            mesh.num_triangles(),
            mesh.num_quads(),
            mesh.num_polygons()
        );
        mesh
    }

    // ==================== Vertices ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, p: Point3<f64>) -> usize {
        let id = self.num_vertices();
        self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
        id
    }

    /// Coordinates of vertex `i`.
    #[inline]
    pub fn vertex(&self, i: usize) -> Point3<f64> {
        Point3::new(
            self.vertices[3 * i],
            self.vertices[3 * i + 1],
            self.vertices[3 * i + 2],
        )
    }

    // ==================== Faces ====================

    /// Append a face of any arity, dispatching on its length.
    ///
    /// Empty records are dropped.
    pub fn add_face(&mut self, face: &[usize]) {
        match *face {
            [] => debug!("dropped empty face record"),
            [a, b, c] => self.add_triangle([a, b, c]),
            [a, b, c, d] => self.add_quad([a, b, c, d]),
            _ => self.add_polygon(face),
        }
    }

    /// Total number of faces (triangles, quads and polygons).
    pub fn num_faces(&self) -> usize {
        self.num_triangles() + self.num_quads() + self.num_polygons()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Append a triangle.
    pub fn add_triangle(&mut self, t: [usize; 3]) {
        self.triangles.extend_from_slice(&t);
    }

    /// Vertex indices of triangle `i`.
    #[inline]
    pub fn triangle(&self, i: usize) -> [usize; 3] {
        [
            self.triangles[3 * i],
            self.triangles[3 * i + 1],
            self.triangles[3 * i + 2],
        ]
    }

    /// Vertex indices of local face `j` of triangle `i`.
    #[inline]
    pub fn triangle_face(&self, i: usize, j: usize) -> [usize; 2] {
        let [a, b] = TRIANGLE_FACE_NODES[j];
        [self.triangles[3 * i + a], self.triangles[3 * i + b]]
    }

    /// Number of quads.
    #[inline]
    pub fn num_quads(&self) -> usize {
        self.quads.len() / 4
    }

    /// Append a quad.
    pub fn add_quad(&mut self, q: [usize; 4]) {
        self.quads.extend_from_slice(&q);
    }

    /// Vertex indices of quad `i`.
    #[inline]
    pub fn quad(&self, i: usize) -> [usize; 4] {
        [
            self.quads[4 * i],
            self.quads[4 * i + 1],
            self.quads[4 * i + 2],
            self.quads[4 * i + 3],
        ]
    }

    /// Vertex indices of local face `j` of quad `i`.
    #[inline]
    pub fn quad_face(&self, i: usize, j: usize) -> [usize; 2] {
        let [a, b] = QUAD_FACE_NODES[j];
        [self.quads[4 * i + a], self.quads[4 * i + b]]
    }

    /// Number of polygons.
    #[inline]
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// Append a polygon of any arity.
    pub fn add_polygon(&mut self, polygon: &[usize]) {
        self.polygons.push(polygon);
    }

    /// Vertex indices of polygon `i`.
    #[inline]
    pub fn polygon(&self, i: usize) -> &[usize] {
        self.polygons.get(i)
    }

    // ==================== Lines ====================

    /// Number of line segments.
    #[inline]
    pub fn num_lines(&self) -> usize {
        self.lines.len() / 2
    }

    /// Append a line segment.
    pub fn add_line(&mut self, p: usize, q: usize) {
        self.lines.extend_from_slice(&[p, q]);
    }

    /// Vertex indices of line `i`.
    #[inline]
    pub fn line(&self, i: usize) -> [usize; 2] {
        [self.lines[2 * i], self.lines[2 * i + 1]]
    }
}
