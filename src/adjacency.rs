//! Triangle-to-triangle and vertex-to-vertex adjacency.
//!
//! Both triangle tables are built with one sweep over the directed faces
//! (edges) of every triangle, pairing each with its reversed twin through a
//! map of still-unmatched edges. Slots of faces on the mesh boundary keep
//! [`NO_NEIGHBOR`].

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::mesh::{edge_key, IndexedMesh, QUAD_FACE_NODES, TRIANGLE_FACE_NODES};

/// Table value of a face with no neighbor.
pub const NO_NEIGHBOR: i64 = -1;

/// Run the pending-edge sweep over a flat triangle array.
///
/// `matched` is called once per interior edge with the `(triangle, face)` of
/// the earlier side and then the later side.
fn sweep_triangle_faces(
    triangles: &[usize],
    mut matched: impl FnMut((usize, usize), (usize, usize)),
) {
    let mut pending: HashMap<u64, (usize, usize)> = HashMap::with_capacity(triangles.len());
    for t in 0..triangles.len() / 3 {
        for (j, [a, b]) in TRIANGLE_FACE_NODES.iter().enumerate() {
            let p = triangles[3 * t + a];
            let q = triangles[3 * t + b];
            match pending.remove(&edge_key(q, p)) {
                Some(other) => matched(other, (t, j)),
                None => {
                    pending.insert(edge_key(p, q), (t, j));
                }
            }
        }
    }
    debug!("swept triangle faces, {} on the boundary", pending.len());
}

/// Neighbor triangle across each local face of each triangle.
///
/// Slot `3 * t + j` holds the triangle across face `j` of triangle `t`, where
/// face `j` is the edge opposite vertex `j`.
///
/// # Example
/// ```
/// use meshweave::adjacency::TriangleAdjacency;
///
/// let adj = TriangleAdjacency::build(&[0, 1, 2, 2, 1, 3]);
/// assert_eq!(adj.neighbor(0, 0), Some(1));
/// assert_eq!(adj.neighbor(1, 2), Some(0));
/// assert_eq!(adj.neighbor(0, 1), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriangleAdjacency {
    data: Vec<i64>,
}

impl TriangleAdjacency {
    /// Build the table from a flat triangle index array.
    pub fn build(triangles: &[usize]) -> Self {
        let mut adj = Self {
            data: vec![NO_NEIGHBOR; triangles.len()],
        };
        sweep_triangle_faces(triangles, |(t0, j0), (t1, j1)| {
            adj.set(t0, j0, t1 as i64);
            adj.set(t1, j1, t0 as i64);
        });
        adj
    }

    /// Neighbor across face `j` of `triangle`, if any.
    #[inline]
    pub fn neighbor(&self, triangle: usize, j: usize) -> Option<usize> {
        let n = self.data[3 * triangle + j];
        (n != NO_NEIGHBOR).then_some(n as usize)
    }

    /// Overwrite the neighbor across face `j` of `triangle`.
    #[inline]
    pub fn set(&mut self, triangle: usize, j: usize, neighbor: i64) {
        self.data[3 * triangle + j] = neighbor;
    }

    /// The raw table.
    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    /// Number of slots (three per triangle).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Neighbor table storing both the neighbor triangle and its local face.
///
/// Slot `3 * t + j` holds `encode(k, i)` where face `i` of triangle `k` is the
/// twin of face `j` of triangle `t`. Two bits are reserved for the face index
/// so decoding is a shift and a mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTriangleAdjacency {
    data: Vec<i64>,
}

impl EncodedTriangleAdjacency {
    /// Pack a triangle index and local face index.
    #[inline]
    pub fn encode(triangle: usize, j: usize) -> i64 {
        debug_assert!(j < 3);
        ((triangle as i64) << 2) | j as i64
    }

    /// Unpack a value produced by [`encode`](Self::encode).
    #[inline]
    pub fn decode(a: i64) -> (usize, usize) {
        debug_assert!(a >= 0);
        ((a >> 2) as usize, (a & 3) as usize)
    }

    /// Build the table from a flat triangle index array.
    pub fn build(triangles: &[usize]) -> Self {
        let mut data = vec![NO_NEIGHBOR; triangles.len()];
        sweep_triangle_faces(triangles, |(t0, j0), (t1, j1)| {
            data[3 * t0 + j0] = Self::encode(t1, j1);
            data[3 * t1 + j1] = Self::encode(t0, j0);
        });
        Self { data }
    }

    /// `(triangle, face)` across face `j` of `triangle`, if any.
    #[inline]
    pub fn neighbor(&self, triangle: usize, j: usize) -> Option<(usize, usize)> {
        let a = self.data[3 * triangle + j];
        (a != NO_NEIGHBOR).then(|| Self::decode(a))
    }

    /// The raw table.
    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    /// Number of slots (three per triangle).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Vertices joined to each vertex by a triangle or quad edge.
///
/// Each undirected edge is recorded once, in both endpoints' lists. Polygon
/// faces are not consulted, and edges touching an out-of-range vertex are
/// skipped. The order within each list is unspecified.
pub fn vertex_adjacency(mesh: &IndexedMesh) -> Vec<Vec<usize>> {
    let mut edges: HashSet<(usize, usize)> = HashSet::new();
    let mut record = |p: usize, q: usize| {
        edges.insert((p.min(q), p.max(q)));
    };
    for t in 0..mesh.num_triangles() {
        for j in 0..3 {
            let [p, q] = mesh.triangle_face(t, j);
            record(p, q);
        }
    }
    for i in 0..mesh.num_quads() {
        for j in 0..QUAD_FACE_NODES.len() {
            let [p, q] = mesh.quad_face(i, j);
            record(p, q);
        }
    }

    let n = mesh.num_vertices();
    let mut v2v = vec![Vec::new(); n];
    for (p, q) in edges {
        if q >= n {
            continue;
        }
        v2v[p].push(q);
        v2v[q].push(p);
    }
    v2v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{grid, ElementKind, GridOptions};

    #[test]
    fn test_grid_2x2_adjacency() {
        let mesh = grid(&GridOptions::new(ElementKind::Triangle, 2, 2));
        let adj = TriangleAdjacency::build(&mesh.triangles);

        assert_eq!(adj.len(), 24);
        assert_eq!(adj.as_slice()[0], 3);
        assert_eq!(adj.as_slice()[1], 1);
        assert_eq!(adj.as_slice()[2], NO_NEIGHBOR);
    }

    #[test]
    fn test_grid_adjacency_is_symmetric() {
        let (nx, ny) = (5, 3);
        let mesh = grid(&GridOptions::new(ElementKind::Triangle, nx, ny));
        let adj = TriangleAdjacency::build(&mesh.triangles);
        assert_eq!(adj.len(), 3 * 2 * nx * ny);

        let mut boundary = 0;
        for t in 0..mesh.num_triangles() {
            for j in 0..3 {
                match adj.neighbor(t, j) {
                    Some(n) => {
                        let [p, q] = mesh.triangle_face(t, j);
                        let back = (0..3)
                            .find(|&i| mesh.triangle_face(n, i) == [q, p])
                            .expect("neighbor shares the reversed edge");
                        assert_eq!(adj.neighbor(n, back), Some(t));
                    }
                    None => boundary += 1,
                }
            }
        }
        assert_eq!(boundary, 2 * (nx + ny));
    }

    #[test]
    fn test_encode_decode() {
        for k in [0, 1, 2, 7, 1000, 1 << 40] {
            for j in 0..3 {
                assert_eq!(
                    EncodedTriangleAdjacency::decode(EncodedTriangleAdjacency::encode(k, j)),
                    (k, j)
                );
            }
        }
        assert_eq!(EncodedTriangleAdjacency::encode(3, 2), 14);
    }

    #[test]
    fn test_encoded_matches_plain() {
        let mesh = grid(&GridOptions::new(ElementKind::Triangle, 4, 4));
        let plain = TriangleAdjacency::build(&mesh.triangles);
        let encoded = EncodedTriangleAdjacency::build(&mesh.triangles);
        assert_eq!(encoded.len(), plain.len());

        for t in 0..mesh.num_triangles() {
            for j in 0..3 {
                match encoded.neighbor(t, j) {
                    Some((k, i)) => {
                        assert_eq!(plain.neighbor(t, j), Some(k));
                        assert_eq!(encoded.neighbor(k, i), Some((t, j)));
                    }
                    None => assert_eq!(plain.neighbor(t, j), None),
                }
            }
        }
    }

    #[test]
    fn test_vertex_adjacency_grid() {
        let mesh = grid(&GridOptions::new(ElementKind::Triangle, 2, 2));
        let v2v = vertex_adjacency(&mesh);
        assert_eq!(v2v.len(), 9);

        let mut centre = v2v[4].clone();
        centre.sort_unstable();
        assert_eq!(centre, vec![0, 1, 3, 5, 7, 8]);

        let mut corner = v2v[2].clone();
        corner.sort_unstable();
        assert_eq!(corner, vec![1, 5]);
    }

    #[test]
    fn test_vertex_adjacency_quads() {
        let mesh = grid(&GridOptions::new(ElementKind::Quad, 2, 2));
        let v2v = vertex_adjacency(&mesh);
        let mut centre = v2v[4].clone();
        centre.sort_unstable();
        assert_eq!(centre, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_vertex_adjacency_ignores_polygons() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices = vec![0.0; 15];
        mesh.add_polygon(&[0, 1, 2, 3, 4]);
        let v2v = vertex_adjacency(&mesh);
        assert!(v2v.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_vertex_adjacency_drops_out_of_range() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices = vec![0.0; 9];
        mesh.add_triangle([0, 1, 7]);
        let v2v = vertex_adjacency(&mesh);
        assert_eq!(v2v, vec![vec![1], vec![0], vec![]]);
    }
}
