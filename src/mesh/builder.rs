//! Conversion between [`IndexedMesh`] and [`HalfMesh`].
//!
//! [`build`] reconstructs full half-edge topology from flat index arrays and
//! [`extract`] compacts a (possibly edited) half-edge mesh back into them.

use std::collections::HashMap;

use log::debug;

use super::halfedge::{HalfFace, HalfMesh};
use super::index::{FaceId, HalfEdgeId, MeshIndex, NodeId};
use super::indexed::{edge_key, IndexedMesh};

/// Build a half-edge mesh from an indexed mesh.
///
/// Positions are copied, so later changes to `mesh` are not seen by the
/// result. Faces are added in the order triangles, quads, polygons; each
/// node ends up storing the last outgoing half-edge created for it.
///
/// The input is not validated. Edges shared by more than two faces or
/// vertices with several disconnected fans produce unspecified topology and
/// may trip an assertion; see [`crate::validate::validate`] and
/// [`HalfMesh::is_valid`]. Empty polygon records are skipped.
///
/// # Example
/// ```
/// use meshweave::mesh::{build, HalfMesh, IndexedMesh};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
/// mesh.add_triangle([0, 1, 2]);
///
/// let hmesh: HalfMesh = build(&mesh);
/// assert_eq!(hmesh.num_nodes(), 3);
/// assert_eq!(hmesh.num_faces(), 1);
/// assert_eq!(hmesh.num_halfedges(), 6);
/// ```
pub fn build<I: MeshIndex>(mesh: &IndexedMesh) -> HalfMesh<I> {
    let incidences = mesh.triangles.len() + mesh.quads.len() + mesh.polygons.indices.len();
    let mut hmesh =
        HalfMesh::with_capacity(mesh.num_vertices(), incidences * 3 / 2, mesh.num_faces());

    for i in 0..mesh.num_vertices() {
        hmesh.add_node(mesh.vertex(i), i);
    }

    // Directed edges still waiting for their twin
    let mut pending: HashMap<u64, HalfEdgeId<I>> = HashMap::with_capacity(incidences);

    for i in 0..mesh.num_triangles() {
        add_face(&mut hmesh, &mut pending, &mesh.triangle(i), i);
    }
    for i in 0..mesh.num_quads() {
        add_face(&mut hmesh, &mut pending, &mesh.quad(i), i);
    }
    for i in 0..mesh.num_polygons() {
        add_face(&mut hmesh, &mut pending, mesh.polygon(i), i);
    }
    debug!("matched twins, {} half-edges left unpaired", pending.len());

    let ghosts = add_ghost_edges(&mut hmesh);
    link_boundary_loops(&mut hmesh, &ghosts);
    debug!(
        "built half-edge mesh: {} nodes, {} half-edges, {} faces, {} boundary edges",
        hmesh.num_nodes(),
        hmesh.num_halfedges(),
        hmesh.num_faces(),
        ghosts.len()
    );

    hmesh
}

/// Add one face: its half-edge cycle, node edges and twin links.
fn add_face<I: MeshIndex>(
    hmesh: &mut HalfMesh<I>,
    pending: &mut HashMap<u64, HalfEdgeId<I>>,
    face: &[usize],
    index: usize,
) {
    let k = face.len();
    if k == 0 {
        debug!("skipping empty face {}", index);
        return;
    }

    let face_id = FaceId::<I>::new(hmesh.num_faces());
    let first = HalfEdgeId::<I>::new(hmesh.num_halfedges());
    hmesh.faces.push(HalfFace::new(first, index));

    for j in 0..k {
        let p = face[j];
        let q = face[(j + 1) % k];
        let node = NodeId::new(p);
        let he = hmesh.add_halfedge(node, face_id);
        hmesh.node_mut(node).edge = he;

        if let Some(twin) = pending.remove(&edge_key(q, p)) {
            hmesh.pair(he, twin);
        } else {
            pending.insert(edge_key(p, q), he);
        }

        if j > 0 {
            hmesh.link(HalfEdgeId::new(he.index() - 1), he);
        }
    }
    hmesh.link(HalfEdgeId::new(first.index() + k - 1), first);
}

/// Give every unmatched half-edge a face-less twin starting at its destination.
fn add_ghost_edges<I: MeshIndex>(hmesh: &mut HalfMesh<I>) -> Vec<HalfEdgeId<I>> {
    let unmatched: Vec<HalfEdgeId<I>> = hmesh
        .halfedge_ids()
        .filter(|&he| !hmesh.twin(he).is_valid())
        .collect();

    unmatched
        .into_iter()
        .map(|he| {
            let dest = hmesh.origin(hmesh.next(he));
            let ghost = hmesh.add_halfedge(dest, FaceId::invalid());
            hmesh.pair(he, ghost);
            ghost
        })
        .collect()
}

/// Chain ghost half-edges into closed boundary loops.
///
/// The successor of a ghost `q -> p` is the ghost leaving `p`, found by
/// rotating around `p` through `prev -> twin` starting from the interior twin.
fn link_boundary_loops<I: MeshIndex>(hmesh: &mut HalfMesh<I>, ghosts: &[HalfEdgeId<I>]) {
    let limit = hmesh.num_halfedges();
    for &ghost in ghosts {
        debug_assert!(!hmesh.next(ghost).is_valid());

        let mut next = hmesh.twin(ghost);
        let mut steps = 0;
        while !hmesh.is_ghost(next) {
            next = hmesh.twin(hmesh.prev(next));
            steps += 1;
            assert!(
                steps <= limit,
                "no boundary successor for {:?}: non-manifold vertex",
                ghost
            );
        }
        hmesh.link(ghost, next);
    }
}

/// Extract an indexed mesh from a half-edge mesh.
///
/// Active nodes get new contiguous indices in arena order. Active faces are
/// written by arity into triangles, quads and polygons, and each ghost
/// half-edge contributes one boundary line `(origin, twin origin)`.
pub fn extract<I: MeshIndex>(hmesh: &HalfMesh<I>) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();

    let mut remap: Vec<Option<usize>> = vec![None; hmesh.num_nodes()];
    for n in hmesh.node_ids() {
        let node = hmesh.node(n);
        if !node.active {
            continue;
        }
        remap[n.index()] = Some(mesh.add_vertex(node.position));
    }

    for f in hmesh.face_ids() {
        if !hmesh.face(f).active {
            continue;
        }
        let indices: Vec<usize> = hmesh
            .face_nodes(f)
            .map(|n| remap[n.index()].expect("active face references a removed node"))
            .collect();
        mesh.add_face(&indices);
    }

    for he in hmesh.ghost_edges() {
        let p = remap[hmesh.origin(he).index()];
        let q = remap[hmesh.dest(he).index()];
        if let (Some(p), Some(q)) = (p, q) {
            mesh.add_line(p, q);
        }
    }

    debug!(
        "extracted {} vertices, {} faces, {} lines",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_lines()
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::vertex_adjacency;
    use crate::generate::{grid, icosahedron, ElementKind, GridOptions};
    use std::collections::HashSet;

    fn single_triangle() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0];
        mesh.add_triangle([0, 1, 2]);
        mesh
    }

    fn two_triangles() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.vertices = vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            0.5, -1.0, 0.0,
        ];
        mesh.add_triangle([0, 1, 2]);
        mesh.add_triangle([1, 0, 3]);
        mesh
    }

    fn undirected(mesh: &IndexedMesh) -> HashSet<(usize, usize)> {
        let mut edges = HashSet::new();
        let mut add = |face: &[usize]| {
            for j in 0..face.len() {
                let (p, q) = (face[j], face[(j + 1) % face.len()]);
                edges.insert((p.min(q), p.max(q)));
            }
        };
        for i in 0..mesh.num_triangles() {
            add(&mesh.triangle(i));
        }
        for i in 0..mesh.num_quads() {
            add(&mesh.quad(i));
        }
        for i in 0..mesh.num_polygons() {
            add(mesh.polygon(i));
        }
        edges
    }

    #[test]
    fn test_single_triangle() {
        let hmesh: HalfMesh<u32> = build(&single_triangle());

        assert_eq!(hmesh.num_nodes(), 3);
        assert_eq!(hmesh.num_faces(), 1);
        // 3 face half-edges + 3 ghosts
        assert_eq!(hmesh.num_halfedges(), 6);
        assert!(hmesh.is_valid());

        for n in hmesh.node_ids() {
            assert!(hmesh.is_boundary_node(n));
            assert_eq!(hmesh.valence(n), 2);
        }
        assert_eq!(hmesh.boundary_loops().len(), 1);
    }

    #[test]
    fn test_two_triangles() {
        let hmesh: HalfMesh<u32> = build(&two_triangles());

        assert_eq!(hmesh.num_nodes(), 4);
        assert_eq!(hmesh.num_faces(), 2);
        // 6 face half-edges + 4 ghosts
        assert_eq!(hmesh.num_halfedges(), 10);
        assert!(hmesh.is_valid());

        let shared = hmesh
            .halfedge_ids()
            .find(|&he| !hmesh.is_boundary_edge(he))
            .unwrap();
        let ends = [hmesh.origin(shared).index(), hmesh.dest(shared).index()];
        assert!(ends == [0, 1] || ends == [1, 0]);
    }

    #[test]
    fn test_grid_2x2_scenario() {
        let mesh = grid(&GridOptions::new(ElementKind::Triangle, 2, 2));
        let hmesh: HalfMesh = build(&mesh);

        assert_eq!(hmesh.num_nodes(), 9);
        assert_eq!(hmesh.num_faces(), 8);
        assert_eq!(hmesh.num_halfedges(), 32);
        assert_eq!(hmesh.ghost_edges().count(), 8);
        assert!(hmesh.is_valid());

        let loops = hmesh.boundary_loops();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 8);

        let out = extract(&hmesh);
        assert_eq!(out.vertices.len(), 27);
        assert_eq!(out.triangles.len(), 24);
        assert_eq!(out.lines.len(), 16);
        assert_eq!(out.vertices, mesh.vertices);
        assert_eq!(out.triangles, mesh.triangles);
    }

    #[test]
    fn test_quad_grid() {
        let mesh = grid(&GridOptions::new(ElementKind::Quad, 3, 2));
        let hmesh: HalfMesh = build(&mesh);

        // 6 quads = 24 face half-edges, perimeter 2 * (3 + 2) = 10
        assert_eq!(hmesh.num_faces(), 6);
        assert_eq!(hmesh.num_halfedges(), 34);
        assert!(hmesh.is_valid());
        for f in hmesh.face_ids() {
            assert_eq!(hmesh.face_arity(f), 4);
        }

        let out = extract(&hmesh);
        assert_eq!(out.quads, mesh.quads);
        assert_eq!(out.num_lines(), 10);
    }

    #[test]
    fn test_closed_mesh_has_no_ghosts() {
        let mesh = icosahedron();
        let hmesh: HalfMesh = build(&mesh);

        assert_eq!(hmesh.num_nodes(), 12);
        assert_eq!(hmesh.num_faces(), 20);
        assert_eq!(hmesh.num_halfedges(), 60);
        assert!(hmesh.is_valid());
        assert!(hmesh.boundary_loops().is_empty());
        for n in hmesh.node_ids() {
            assert_eq!(hmesh.valence(n), 5);
            assert_eq!(hmesh.face_ring(n).len(), 5);
        }
        assert_eq!(extract(&hmesh).num_lines(), 0);
    }

    #[test]
    fn test_mixed_arity() {
        // A pentagon surrounded by a triangle and a quad on two of its sides.
        let mut mesh = IndexedMesh::new();
        for p in [
            [0.0, 0.0],
            [2.0, 0.0],
            [3.0, 1.5],
            [1.0, 3.0],
            [-1.0, 1.5],
            [1.0, -1.0],
            [4.0, 0.0],
            [5.0, 1.0],
        ] {
            mesh.add_vertex(nalgebra::Point3::new(p[0], p[1], 0.0));
        }
        mesh.add_polygon(&[0, 1, 2, 3, 4]);
        mesh.add_triangle([1, 0, 5]);
        mesh.add_quad([1, 6, 7, 2]);

        let hmesh: HalfMesh = build(&mesh);
        // 5 + 3 + 4 face half-edges, 2 shared edges, 8 boundary edges
        assert_eq!(hmesh.num_halfedges(), 20);
        assert!(hmesh.is_valid());

        // triangles come first, then quads, then polygons
        assert_eq!(hmesh.face_arity(FaceId::new(0)), 3);
        assert_eq!(hmesh.face_arity(FaceId::new(1)), 4);
        assert_eq!(hmesh.face_arity(FaceId::new(2)), 5);
        assert_eq!(hmesh.face(FaceId::new(2)).index, 0);

        let out = extract(&hmesh);
        assert_eq!(out.num_triangles(), 1);
        assert_eq!(out.num_quads(), 1);
        assert_eq!(out.num_polygons(), 1);
        assert_eq!(out.polygon(0), &[0, 1, 2, 3, 4]);
        assert_eq!(undirected(&out), undirected(&mesh));
    }

    #[test]
    fn test_empty_polygon_is_skipped() {
        let mut mesh = single_triangle();
        mesh.add_polygon(&[]);
        assert_eq!(mesh.num_polygons(), 1);

        let hmesh: HalfMesh = build(&mesh);
        assert_eq!(hmesh.num_faces(), 1);
        assert_eq!(hmesh.num_halfedges(), 6);
        assert!(hmesh.is_valid());
        assert_eq!(extract(&hmesh).num_polygons(), 0);
    }

    #[test]
    fn test_two_boundary_loops() {
        // A ring of quads around a square hole.
        let mut mesh = IndexedMesh::new();
        for p in [
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 3.0],
            [0.0, 3.0],
            [1.0, 1.0],
            [2.0, 1.0],
            [2.0, 2.0],
            [1.0, 2.0],
        ] {
            mesh.add_vertex(nalgebra::Point3::new(p[0], p[1], 0.0));
        }
        mesh.add_quad([0, 1, 5, 4]);
        mesh.add_quad([1, 2, 6, 5]);
        mesh.add_quad([2, 3, 7, 6]);
        mesh.add_quad([3, 0, 4, 7]);

        let hmesh: HalfMesh = build(&mesh);
        assert!(hmesh.is_valid());

        let mut sizes: Vec<usize> = hmesh.boundary_loops().iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![4, 4]);

        for n in hmesh.node_ids() {
            assert!(hmesh.is_boundary_node(n));
            assert_eq!(hmesh.face_ring(n).len(), 2);
        }
    }

    #[test]
    fn test_ring_matches_vertex_adjacency() {
        let mesh = grid(&GridOptions::new(ElementKind::Triangle, 4, 3));
        let hmesh: HalfMesh = build(&mesh);
        let v2v = vertex_adjacency(&mesh);

        assert_eq!(v2v.len(), hmesh.num_nodes());
        for n in hmesh.node_ids() {
            let ring: HashSet<usize> = hmesh.node_ring(n).iter().map(|m| m.index()).collect();
            let expected: HashSet<usize> = v2v[n.index()].iter().copied().collect();
            assert_eq!(ring, expected, "ring of {:?}", n);
        }
    }

    #[test]
    fn test_positions_are_snapshots() {
        let mut mesh = two_triangles();
        let hmesh: HalfMesh = build(&mesh);
        mesh.vertices[0] = 42.0;
        assert_eq!(hmesh.position(NodeId::new(0)).x, 0.0);
    }

    #[test]
    fn test_extract_skips_deactivated() {
        let mesh = grid(&GridOptions::new(ElementKind::Triangle, 2, 2));
        let mut hmesh: HalfMesh = build(&mesh);
        hmesh.face_mut(FaceId::new(0)).active = false;

        let out = extract(&hmesh);
        assert_eq!(out.num_triangles(), 7);
        assert_eq!(out.num_vertices(), 9);
    }

    #[test]
    fn test_small_index_type() {
        let mesh = grid(&GridOptions::new(ElementKind::Triangle, 5, 5));
        let hmesh: HalfMesh<u16> = build(&mesh);
        assert!(hmesh.is_valid());
        assert_eq!(extract(&hmesh).triangles, mesh.triangles);
    }
}
