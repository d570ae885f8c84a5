//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for polygon meshes of mixed arity. Nodes, half-edges and faces are stored in
//! three arenas and refer to each other through typed handles.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin**, **next** and **prev** around its face,
//!   its **origin node** and its **incident face**
//! - Each node stores one outgoing half-edge
//! - Each face stores one half-edge of its cycle
//!
//! # Boundary Handling
//!
//! Every mesh-boundary edge is paired with a face-less *ghost* half-edge. Ghost
//! edges are chained through `next`/`prev` into closed boundary loops, which
//! is what lets a ring walk around a boundary node close on itself.
//!
//! # Removal
//!
//! Elements are never removed from the arenas. Local edits clear the `active`
//! flag instead, and [`extract`](super::extract) compacts the survivors.

use nalgebra::Point3;

use super::index::{FaceId, HalfEdgeId, MeshIndex, NodeId};

/// A node (vertex) in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct HalfNode<I: MeshIndex = u32> {
    /// Position, copied from the source mesh at construction.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this node.
    pub edge: HalfEdgeId<I>,

    /// Index of the vertex this node was built from.
    pub index: usize,

    /// Cleared when the node is removed by an edit.
    pub active: bool,
}

impl<I: MeshIndex> HalfNode<I> {
    /// Create a new isolated node.
    pub fn new(position: Point3<f64>, index: usize) -> Self {
        Self {
            position,
            edge: HalfEdgeId::invalid(),
            index,
            active: true,
        }
    }
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The node this half-edge originates from.
    pub node: NodeId<I>,

    /// The face this half-edge belongs to. Null for ghost edges.
    pub face: FaceId<I>,

    /// The oppositely directed half-edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face or boundary loop.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face or boundary loop.
    pub prev: HalfEdgeId<I>,

    /// Cleared when the half-edge is removed by an edit.
    pub active: bool,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new unlinked half-edge.
    pub fn new(node: NodeId<I>, face: FaceId<I>) -> Self {
        Self {
            node,
            face,
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            active: true,
        }
    }

    /// Check if this is a ghost (face-less boundary) half-edge.
    #[inline]
    pub fn is_ghost(&self) -> bool {
        !self.face.is_valid()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfFace<I: MeshIndex = u32> {
    /// One half-edge of this face's cycle.
    pub edge: HalfEdgeId<I>,

    /// Index of the face within its kind (triangle, quad, polygon) in the
    /// source mesh.
    pub index: usize,

    /// Cleared when the face is removed by an edit.
    pub active: bool,
}

impl<I: MeshIndex> HalfFace<I> {
    /// Create a new face.
    pub fn new(edge: HalfEdgeId<I>, index: usize) -> Self {
        Self {
            edge,
            index,
            active: true,
        }
    }
}

/// A half-edge mesh over arenas of nodes, half-edges and faces.
#[derive(Debug, Clone)]
pub struct HalfMesh<I: MeshIndex = u32> {
    pub(crate) nodes: Vec<HalfNode<I>>,
    pub(crate) edges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<HalfFace<I>>,
}

impl<I: MeshIndex> Default for HalfMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_nodes: usize, num_halfedges: usize, num_faces: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(num_nodes),
            edges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Number of node slots, including deactivated ones.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of half-edge slots, including deactivated ones.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.edges.len()
    }

    /// Number of face slots, including deactivated ones.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of active nodes.
    pub fn num_active_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.active).count()
    }

    /// Number of active faces.
    pub fn num_active_faces(&self) -> usize {
        self.faces.iter().filter(|f| f.active).count()
    }

    /// Get a node by handle.
    #[inline]
    pub fn node(&self, id: NodeId<I>) -> &HalfNode<I> {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by handle.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId<I>) -> &mut HalfNode<I> {
        &mut self.nodes[id.index()]
    }

    /// Get a half-edge by handle.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.edges[id.index()]
    }

    /// Get a mutable half-edge by handle.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.edges[id.index()]
    }

    /// Get a face by handle.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &HalfFace<I> {
        &self.faces[id.index()]
    }

    /// Get a mutable face by handle.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId<I>) -> &mut HalfFace<I> {
        &mut self.faces[id.index()]
    }

    /// Get the position of a node.
    #[inline]
    pub fn position(&self, n: NodeId<I>) -> &Point3<f64> {
        &self.node(n).position
    }

    // ==================== Topology Queries ====================

    /// Get the twin half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin node of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> NodeId<I> {
        self.halfedge(he).node
    }

    /// Get the destination node of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> NodeId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge (null for ghost edges).
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Check if a half-edge is a ghost (boundary) half-edge.
    #[inline]
    pub fn is_ghost(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_ghost()
    }

    /// Check if an edge (represented by one of its half-edges) is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, he: HalfEdgeId<I>) -> bool {
        self.is_ghost(he) || self.is_ghost(self.twin(he))
    }

    /// Check if a node lies on the mesh boundary.
    ///
    /// Isolated nodes count as boundary nodes.
    pub fn is_boundary_node(&self, n: NodeId<I>) -> bool {
        if !self.node(n).edge.is_valid() {
            return true;
        }
        self.node_edges(n).any(|he| self.is_ghost(he))
    }

    // ==================== Iteration ====================

    /// Iterate over all node handles.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId<I>> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Iterate over all half-edge handles.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.edges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face handles.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over active ghost half-edges.
    pub fn ghost_edges(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedge_ids().filter(move |&he| {
            let e = self.halfedge(he);
            e.active && e.is_ghost()
        })
    }

    /// Iterate over the outgoing half-edges of a node (its edge ring).
    pub fn node_edges(&self, n: NodeId<I>) -> NodeRingIter<'_, I> {
        NodeRingIter::new(self, n)
    }

    /// Iterate over the nodes adjacent to a node.
    pub fn node_neighbors(&self, n: NodeId<I>) -> impl Iterator<Item = NodeId<I>> + '_ {
        self.node_edges(n).map(move |he| self.dest(he))
    }

    /// Iterate over the faces incident to a node, skipping ghost edges.
    pub fn node_faces(&self, n: NodeId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.node_edges(n).filter_map(move |he| {
            let f = self.face_of(he);
            f.is_valid().then_some(f)
        })
    }

    /// Nodes adjacent to `n`, in ring order.
    pub fn node_ring(&self, n: NodeId<I>) -> Vec<NodeId<I>> {
        self.node_neighbors(n).collect()
    }

    /// Outgoing half-edges of `n`, in ring order.
    pub fn edge_ring(&self, n: NodeId<I>) -> Vec<HalfEdgeId<I>> {
        self.node_edges(n).collect()
    }

    /// Faces incident to `n`, in ring order.
    pub fn face_ring(&self, n: NodeId<I>) -> Vec<FaceId<I>> {
        self.node_faces(n).collect()
    }

    /// Number of edges incident to a node.
    pub fn valence(&self, n: NodeId<I>) -> usize {
        self.node_edges(n).count()
    }

    /// Iterate over the half-edges of a face.
    pub fn face_edges(&self, f: FaceId<I>) -> FaceCycleIter<'_, I> {
        FaceCycleIter::new(self, self.face(f).edge)
    }

    /// Iterate over the nodes of a face.
    pub fn face_nodes(&self, f: FaceId<I>) -> impl Iterator<Item = NodeId<I>> + '_ {
        self.face_edges(f).map(move |he| self.origin(he))
    }

    /// Number of sides of a face.
    pub fn face_arity(&self, f: FaceId<I>) -> usize {
        self.face_edges(f).count()
    }

    /// Collect the closed boundary loops, each as a chain of ghost half-edges.
    pub fn boundary_loops(&self) -> Vec<Vec<HalfEdgeId<I>>> {
        let mut visited = vec![false; self.edges.len()];
        let mut loops = Vec::new();
        for start in self.ghost_edges() {
            if visited[start.index()] {
                continue;
            }
            let boundary: Vec<_> = FaceCycleIter::new(self, start).collect();
            for he in &boundary {
                visited[he.index()] = true;
            }
            loops.push(boundary);
        }
        loops
    }

    // ==================== Construction ====================

    /// Add a new isolated node and return its handle.
    pub fn add_node(&mut self, position: Point3<f64>, index: usize) -> NodeId<I> {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(HalfNode::new(position, index));
        id
    }

    /// Add a new unlinked half-edge and return its handle.
    pub(crate) fn add_halfedge(&mut self, node: NodeId<I>, face: FaceId<I>) -> HalfEdgeId<I> {
        let id = HalfEdgeId::new(self.edges.len());
        self.edges.push(HalfEdge::new(node, face));
        id
    }

    /// Link `a -> b` in a `next`/`prev` chain.
    #[inline]
    pub(crate) fn link(&mut self, a: HalfEdgeId<I>, b: HalfEdgeId<I>) {
        self.halfedge_mut(a).next = b;
        self.halfedge_mut(b).prev = a;
    }

    /// Make `a` and `b` twins of each other.
    #[inline]
    pub(crate) fn pair(&mut self, a: HalfEdgeId<I>, b: HalfEdgeId<I>) {
        self.halfedge_mut(a).twin = b;
        self.halfedge_mut(b).twin = a;
    }

    // ==================== Validation ====================

    /// Check that the connectivity of all active elements is consistent.
    ///
    /// Besides the twin, `next`/`prev` and face links, this requires the ring
    /// of every node to reach all half-edges leaving it, so a vertex where
    /// separate fans meet is reported as invalid.
    pub fn is_valid(&self) -> bool {
        for (i, n) in self.nodes.iter().enumerate() {
            if !n.active || !n.edge.is_valid() {
                continue;
            }
            let e = self.halfedge(n.edge);
            if !e.active || e.node.index() != i {
                return false;
            }
        }

        for he in self.halfedge_ids() {
            let e = self.halfedge(he);
            if !e.active {
                continue;
            }
            if !e.twin.is_valid() || !e.next.is_valid() || !e.prev.is_valid() {
                return false;
            }
            let twin = self.halfedge(e.twin);
            if !twin.active || twin.twin != he || twin.node == e.node {
                return false;
            }
            if self.prev(e.next) != he || self.next(e.prev) != he {
                return false;
            }
            // the next edge starts where this one ends
            if self.origin(e.next) != twin.node {
                return false;
            }
            if self.face_of(e.next) != e.face {
                return false;
            }
            if e.face.is_valid() && !self.face(e.face).active {
                return false;
            }
        }

        for f in self.face_ids() {
            let face = self.face(f);
            if !face.active {
                continue;
            }
            if !face.edge.is_valid() || self.face_of(face.edge) != f {
                return false;
            }
            // a broken cycle would never return to the start
            let mut he = face.edge;
            let mut steps = 0;
            loop {
                he = self.next(he);
                steps += 1;
                if he == face.edge {
                    break;
                }
                if steps > self.edges.len() {
                    return false;
                }
            }
        }

        // every outgoing half-edge of a node lies on its ring
        let mut outgoing = vec![0usize; self.nodes.len()];
        for e in self.edges.iter().filter(|e| e.active) {
            outgoing[e.node.index()] += 1;
        }
        for (i, n) in self.nodes.iter().enumerate() {
            if !n.active {
                continue;
            }
            if !n.edge.is_valid() {
                if outgoing[i] != 0 {
                    return false;
                }
                continue;
            }
            let mut he = n.edge;
            let mut valence = 0;
            loop {
                he = self.next(self.twin(he));
                valence += 1;
                if he == n.edge {
                    break;
                }
                if valence > outgoing[i] {
                    return false;
                }
            }
            if valence != outgoing[i] {
                return false;
            }
        }

        true
    }
}

/// Iterator over the outgoing half-edges of a node (`twin -> next` walk).
pub struct NodeRingIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> NodeRingIter<'a, I> {
    fn new(mesh: &'a HalfMesh<I>, n: NodeId<I>) -> Self {
        let start = mesh.node(n).edge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for NodeRingIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // If he goes v -> w, twin(he) goes w -> v and next(twin(he)) is the
        // following outgoing half-edge of v.
        let twin = self.mesh.twin(self.current);
        assert!(twin.is_valid(), "ring walk reached {:?} without a twin", self.current);
        self.current = self.mesh.next(twin);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over a `next` cycle: the half-edges of a face or a boundary loop.
pub struct FaceCycleIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceCycleIter<'a, I> {
    pub(crate) fn new(mesh: &'a HalfMesh<I>, start: HalfEdgeId<I>) -> Self {
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceCycleIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start || !self.current.is_valid() {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build, IndexedMesh};

    /// A single triangle wired by hand, with its three ghost edges.
    fn hand_built_triangle() -> HalfMesh<u32> {
        let mut mesh = HalfMesh::new();
        let n: Vec<NodeId> = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
            .iter()
            .enumerate()
            .map(|(i, p)| mesh.add_node(Point3::new(p[0], p[1], 0.0), i))
            .collect();

        let f = FaceId::new(0);
        let e: Vec<HalfEdgeId> = (0..3).map(|i| mesh.add_halfedge(n[i], f)).collect();
        mesh.faces.push(HalfFace::new(e[0], 0));
        let g: Vec<HalfEdgeId> = (0..3)
            .map(|i| mesh.add_halfedge(n[(i + 1) % 3], FaceId::invalid()))
            .collect();

        for i in 0..3 {
            mesh.link(e[i], e[(i + 1) % 3]);
            mesh.pair(e[i], g[i]);
            mesh.node_mut(n[i]).edge = e[i];
        }
        // ghost loop runs the other way round
        mesh.link(g[0], g[2]);
        mesh.link(g[2], g[1]);
        mesh.link(g[1], g[0]);
        mesh
    }

    #[test]
    fn test_node_creation() {
        let n = HalfNode::<u32>::new(Point3::new(1.0, 2.0, 3.0), 4);
        assert_eq!(n.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(n.index, 4);
        assert!(n.active);
        assert!(!n.edge.is_valid());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfMesh::<u32>::new();
        assert_eq!(mesh.num_nodes(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
        assert!(mesh.boundary_loops().is_empty());
    }

    #[test]
    fn test_hand_built_triangle() {
        let mesh = hand_built_triangle();
        assert!(mesh.is_valid());

        let f = FaceId::new(0);
        assert_eq!(mesh.face_arity(f), 3);
        let nodes: Vec<usize> = mesh.face_nodes(f).map(|n| n.index()).collect();
        assert_eq!(nodes, vec![0, 1, 2]);

        let loops = mesh.boundary_loops();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 3);
    }

    #[test]
    fn test_ring_of_corner_closes() {
        let mesh = hand_built_triangle();
        let n0 = NodeId::new(0);

        // e0 (0->1), then the ghost 0->2
        assert_eq!(mesh.valence(n0), 2);
        let mut ring: Vec<usize> = mesh.node_ring(n0).iter().map(|n| n.index()).collect();
        ring.sort_unstable();
        assert_eq!(ring, vec![1, 2]);
        assert_eq!(mesh.face_ring(n0), vec![FaceId::new(0)]);
        assert!(mesh.is_boundary_node(n0));
    }

    #[test]
    fn test_broken_twin_is_invalid() {
        let mut mesh = hand_built_triangle();
        mesh.halfedge_mut(HalfEdgeId::new(3)).twin = HalfEdgeId::new(4);
        assert!(!mesh.is_valid());
    }

    #[test]
    #[should_panic(expected = "without a twin")]
    fn test_ring_walk_asserts_twin() {
        let mut mesh = hand_built_triangle();
        mesh.halfedge_mut(HalfEdgeId::new(0)).twin = HalfEdgeId::invalid();
        let _ = mesh.edge_ring(NodeId::new(0));
    }

    #[test]
    fn test_bowtie_vertex_is_invalid() {
        // two triangles meeting only at node 0
        let mut indexed = IndexedMesh::new();
        indexed.vertices = vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, -1.0, 0.0, 0.0, -1.0, -1.0, 0.0,
        ];
        indexed.add_triangle([0, 1, 2]);
        indexed.add_triangle([0, 3, 4]);

        let mesh: HalfMesh = build(&indexed);
        // the ring only sees one fan of the two
        assert_eq!(mesh.valence(NodeId::new(0)), 2);
        assert_eq!(mesh.edges.iter().filter(|e| e.node == NodeId::new(0)).count(), 4);
        assert!(!mesh.is_valid());
    }
}
