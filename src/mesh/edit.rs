//! Local topological edits on a [`HalfMesh`].
//!
//! Both edits work in place on the arenas. Removed elements are only
//! deactivated; [`extract`](super::extract) drops them.

use std::collections::HashSet;

use log::debug;
use nalgebra::Point3;

use super::halfedge::HalfMesh;
use super::index::{HalfEdgeId, MeshIndex, NodeId};
use crate::error::{MeshError, Result};

/// The three half-edges of the triangle on one side of an edge.
#[derive(Debug, Clone, Copy)]
struct Wing<I: MeshIndex> {
    /// The half-edge after the edge, leaving its destination.
    after: HalfEdgeId<I>,
    /// The half-edge before the edge, arriving at its origin.
    before: HalfEdgeId<I>,
    /// The node opposite the edge.
    apex: NodeId<I>,
}

impl<I: MeshIndex> HalfMesh<I> {
    /// The triangle wing of `he`, or `None` for a ghost edge.
    fn wing(&self, he: HalfEdgeId<I>) -> Result<Option<Wing<I>>> {
        let f = self.face_of(he);
        if !f.is_valid() {
            return Ok(None);
        }
        if !self.face(f).active {
            return Err(MeshError::Inactive(format!("{:?}", f)));
        }
        let arity = self.face_arity(f);
        if arity != 3 {
            return Err(MeshError::NotTriangle {
                face: f.index(),
                arity,
            });
        }
        let after = self.next(he);
        Ok(Some(Wing {
            after,
            before: self.prev(he),
            apex: self.dest(after),
        }))
    }

    fn check_active_edge(&self, he: HalfEdgeId<I>) -> Result<()> {
        if !self.halfedge(he).active {
            return Err(MeshError::Inactive(format!("{:?}", he)));
        }
        for n in [self.origin(he), self.dest(he)] {
            if !self.node(n).active {
                return Err(MeshError::Inactive(format!("{:?}", n)));
            }
        }
        Ok(())
    }

    /// Flip an interior edge shared by two triangles.
    ///
    /// The triangles `(p, q, a)` and `(q, p, b)` on either side of `he = p -> q`
    /// become `(a, b, q)` and `(b, a, p)`. Only the six half-edges and two faces
    /// of those triangles are rewired; `he` afterwards runs `a -> b`.
    ///
    /// Boundary edges, edges next to non-triangular faces, and flips that would
    /// duplicate an existing edge `a - b` are rejected.
    pub fn flip_edge(&mut self, he: HalfEdgeId<I>) -> Result<()> {
        self.check_active_edge(he)?;
        let twin = self.twin(he);
        let (p, q) = (self.origin(he), self.origin(twin));

        let (Some(w0), Some(w1)) = (self.wing(he)?, self.wing(twin)?) else {
            debug!("rejected flip of boundary edge {:?}", he);
            return Err(MeshError::BoundaryEdge {
                v0: p.index(),
                v1: q.index(),
            });
        };
        let (a, b) = (w0.apex, w1.apex);
        if a == b || self.node_neighbors(a).any(|n| n == b) {
            debug!("rejected flip of {:?} onto an existing edge", he);
            return Err(MeshError::NonManifoldEdge {
                v0: a.index(),
                v1: b.index(),
            });
        }

        let f0 = self.face_of(he);
        let f1 = self.face_of(twin);

        // (a, b, q): he, twin.before, he.after
        self.halfedge_mut(he).node = a;
        self.link(he, w1.before);
        self.link(w1.before, w0.after);
        self.link(w0.after, he);
        self.halfedge_mut(w1.before).face = f0;

        // (b, a, p): twin, he.before, twin.after
        self.halfedge_mut(twin).node = b;
        self.link(twin, w0.before);
        self.link(w0.before, w1.after);
        self.link(w1.after, twin);
        self.halfedge_mut(w0.before).face = f1;

        self.face_mut(f0).edge = he;
        self.face_mut(f1).edge = twin;

        // p and q may have stored the half-edges that now start elsewhere
        self.node_mut(p).edge = w1.after;
        self.node_mut(q).edge = w0.after;
        self.node_mut(a).edge = w0.before;
        self.node_mut(b).edge = w1.before;

        Ok(())
    }

    /// Collapse an edge, merging its destination into its origin.
    ///
    /// The surviving node moves to the edge midpoint. The triangles on either
    /// side of the edge, the removed node and the collapsed half-edges are
    /// deactivated, the remaining side edges of each removed triangle are
    /// merged into one edge, and every half-edge that started at the removed
    /// node is re-rooted at the survivor. Returns the surviving node.
    ///
    /// The collapse is rejected when it would break manifoldness:
    /// - a face on either side is not a triangle,
    /// - the endpoints share a neighbor that is not the apex of one of those
    ///   triangles,
    /// - the edge is interior but both endpoints are on the boundary,
    /// - an apex would be left with a fin or a dangling edge.
    pub fn collapse_edge(&mut self, he: HalfEdgeId<I>) -> Result<NodeId<I>> {
        self.check_active_edge(he)?;
        let twin = self.twin(he);
        let (p, q) = (self.origin(he), self.origin(twin));
        let reject = |reason: &'static str| {
            debug!("rejected collapse of {:?}: {}", he, reason);
            MeshError::NonManifoldCollapse {
                v0: p.index(),
                v1: q.index(),
                reason,
            }
        };

        let w0 = self.wing(he)?;
        let w1 = self.wing(twin)?;

        let apexes: HashSet<NodeId<I>> = w0.iter().chain(w1.iter()).map(|w| w.apex).collect();
        let p_ring: HashSet<NodeId<I>> = self.node_neighbors(p).collect();
        let shared: HashSet<NodeId<I>> = self
            .node_neighbors(q)
            .filter(|n| p_ring.contains(n))
            .collect();
        if shared != apexes {
            return Err(reject("endpoints share a neighbor outside the edge's triangles"));
        }
        if !self.is_boundary_edge(he) && self.is_boundary_node(p) && self.is_boundary_node(q) {
            return Err(reject("interior edge joins two boundary nodes"));
        }
        for &apex in &apexes {
            let min_valence = if self.is_boundary_node(apex) { 3 } else { 4 };
            if self.valence(apex) < min_valence {
                return Err(reject("apex would be left degenerate"));
            }
        }

        // Gather before any rewiring, the ring walk needs intact topology.
        let q_edges = self.edge_ring(q);

        let mut removed = vec![he, twin];
        for (edge, wing) in [(he, w0), (twin, w1)] {
            match wing {
                Some(w) => {
                    // before: apex -> (p | q), after: (q | p) -> apex
                    let outer_before = self.twin(w.before);
                    let outer_after = self.twin(w.after);
                    self.pair(outer_before, outer_after);
                    self.face_mut(self.face_of(edge)).active = false;
                    self.node_mut(w.apex).edge = outer_after;
                    removed.extend([w.before, w.after]);
                }
                None => {
                    let (prev, next) = (self.prev(edge), self.next(edge));
                    self.link(prev, next);
                }
            }
        }
        for &e in &removed {
            self.halfedge_mut(e).active = false;
        }

        for e in q_edges {
            if self.halfedge(e).active {
                self.halfedge_mut(e).node = p;
            }
        }

        // the outer twin of a removed `before` edge now leaves p
        let survivor = match w0.or(w1) {
            Some(w) => self.twin(w.before),
            None => unreachable!("an edge always has a face on one side"),
        };
        debug_assert!(self.halfedge(survivor).active && self.origin(survivor) == p);
        let midpoint = Point3::from((self.position(p).coords + self.position(q).coords) * 0.5);
        let node = self.node_mut(p);
        node.edge = survivor;
        node.position = midpoint;

        let removed_node = self.node_mut(q);
        removed_node.active = false;
        removed_node.edge = HalfEdgeId::invalid();

        Ok(p)
    }
}
