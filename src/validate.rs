//! Structural checks on an [`IndexedMesh`] before half-edge construction.
//!
//! [`build`](crate::mesh::build) trusts its input: an out-of-range index
//! panics and a non-manifold edge can trip an internal assertion. Callers
//! that load meshes from untrusted sources should run [`validate`] first.

use std::collections::HashSet;

use log::warn;

use crate::error::{MeshError, Result};
use crate::mesh::{edge_key, IndexedMesh};

/// Check a mesh for everything half-edge construction assumes.
///
/// In order:
/// - flat arrays have lengths that are multiples of their arity, and the
///   polygon run-length arrays agree with each other;
/// - every face and line index refers to an existing vertex;
/// - no face repeats a vertex, and polygons have at least three;
/// - no directed edge appears in two faces;
/// - no vertex starts more than one boundary edge.
///
/// The directed edge check also catches undirected edges shared by more than
/// two faces, since a third face has to repeat one of the two directions. The
/// boundary check rejects vertices where separate fans touch, such as the
/// shared corner of two triangles that have no edge in common. Closed fans
/// pinched at a vertex are not detected here; [`HalfMesh::is_valid`] reports
/// them after construction.
///
/// [`HalfMesh::is_valid`]: crate::mesh::HalfMesh::is_valid
pub fn validate(mesh: &IndexedMesh) -> Result<()> {
    check_arity("vertex", mesh.vertices.len(), 3)?;
    check_arity("line", mesh.lines.len(), 2)?;
    check_arity("triangle", mesh.triangles.len(), 3)?;
    check_arity("quad", mesh.quads.len(), 4)?;

    let polygons = &mesh.polygons;
    if polygons.first.len() != polygons.size.len() {
        return Err(MeshError::invalid_param(
            "polygons.size",
            polygons.size.len(),
            "must have one entry per polygon",
        ));
    }
    for (i, (&first, &size)) in polygons.first.iter().zip(&polygons.size).enumerate() {
        if first + size > polygons.indices.len() {
            return Err(MeshError::invalid_param(
                "polygons.first",
                i,
                "polygon runs past the end of the index array",
            ));
        }
    }

    let n = mesh.num_vertices();
    for i in 0..mesh.num_lines() {
        for v in mesh.line(i) {
            if v >= n {
                return Err(MeshError::InvalidVertexIndex {
                    kind: "line",
                    face: i,
                    vertex: v,
                });
            }
        }
    }

    let faces = (0..mesh.num_triangles())
        .map(|i| ("triangle", i, &mesh.triangles[3 * i..3 * i + 3]))
        .chain((0..mesh.num_quads()).map(|i| ("quad", i, &mesh.quads[4 * i..4 * i + 4])))
        .chain((0..mesh.num_polygons()).map(|i| ("polygon", i, mesh.polygon(i))));

    let mut directed = HashSet::with_capacity(mesh.triangles.len() + mesh.quads.len());
    for (kind, face, nodes) in faces {
        check_face(kind, face, nodes, n)?;
        for (k, &p) in nodes.iter().enumerate() {
            let q = nodes[(k + 1) % nodes.len()];
            if !directed.insert(edge_key(p, q)) {
                warn!("directed edge ({}, {}) used by two faces", p, q);
                return Err(MeshError::NonManifoldEdge { v0: p, v1: q });
            }
        }
    }

    // a boundary edge is a face edge whose reverse belongs to no face
    let mut boundary_out = vec![0usize; n];
    for &key in &directed {
        let (p, q) = ((key >> 32) as usize, (key & 0xffff_ffff) as usize);
        if !directed.contains(&edge_key(q, p)) {
            boundary_out[p] += 1;
        }
    }
    if let Some(vertex) = boundary_out.iter().position(|&count| count > 1) {
        warn!("vertex {} joins {} boundary fans", vertex, boundary_out[vertex]);
        return Err(MeshError::NonManifoldVertex { vertex });
    }

    Ok(())
}

fn check_arity(kind: &'static str, len: usize, arity: usize) -> Result<()> {
    if len % arity != 0 {
        return Err(MeshError::InvalidArity { kind, len, arity });
    }
    Ok(())
}

fn check_face(
    kind: &'static str,
    face: usize,
    nodes: &[usize],
    num_vertices: usize,
) -> Result<()> {
    if let Some(&vertex) = nodes.iter().find(|&&v| v >= num_vertices) {
        return Err(MeshError::InvalidVertexIndex { kind, face, vertex });
    }
    let repeated = nodes
        .iter()
        .enumerate()
        .any(|(k, v)| nodes[k + 1..].contains(v));
    if nodes.len() < 3 || repeated {
        return Err(MeshError::DegenerateFace { kind, face });
    }
    Ok(())
}
