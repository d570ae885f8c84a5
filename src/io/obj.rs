//! Wavefront OBJ output.
//!
//! Writes vertices, then triangles, quads and polygons as `f` records, then
//! line segments as `l` records. Indices are 1-based as OBJ requires.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::{MeshError, Result};
use crate::mesh::IndexedMesh;

/// Write a mesh as OBJ text to any writer.
pub fn write_obj<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> Result<()> {
    for i in 0..mesh.num_vertices() {
        let p = mesh.vertex(i);
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    for i in 0..mesh.num_triangles() {
        write_record(writer, "f", &mesh.triangle(i))?;
    }
    for i in 0..mesh.num_quads() {
        write_record(writer, "f", &mesh.quad(i))?;
    }
    for polygon in mesh.polygons.iter() {
        write_record(writer, "f", polygon)?;
    }
    for i in 0..mesh.num_lines() {
        write_record(writer, "l", &mesh.line(i))?;
    }
    Ok(())
}

fn write_record<W: Write>(writer: &mut W, tag: &str, indices: &[usize]) -> Result<()> {
    write!(writer, "{tag}")?;
    for v in indices {
        write!(writer, " {}", v + 1)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Render a mesh as OBJ text.
pub fn to_obj_string(mesh: &IndexedMesh) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec<u8> cannot fail.
    let _ = write_obj(mesh, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Save a mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use meshweave::generate::icosahedron;
/// use meshweave::io::obj;
///
/// obj::save(&icosahedron(), "icosahedron.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;

    debug!(
        "wrote {}: {} vertices, {} faces, {} lines",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_lines()
    );
    Ok(())
}
