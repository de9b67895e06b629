//! Binary STL export.
//!
//! An 80-byte header and a little-endian triangle count, then 50 bytes per facet: the
//! facet normal, three vertex positions (all `f32`) and an unused `u16` attribute.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{error::Result, mesh::MarchMesh, types::Value};

const HEADER: &[u8] = b"binary STL written by spholyhedra";

/// Writes `mesh` as binary STL to `writer`.
pub fn write_stl<W: Write>(mesh: &MarchMesh, writer: &mut W) -> Result<()> {
    let mut header = [0u8; 80];
    header[..HEADER.len()].copy_from_slice(HEADER);
    writer.write_all(&header)?;

    writer.write_all(&(mesh.triangle_count() as u32).to_le_bytes())?;

    for tri in 0..mesh.triangle_count() {
        let n = mesh.tri_normal(tri);
        write_vec3(writer, [n.x, n.y, n.z])?;
        for v in mesh.tri_coords(tri) {
            write_vec3(writer, [v.x, v.y, v.z])?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Creates (or truncates) the file at `path` and writes `mesh` into it.
pub fn save_stl(mesh: &MarchMesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_stl(mesh, &mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), triangles = mesh.triangle_count(), "wrote STL");
    Ok(())
}

fn write_vec3<W: Write>(writer: &mut W, v: [Value; 3]) -> Result<()> {
    for c in v {
        writer.write_all(&(c as f32).to_le_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn read_f32(buf: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
    }

    #[test]
    fn layout_matches_triangle_count() {
        let mesh = MarchMesh::build(vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 2.0),
        ])
        .unwrap();

        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf).unwrap();

        assert_eq!(buf.len(), 80 + 4 + 2 * 50);
        assert!(buf.starts_with(HEADER));
        assert_eq!(u32::from_le_bytes([buf[80], buf[81], buf[82], buf[83]]), 2);

        // First facet: normal +Z, second vertex at (1, 0, 0).
        assert_eq!(read_f32(&buf, 84 + 8), 1.0);
        assert_eq!(read_f32(&buf, 84 + 24), 1.0);
        // Second facet's last vertex z.
        assert_eq!(read_f32(&buf, 84 + 50 + 44), 2.0);
    }

    #[test]
    fn empty_mesh_is_header_only() {
        let mut buf = Vec::new();
        write_stl(&MarchMesh::new_empty(), &mut buf).unwrap();
        assert_eq!(buf.len(), 84);
    }
}
