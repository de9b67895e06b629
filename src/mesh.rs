use crate::{
    error::{Result, SpholyError},
    types::{Bounds, Point, Vector},
};

/// Triangle soup produced by the marching cubes algorithm.
///
/// Vertices are stored flat: every group of three consecutive vertices forms one triangle.
/// Call [`create_triangles`](MarchMesh::create_triangles) then
/// [`create_normals`](MarchMesh::create_normals) after populating vertices, or use
/// [`MarchMesh::build`] which does both.
#[derive(Debug, Clone, Default)]
pub struct MarchMesh {
    /// Flat list of vertex positions.
    pub vertices: Vec<Point>,

    /// Triangle index triples into `vertices`: `[[v0, v1, v2], ...]`
    pub tris: Vec<[usize; 3]>,

    /// Per-vertex face normals.
    pub normals: Vec<Vector>,
}

impl MarchMesh {
    /// Creates an empty mesh with no vertices, triangles, or normals.
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Builds triangles and normals from a flat vertex list.
    pub fn build(vertices: Vec<Point>) -> Result<Self> {
        let mut mesh = Self::new_empty();
        mesh.set_vertices(vertices);
        mesh.create_triangles()?;
        mesh.create_normals();
        Ok(mesh)
    }

    pub fn triangle_count(&self) -> usize {
        self.tris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tris.is_empty()
    }

    /// Adds a triangle defined by three vertex indices.
    ///
    /// Returns [`SpholyError::InvalidIndex`] if any index is out of bounds.
    pub fn triangle_from_verts(&mut self, x: usize, y: usize, z: usize) -> Result<()> {
        if self.vertices.len() <= x.max(y.max(z)) {
            return Err(SpholyError::InvalidIndex);
        }
        self.tris.push([x, y, z]);
        Ok(())
    }

    /// Returns the three vertex positions of triangle `tri`.
    pub fn tri_coords(&self, tri: usize) -> [Point; 3] {
        self.tris[tri].map(|v| self.vertices[v])
    }

    /// Computes the face normal for triangle `tri`.
    ///
    /// Returns the zero vector if the triangle is degenerate.
    pub fn tri_normal(&self, tri: usize) -> Vector {
        let [a, b, c] = self.tri_coords(tri);

        let v_a_b = b - a;
        let v_b_c = c - b;

        let cross = v_a_b.cross(&v_b_c);

        let nrm = cross.norm();
        if nrm == 0.0 {
            Vector::zeros()
        } else {
            cross / nrm
        }
    }

    /// Generates triangles by grouping every three consecutive vertices.
    ///
    /// Must be called after [`set_vertices`](MarchMesh::set_vertices).
    /// A trailing group of fewer than three vertices is reported as
    /// [`SpholyError::InvalidIndex`].
    pub fn create_triangles(&mut self) -> Result<()> {
        self.tris.clear();
        let mut v = 0;
        while v < self.vertices.len() {
            self.triangle_from_verts(v, v + 1, v + 2)?;
            v += 3
        }
        Ok(())
    }

    /// Computes and stores face normals, one per vertex (three per triangle).
    ///
    /// Replaces any previously stored normals.
    /// Must be called after [`create_triangles`](MarchMesh::create_triangles).
    pub fn create_normals(&mut self) {
        self.normals.clear();
        self.normals.reserve(self.tris.len() * 3);
        for tri in 0..self.tris.len() {
            let n = self.tri_normal(tri);
            self.normals.extend([n, n, n]);
        }
    }

    /// Replaces the vertex buffer.
    pub fn set_vertices(&mut self, vertices: Vec<Point>) {
        self.vertices = vertices
    }

    /// Smallest axis-aligned box containing every vertex, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.vertices.first()?;
        let (min, max) = self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.inf(v), hi.sup(v))
        });
        Some(Bounds::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn build_groups_vertices() {
        let mesh = MarchMesh::build(quad()).unwrap();
        assert_eq!(mesh.tris, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(mesh.normals.len(), 6);
        for n in &mesh.normals {
            assert_eq!(*n, Vector::z());
        }
    }

    #[test]
    fn ragged_vertex_list_is_rejected() {
        let mut verts = quad();
        verts.pop();
        assert!(matches!(MarchMesh::build(verts), Err(SpholyError::InvalidIndex)));
    }

    #[test]
    fn degenerate_triangle_has_zero_normal() {
        let p = Point::new(1.0, 2.0, 3.0);
        let mesh = MarchMesh::build(vec![p, p, p]).unwrap();
        assert_eq!(mesh.tri_normal(0), Vector::zeros());
    }

    #[test]
    fn bounds_cover_vertices() {
        let mesh = MarchMesh::build(quad()).unwrap();
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Point::origin());
        assert_eq!(bounds.max, Point::new(1.0, 1.0, 0.0));
        assert!(MarchMesh::new_empty().bounds().is_none());
    }
}
