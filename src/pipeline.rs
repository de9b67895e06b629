use std::time::Instant;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info};

use crate::{
    error::{Result, SpholyError},
    field::Field,
    grid::SampleGrid,
    mesh::MarchMesh,
    tables::{CORNER_POINT_INDICES, EDGE_TABLE},
    types::{Bounds, Point, ScalarField, Value},
    utils::{get_corner_positions, get_edge_midpoints, get_state, triangle_verts_from_state},
};

/// Configuration for turning a field into a mesh.
///
/// ```rust,ignore
/// let mesh = generate_mesh(&field, &MeshConfig { step: 0.5, ..Default::default() })?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshConfig {
    /// World-space edge length of a sampling voxel. Default: `0.25`.
    pub step: Value,
    /// Iso-value of the extracted surface. Default: `0.0`.
    pub threshold: Value,
    /// Multiplier on the [`Field::bounds`] box. Default: `1.0`.
    pub margin: Value,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            step: 0.25,
            threshold: 0.0,
            margin: 1.0,
        }
    }
}

/// Samples `field` over its own bounding box and extracts the zero level set.
///
/// ```text
/// Field::bounds(margin)
///   → SampleGrid::from_bounds   (allocate corners)
///   → SampleGrid::fill          (parallel evaluation)
///   → run_marching_cubes        (parallel over X slices)
/// ```
pub fn generate_mesh(field: &Field, config: &MeshConfig) -> Result<MarchMesh> {
    info!(
        shape = %field.kind(),
        radius = field.radius(),
        exponent = field.exponent(),
        step = config.step,
        "meshing field"
    );
    mesh_field(field, field.bounds(config.margin), config)
}

/// Samples any scalar field over `bounds` and extracts its level set at
/// [`MeshConfig::threshold`].
///
/// Returns [`SpholyError::EmptyMesh`] if the surface never crosses the grid.
pub fn mesh_field<F>(field: &F, bounds: Bounds, config: &MeshConfig) -> Result<MarchMesh>
where
    F: ScalarField + ?Sized,
{
    let started = Instant::now();
    let mut grid = SampleGrid::from_bounds(bounds, config.step)?.with_threshold(config.threshold);
    grid.fill(field);
    debug!(
        corners = grid.corner_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sampled grid"
    );

    let mesh = run_marching_cubes(&grid)?;
    if mesh.is_empty() {
        return Err(SpholyError::EmptyMesh);
    }
    info!(
        triangles = mesh.triangle_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "extracted surface"
    );
    Ok(mesh)
}

/// Runs the marching cubes algorithm over the given sample grid.
///
/// Work is parallelised over X slices using Rayon; slices are merged in order so the
/// output does not depend on scheduling. Returns a [`MarchMesh`] with vertices, sequential
/// triangles, and flat-shaded normals.
///
/// ```text
/// Per voxel:
/// 1. get_corner_positions       →  8 world-space points
/// 2. voxel_values               →  8 scalar values
/// 3. get_state                  →  256-entry lookup key
/// 4. EDGE_TABLE[state]          →  bitmask of intersected edges
/// 5. get_edge_midpoints         →  up to 12 interpolated points
/// 6. triangle_verts_from_state  →  triangle vertices from TRI_TABLE
/// ```
pub fn run_marching_cubes(grid: &SampleGrid) -> Result<MarchMesh> {
    let threshold = grid.threshold;
    let per_x: Vec<Vec<Point>> = (0..grid.size_x)
        .into_par_iter()
        .map(|x| -> Result<Vec<Point>> {
            let mut local: Vec<Point> = Vec::new();

            for y in 0..grid.size_y {
                for z in 0..grid.size_z {
                    let eval_corners = grid.voxel_values(x, y, z);
                    let state = get_state(&eval_corners, threshold)?;

                    let edges_mask = EDGE_TABLE[state];
                    if edges_mask == 0 {
                        continue;
                    }

                    let corner_positions = get_corner_positions(grid, x, y, z);
                    let edge_points = get_edge_midpoints(
                        edges_mask,
                        &CORNER_POINT_INDICES,
                        &corner_positions,
                        &eval_corners,
                        threshold,
                    );

                    local.extend(triangle_verts_from_state(&edge_points, state)?);
                }
            }
            Ok(local)
        })
        .collect::<Result<_>>()?;

    // Merge per-X slices into a single vertex buffer
    let total: usize = per_x.iter().map(|v| v.len()).sum();
    let mut vertices: Vec<Point> = Vec::with_capacity(total);
    for mut v in per_x {
        vertices.append(&mut v);
    }

    MarchMesh::build(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_mesh_lies_on_surface() {
        let sphere = |p: Point| p.coords.norm() - 1.0;
        let bounds = Bounds::around(Point::origin(), 1.5);
        let config = MeshConfig { step: 0.1, ..Default::default() };
        let mesh = mesh_field(&sphere, bounds, &config).unwrap();

        assert!(mesh.triangle_count() > 100);
        for v in &mesh.vertices {
            assert!((v.coords.norm() - 1.0).abs() < 0.02, "vertex {v} off the sphere");
        }
    }

    #[test]
    fn no_crossing_is_an_empty_mesh() {
        let everywhere_outside = |_: Point| 1.0;
        let bounds = Bounds::around(Point::origin(), 1.0);
        assert!(matches!(
            mesh_field(&everywhere_outside, bounds, &MeshConfig::default()),
            Err(SpholyError::EmptyMesh)
        ));
    }

    #[test]
    fn threshold_shifts_surface() {
        let sphere = |p: Point| p.coords.norm();
        let bounds = Bounds::around(Point::origin(), 3.0);
        let config = MeshConfig { step: 0.2, threshold: 2.0, ..Default::default() };
        let mesh = mesh_field(&sphere, bounds, &config).unwrap();
        for v in &mesh.vertices {
            assert!((v.coords.norm() - 2.0).abs() < 0.05);
        }
    }
}
