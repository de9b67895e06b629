use crate::{
    error::{Result, SpholyError},
    grid::SampleGrid,
    interp::{find_t, interpolate_points},
    tables::TRI_TABLE,
    types::{Point, Value},
};

/// Converts the active edge midpoints for a given marching cubes `state` into
/// a flat list of triangle vertices.
///
/// `TRI_TABLE[state]` contains edge indices in groups of three, terminated by `-1`:
/// ```text
/// TRI_TABLE[state] = [e0, e1, e2,  e3, e4, e5,  -1, ...]
///                     \___tri0__/   \___tri1__/
/// ```
/// Each edge index maps into `edge_points` to retrieve the interpolated midpoint.
///
/// The table winds its triangles towards the inside corners; each triple is emitted as
/// `e0, e2, e1` so that the right-hand normal points out of the surface.
///
/// Returns [`SpholyError::InvalidIndex`] if the table names an edge that was not crossed.
#[inline]
pub fn triangle_verts_from_state(
    edge_points: &[Option<Point>; 12],
    state: usize,
) -> Result<Vec<Point>> {
    let row = &TRI_TABLE[state];
    let len = row.iter().take_while(|&&v| v != -1).count();
    row[..len]
        .chunks_exact(3)
        .flat_map(|tri| [tri[0], tri[2], tri[1]])
        .map(|t| edge_points[t as usize].ok_or(SpholyError::InvalidIndex))
        .collect()
}

/// Returns the 8 world-space corner positions of the voxel at grid index `(x, y, z)`.
///
/// Corners are ordered to match [`SampleGrid::voxel_corner_indices`].
#[inline]
pub fn get_corner_positions(grid: &SampleGrid, x: usize, y: usize, z: usize) -> [Point; 8] {
    SampleGrid::voxel_corner_indices(x, y, z).map(|[cx, cy, cz]| grid.position(cx, cy, cz))
}

/// Computes the marching cubes state bitmask for a voxel.
///
/// Each of the 8 corners maps to one bit. A bit is set when the corner's value
/// is **at or below** the threshold (i.e. "inside" the surface):
///
/// ```text
/// corner index:  7  6  5  4  3  2  1  0
/// state bits:   [_][_][_][_][_][_][_][_]
///                                      ^-- corner 0 inside?
/// ```
///
/// Returns [`SpholyError::InvalidCorners`] if `eval_corners` does not contain exactly 8 values.
#[inline]
pub fn get_state(eval_corners: &[Value], threshold: Value) -> Result<usize> {
    if eval_corners.len() != 8 {
        return Err(SpholyError::InvalidCorners);
    }

    let mut state: usize = 0;
    for (i, &v) in eval_corners.iter().enumerate() {
        if v <= threshold {
            state |= 1 << i;
        }
    }

    Ok(state)
}

/// Interpolates the crossing point along each edge of the voxel that meets the iso-surface.
///
/// `edges_mask` is a 12-bit field from `EDGE_TABLE`: a set bit means that edge is active.
///
/// For each active edge, the crossing is found by linearly interpolating between
/// the two endpoint positions at the iso-value.
#[inline]
pub fn get_edge_midpoints(
    edges_mask: u16,
    point_indices: &[[i8; 2]; 12],
    corner_positions: &[Point; 8],
    corner_values: &[Value; 8],
    threshold: Value,
) -> [Option<Point>; 12] {
    let mut edge_points: [Option<Point>; 12] = [None; 12];

    for i in 0..12_usize {
        if (edges_mask & (1 << i)) == 0 {
            continue;
        }

        let pair = point_indices[i];
        let vi = corner_values[pair[0] as usize];
        let vf = corner_values[pair[1] as usize];
        let pi = &corner_positions[pair[0] as usize];
        let pf = &corner_positions[pair[1] as usize];

        let t = find_t(vi, vf, threshold);
        edge_points[i] = Some(interpolate_points(pi, pf, t));
    }

    edge_points
}
