use ndarray::{Array3, Zip};
use tracing::debug;

use crate::{
    error::{Result, SpholyError},
    types::{Bounds, Point, ScalarField, Value},
};

/// Largest number of corner samples [`SampleGrid::from_bounds`] will allocate.
pub const MAX_CORNERS: usize = 1 << 27;

/// A sampling grid that holds scalar field values over an axis-aligned box.
///
/// The grid has `(size_x + 1) × (size_y + 1) × (size_z + 1)` corner points
/// and `size_x × size_y × size_z` voxels.
///
/// Values are stored as `values[[z, y, x]]`.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    /// Number of voxels along X.
    pub size_x: usize,
    /// Number of voxels along Y.
    pub size_y: usize,
    /// Number of voxels along Z.
    pub size_z: usize,
    /// World-space size of each voxel edge.
    pub step: Value,
    /// World-space position of corner `(0, 0, 0)`.
    pub origin: Point,
    /// Iso-surface threshold: corners ≤ threshold are "inside".
    pub threshold: Value,
    /// Scalar field values, indexed `[z, y, x]`.
    pub values: Array3<Value>,
}

impl Default for SampleGrid {
    fn default() -> Self {
        Self {
            size_x: 0,
            size_y: 0,
            size_z: 0,
            step: 1.,
            origin: Point::origin(),
            threshold: 0.,
            values: Array3::zeros((1, 1, 1)),
        }
    }
}

impl SampleGrid {
    /// Creates a new grid with the given voxel dimensions.
    ///
    /// All values are initialised to `0.0`. The grid has `(size + 1)` corners
    /// per axis so that every voxel has a full set of 8 corners.
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
            values: Array3::zeros((size_z + 1, size_y + 1, size_x + 1)),
            ..Default::default()
        }
    }

    /// Creates a grid covering `bounds` with voxels of edge `step`.
    ///
    /// Each axis gets `ceil(extent / step)` voxels, so the grid may overshoot `bounds.max`
    /// by less than one step.
    ///
    /// Returns [`SpholyError::InvalidBounds`] if `step` is not a finite positive number,
    /// the box is empty on any axis, or the grid would exceed [`MAX_CORNERS`].
    pub fn from_bounds(bounds: Bounds, step: Value) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(SpholyError::InvalidBounds(format!("step {step} must be positive")));
        }
        let size = bounds.size();
        if size.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(SpholyError::InvalidBounds(format!(
                "min {} must lie below max {} on every axis",
                bounds.min, bounds.max
            )));
        }

        let voxels = size.map(|s| (s / step).ceil() as usize);
        let corners = voxels
            .iter()
            .try_fold(1usize, |acc, &n| n.checked_add(1).and_then(|c| acc.checked_mul(c)))
            .filter(|&c| c <= MAX_CORNERS)
            .ok_or_else(|| {
                SpholyError::InvalidBounds(format!(
                    "step {step} needs more than {MAX_CORNERS} corner samples"
                ))
            })?;
        debug!(
            corners,
            x = voxels.x,
            y = voxels.y,
            z = voxels.z,
            step,
            "allocating sample grid"
        );

        Ok(Self::new(voxels.x, voxels.y, voxels.z)
            .with_step(step)
            .with_origin(bounds.min))
    }

    /// Sets the world-space size of each voxel edge.
    pub fn with_step(mut self, step: Value) -> Self {
        self.step = step;
        self
    }

    /// Sets the world-space position of the first corner.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the iso-surface threshold.
    pub fn with_threshold(mut self, threshold: Value) -> Self {
        self.threshold = threshold;
        self
    }

    /// Number of corner samples.
    pub fn corner_count(&self) -> usize {
        self.values.len()
    }

    /// World-space position of corner `(x, y, z)`.
    #[inline]
    pub fn position(&self, x: usize, y: usize, z: usize) -> Point {
        corner_position(self.origin, self.step, x, y, z)
    }

    /// Calls `f(position, &mut value)` for every corner in the grid.
    ///
    /// Positions are world-space, so the closure can sample an SDF directly without
    /// needing to know the step or origin.
    pub fn for_each_corner<F>(&mut self, mut f: F)
    where
        F: FnMut(Point, &mut Value),
    {
        let (origin, step) = (self.origin, self.step);
        for ((z, y, x), value) in self.values.indexed_iter_mut() {
            f(corner_position(origin, step, x, y, z), value);
        }
    }

    /// Returns the scalar field value at corner `(x, y, z)`.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Value {
        self.values[[z, y, x]]
    }

    /// Sets the scalar field value at corner `(x, y, z)`.
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: Value) {
        self.values[[z, y, x]] = v
    }

    /// Returns the 8 corner indices `[x, y, z]` of the voxel at `(x, y, z)`.
    ///
    /// Corners are ordered to match the standard marching cubes convention:
    ///
    /// ```text
    ///     7----6          Y
    ///    /|   /|          |
    ///   3----2 |          *-- X
    ///   | 4--|-5         /
    ///   |/   |/         Z
    ///   0----1
    ///
    ///  0 = (x,   y,   z  )    4 = (x,   y,   z+1)
    ///  1 = (x+1, y,   z  )    5 = (x+1, y,   z+1)
    ///  2 = (x+1, y+1, z  )    6 = (x+1, y+1, z+1)
    ///  3 = (x,   y+1, z  )    7 = (x,   y+1, z+1)
    /// ```
    #[inline]
    pub fn voxel_corner_indices(x: usize, y: usize, z: usize) -> [[usize; 3]; 8] {
        [
            [x, y, z],
            [x + 1, y, z],
            [x + 1, y + 1, z],
            [x, y + 1, z],
            [x, y, z + 1],
            [x + 1, y, z + 1],
            [x + 1, y + 1, z + 1],
            [x, y + 1, z + 1],
        ]
    }

    /// Returns the 8 corner values of the voxel at `(x, y, z)`, in
    /// [`voxel_corner_indices`](SampleGrid::voxel_corner_indices) order.
    #[inline]
    pub fn voxel_values(&self, x: usize, y: usize, z: usize) -> [Value; 8] {
        Self::voxel_corner_indices(x, y, z).map(|[cx, cy, cz]| self.values[[cz, cy, cx]])
    }

    /// Fills the grid by evaluating `field` at every corner.
    ///
    /// Corners are evaluated in parallel on the Rayon pool; the field must therefore be
    /// `Sync`, which every [`ScalarField`] is.
    pub fn fill<F>(&mut self, field: &F)
    where
        F: ScalarField + ?Sized,
    {
        let (origin, step) = (self.origin, self.step);
        Zip::indexed(self.values.view_mut()).par_for_each(|(z, y, x), value| {
            *value = field.evaluate(&corner_position(origin, step, x, y, z));
        });
    }
}

#[inline]
fn corner_position(origin: Point, step: Value, x: usize, y: usize, z: usize) -> Point {
    Point::new(
        origin.x + x as Value * step,
        origin.y + y as Value * step,
        origin.z + z as Value * step,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bounds_rounds_up() {
        let bounds = Bounds::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 0.9));
        let grid = SampleGrid::from_bounds(bounds, 0.5).unwrap();
        assert_eq!((grid.size_x, grid.size_y, grid.size_z), (4, 4, 4));
        assert_eq!(grid.values.dim(), (5, 5, 5));
        assert_eq!(grid.position(4, 0, 0), Point::new(1.0, -1.0, -1.0));
    }

    #[test]
    fn from_bounds_rejects_bad_input() {
        let unit = Bounds::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        assert!(matches!(
            SampleGrid::from_bounds(unit, 0.0),
            Err(SpholyError::InvalidBounds(_))
        ));
        assert!(SampleGrid::from_bounds(unit, -1.0).is_err());
        let flat = Bounds::new(Point::origin(), Point::new(1.0, 0.0, 1.0));
        assert!(SampleGrid::from_bounds(flat, 0.1).is_err());
    }

    #[test]
    fn from_bounds_rejects_oversized_grid() {
        let bounds = Bounds::around(Point::origin(), 32.5);
        for step in [1e-7, 1e-300, Value::MIN_POSITIVE] {
            assert!(matches!(
                SampleGrid::from_bounds(bounds, step),
                Err(SpholyError::InvalidBounds(_))
            ));
        }
        // 512 voxels per axis needs 513³ corners, one layer past the cap.
        let cube = Bounds::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        assert_eq!(512usize.pow(3), MAX_CORNERS);
        assert!(SampleGrid::from_bounds(cube, 1.0 / 512.0).is_err());
        assert!(SampleGrid::from_bounds(cube, 1.0 / 64.0).is_ok());
    }

    #[test]
    fn fill_matches_for_each_corner() {
        let f = |p: Point| p.x + 10.0 * p.y + 100.0 * p.z;
        let bounds = Bounds::new(Point::new(-1.0, 0.0, 2.0), Point::new(1.0, 2.0, 3.0));

        let mut parallel = SampleGrid::from_bounds(bounds, 0.5).unwrap();
        parallel.fill(&f);

        let mut serial = SampleGrid::from_bounds(bounds, 0.5).unwrap();
        serial.for_each_corner(|p, v| *v = f(p));

        assert_eq!(parallel.values, serial.values);
        assert_eq!(parallel.get(2, 1, 0), 0.0 + 10.0 * 0.5 + 100.0 * 2.0);
    }

    #[test]
    fn voxel_values_follow_corner_order() {
        let mut grid = SampleGrid::new(1, 1, 1);
        for (i, [x, y, z]) in SampleGrid::voxel_corner_indices(0, 0, 0).into_iter().enumerate() {
            grid.set(x, y, z, i as Value);
        }
        assert_eq!(grid.voxel_values(0, 0, 0), [0., 1., 2., 3., 4., 5., 6., 7.]);
    }
}
