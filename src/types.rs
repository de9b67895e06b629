use nalgebra::{Point3, Vector3};
use ndarray::{Array1, ArrayView2, Axis};

/// Scalar field value at a point in space.
pub type Value = f64;

/// A 3D point with [`Value`] components.
pub type Point = Point3<Value>;

/// A 3D vector with [`Value`] components.
pub type Vector = Vector3<Value>;

/// Anything that can be sampled by [`SampleGrid`](crate::grid::SampleGrid).
///
/// Values **below or equal to** the grid's threshold are considered "inside" the surface.
///
/// Implemented by [`Field`](crate::field::Field) and by plain closures, so a sampler never
/// needs to know which shape it is walking.
pub trait ScalarField: Sync {
    /// Evaluates the field at a single point.
    fn evaluate(&self, p: &Point) -> Value;

    /// Evaluates the field on an `N × 3` batch of points, one row per point.
    ///
    /// Rows are evaluated independently; the result has length `N`.
    ///
    /// # Panics
    ///
    /// If `points` does not have exactly 3 columns.
    fn evaluate_batch(&self, points: ArrayView2<'_, Value>) -> Array1<Value> {
        assert_batch_shape(&points);
        points
            .axis_iter(Axis(0))
            .map(|row| self.evaluate(&Point::new(row[0], row[1], row[2])))
            .collect()
    }
}

/// Panics unless `points` is an `N × 3` batch.
#[inline]
pub fn assert_batch_shape(points: &ArrayView2<'_, Value>) {
    assert_eq!(
        points.ncols(),
        3,
        "point batch must be N × 3, got {} columns",
        points.ncols()
    );
}

impl<F> ScalarField for F
where
    F: Fn(Point) -> Value + Sync,
{
    #[inline]
    fn evaluate(&self, p: &Point) -> Value {
        self(*p)
    }
}

/// Axis-aligned bounding box given by its `min` and `max` corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box of half-width `half_extent` on every axis around `center`.
    pub fn around(center: Point, half_extent: Value) -> Self {
        let h = Vector::repeat(half_extent);
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Edge lengths along X, Y and Z.
    pub fn size(&self) -> Vector {
        self.max - self.min
    }

    pub fn contains(&self, p: &Point) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}
