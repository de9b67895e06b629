use ndarray::{Array1, ArrayView2, Zip};
use tracing::debug;

use crate::{
    blend::{power_norm, ramp},
    error::{Result, SpholyError},
    shape::{ShapeKind, Sidedness},
    types::{Bounds, Point, ScalarField, Value, Vector, assert_batch_shape},
};

/// Construction parameters for a [`Field`].
///
/// ```rust,ignore
/// let field = ShapeKind::Hexahedron
///     .params()
///     .with_radius(10.0)
///     .with_exponent(4.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub kind: ShapeKind,
    /// Inradius of the sharp polyhedron. Default: `1`.
    pub radius: Value,
    /// Blend exponent. Default: [`ShapeKind::default_exponent`].
    pub exponent: Value,
    /// Default: the origin.
    pub center: Point,
}

impl FieldParams {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            radius: 1.0,
            exponent: kind.default_exponent(),
            center: Point::origin(),
        }
    }

    pub fn with_radius(mut self, radius: Value) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_exponent(mut self, exponent: Value) -> Self {
        self.exponent = exponent;
        self
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    /// Validates the parameters and derives the face functionals.
    ///
    /// Returns [`SpholyError::InvalidParameter`] if the radius or exponent is not a finite
    /// positive number, or if the center has a non-finite coordinate.
    pub fn build(self) -> Result<Field> {
        positive("radius", self.radius)?;
        positive("exponent", self.exponent)?;
        if let Some(bad) = self.center.iter().copied().find(|c| !c.is_finite()) {
            return Err(SpholyError::InvalidParameter { name: "center", value: bad });
        }

        let faces = self.kind.face_normals();
        debug!(
            shape = %self.kind,
            radius = self.radius,
            exponent = self.exponent,
            functionals = faces.len(),
            "built field"
        );

        Ok(Field {
            kind: self.kind,
            radius: self.radius,
            exponent: self.exponent,
            center: self.center,
            scale: self.radius * self.kind.radius_scale(),
            sidedness: self.kind.sidedness(),
            faces,
        })
    }
}

fn positive(name: &'static str, value: Value) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpholyError::InvalidParameter { name, value })
    }
}

/// Implicit field of a rounded polyhedron.
///
/// ```text
/// q      = (p - center) / (radius · radius_scale)
/// w_i    = n_i · q                (max(w_i, 0) for one-sided faces)
/// f(p)   = (Σ |w_i|^n)^(1/n) - 1
/// ```
///
/// `f` is `-1` at the center, negative inside, zero on the surface and grows linearly with
/// distance along any ray from the center. Immutable once built; evaluate it from as many
/// threads as you like.
#[derive(Debug, Clone)]
pub struct Field {
    kind: ShapeKind,
    radius: Value,
    exponent: Value,
    center: Point,
    scale: Value,
    sidedness: Sidedness,
    faces: Vec<Vector>,
}

impl Field {
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn radius(&self) -> Value {
        self.radius
    }

    pub fn exponent(&self) -> Value {
        self.exponent
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Number of face functionals blended per evaluation.
    ///
    /// Paired shapes fold opposite faces into one functional, so this is half of
    /// [`ShapeKind::face_count`] for every shape except the tetrahedron.
    pub fn functional_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned box around the center that encloses the surface.
    ///
    /// The rounded body lies inside the sharp polyhedron, so a half-width of the
    /// circumradius plus a quarter of the inradius leaves room for at least one sampling
    /// layer. `margin` scales the whole box.
    pub fn bounds(&self, margin: Value) -> Bounds {
        let half = (self.kind.circumradius_ratio() + 0.25) * self.radius * margin;
        Bounds::around(self.center, half)
    }

    #[inline]
    pub fn evaluate(&self, p: &Point) -> Value {
        let q = (p - self.center) / self.scale;
        let values = self.faces.iter().map(|n| n.dot(&q));
        let norm = match self.sidedness {
            Sidedness::Paired => power_norm(values, self.exponent),
            Sidedness::OneSided => power_norm(values.map(ramp), self.exponent),
        };
        norm - 1.0
    }

    /// Evaluates an `N × 3` batch row by row.
    ///
    /// # Panics
    ///
    /// If `points` does not have exactly 3 columns.
    pub fn evaluate_batch(&self, points: ArrayView2<'_, Value>) -> Array1<Value> {
        ScalarField::evaluate_batch(self, points)
    }

    /// Like [`evaluate_batch`](Field::evaluate_batch), split across the Rayon pool.
    ///
    /// # Panics
    ///
    /// If `points` does not have exactly 3 columns.
    pub fn par_evaluate_batch(&self, points: ArrayView2<'_, Value>) -> Array1<Value> {
        assert_batch_shape(&points);
        Zip::from(points.rows())
            .par_map_collect(|row| self.evaluate(&Point::new(row[0], row[1], row[2])))
    }
}

impl ScalarField for Field {
    #[inline]
    fn evaluate(&self, p: &Point) -> Value {
        Field::evaluate(self, p)
    }
}
