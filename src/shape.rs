use std::{
    f64::consts::{FRAC_PI_2, PI, TAU},
    fmt,
    str::FromStr,
};

use crate::{
    error::{Result, SpholyError},
    field::FieldParams,
    types::{Value, Vector},
};

/// The five polyhedral symmetry classes a [`Field`](crate::field::Field) can approximate.
///
/// Parsing is case-insensitive and also accepts the face count:
///
/// ```text
/// "4"  | "tetrahedron"              →  Tetrahedron
/// "6"  | "cube" | "hexahedron"      →  Hexahedron
/// "8"  | "octahedron"               →  Octahedron
/// "12" | "dodecahedron"             →  Dodecahedron
/// "20" | "icosahedron"              →  Icosahedron
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Tetrahedron,
    Hexahedron,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

/// How the face values of a shape enter the blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sidedness {
    /// Every functional stands for a pair of parallel faces, folded with `|w|`.
    Paired,
    /// Every functional stands for a single face; only its positive part counts.
    OneSided,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Tetrahedron,
        ShapeKind::Hexahedron,
        ShapeKind::Octahedron,
        ShapeKind::Dodecahedron,
        ShapeKind::Icosahedron,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Tetrahedron => "tetrahedron",
            ShapeKind::Hexahedron => "cube",
            ShapeKind::Octahedron => "octahedron",
            ShapeKind::Dodecahedron => "dodecahedron",
            ShapeKind::Icosahedron => "icosahedron",
        }
    }

    /// Number of faces of the sharp polyhedron.
    pub fn face_count(self) -> usize {
        match self {
            ShapeKind::Tetrahedron => 4,
            ShapeKind::Hexahedron => 6,
            ShapeKind::Octahedron => 8,
            ShapeKind::Dodecahedron => 12,
            ShapeKind::Icosahedron => 20,
        }
    }

    /// Exponent that looks sharp for this face count.
    pub fn default_exponent(self) -> Value {
        match self {
            ShapeKind::Tetrahedron | ShapeKind::Hexahedron => 4.0,
            ShapeKind::Octahedron => 6.0,
            ShapeKind::Dodecahedron | ShapeKind::Icosahedron => 9.0,
        }
    }

    /// Factor applied to the radius so that face functionals built from non-unit normals
    /// still place the faces at the requested inradius.
    pub fn radius_scale(self) -> Value {
        match self {
            // x ± y ± z has length √3.
            ShapeKind::Octahedron => 3f64.sqrt(),
            _ => 1.0,
        }
    }

    pub fn sidedness(self) -> Sidedness {
        match self {
            ShapeKind::Tetrahedron => Sidedness::OneSided,
            _ => Sidedness::Paired,
        }
    }

    /// Schläfli symbol `{p, q}`: `p`-gon faces, `q` of them around each vertex.
    pub fn schlafli(self) -> (u32, u32) {
        match self {
            ShapeKind::Tetrahedron => (3, 3),
            ShapeKind::Hexahedron => (4, 3),
            ShapeKind::Octahedron => (3, 4),
            ShapeKind::Dodecahedron => (5, 3),
            ShapeKind::Icosahedron => (3, 5),
        }
    }

    /// Ratio of circumradius to inradius of the sharp polyhedron, `tan(π/p)·tan(π/q)`.
    pub fn circumradius_ratio(self) -> Value {
        let (p, q) = self.schlafli();
        (PI / p as Value).tan() * (PI / q as Value).tan()
    }

    /// Interior angle between two adjacent faces, in radians.
    pub fn dihedral(self) -> Value {
        match self {
            ShapeKind::Tetrahedron => (1.0 / 3.0f64).acos(),
            ShapeKind::Hexahedron => FRAC_PI_2,
            ShapeKind::Octahedron => (-1.0 / 3.0f64).acos(),
            ShapeKind::Dodecahedron => (-1.0 / 5f64.sqrt()).acos(),
            ShapeKind::Icosahedron => (-(5f64.sqrt()) / 3.0).acos(),
        }
    }

    /// Coefficient vectors `(a, b, c)` of the face functionals `a·x + b·y + c·z`.
    ///
    /// With [`Sidedness::Paired`] each vector covers a face and its opposite, so a shape
    /// with `F` faces yields `F / 2` vectors; one-sided shapes yield `F`.
    pub fn face_normals(self) -> Vec<Vector> {
        match self {
            ShapeKind::Tetrahedron => tetrahedron_normals(self.dihedral()),
            ShapeKind::Hexahedron => vec![Vector::x(), Vector::y(), Vector::z()],
            ShapeKind::Octahedron => vec![
                Vector::new(1.0, 1.0, 1.0),
                Vector::new(1.0, -1.0, -1.0),
                Vector::new(-1.0, 1.0, -1.0),
                Vector::new(-1.0, -1.0, 1.0),
            ],
            ShapeKind::Dodecahedron => dodecahedron_normals(self.dihedral()),
            ShapeKind::Icosahedron => icosahedron_normals(self.dihedral()),
        }
    }

    /// Starts a [`FieldParams`] builder with this shape's defaults.
    pub fn params(self) -> FieldParams {
        FieldParams::new(self)
    }
}

/// Two faces tilted towards `+x` around the `y` axis and two towards `-x` around `z`.
///
/// Opposite face normals of a regular tetrahedron meet at `π − δ`; splitting that through
/// the `x` axis gives `(sin(δ/2), ±cos(δ/2), 0)` and `(-sin(δ/2), 0, ±cos(δ/2))`.
fn tetrahedron_normals(dihedral: Value) -> Vec<Vector> {
    let (s, c) = (dihedral / 2.0).sin_cos();
    vec![
        Vector::new(s, c, 0.0),
        Vector::new(s, -c, 0.0),
        Vector::new(-s, 0.0, c),
        Vector::new(-s, 0.0, -c),
    ]
}

/// Each axis pair combined at the dihedral half-angle, cycling `x → y → z`.
fn dodecahedron_normals(dihedral: Value) -> Vec<Vector> {
    let (s, c) = (dihedral / 2.0).sin_cos();
    vec![
        Vector::new(s, c, 0.0),
        Vector::new(s, -c, 0.0),
        Vector::new(0.0, s, c),
        Vector::new(0.0, s, -c),
        Vector::new(c, 0.0, s),
        Vector::new(-c, 0.0, s),
    ]
}

/// Icosahedron standing on a 5-fold axis along `z`.
///
/// The five cap faces around the top vertex lean away from `z` by `top`; neighbouring cap
/// normals are `2π/5` apart in azimuth and enclose `π − δ`, which fixes
///
/// ```text
/// cos(π − δ) = cos²(top) + sin²(top)·cos(2π/5)
/// ```
///
/// Crossing a cap's lower edge tilts the normal by another `π − δ`. Those band faces and
/// the caps, each folded with its opposite, give the ten functionals.
fn icosahedron_normals(dihedral: Value) -> Vec<Vector> {
    let step = TAU / 5.0;
    let top = ((1.0 + dihedral.cos()) / (1.0 - step.cos())).sqrt().asin();
    let band = top + PI - dihedral;

    (0..5)
        .flat_map(|i| {
            let (sa, ca) = (step * i as Value).sin_cos();
            [top, band].map(|tilt| {
                let (st, ct) = tilt.sin_cos();
                Vector::new(st * ca, st * sa, ct)
            })
        })
        .collect()
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = SpholyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "4" | "tetrahedron" => Ok(ShapeKind::Tetrahedron),
            "6" | "cube" | "hexahedron" => Ok(ShapeKind::Hexahedron),
            "8" | "octahedron" => Ok(ShapeKind::Octahedron),
            "12" | "dodecahedron" => Ok(ShapeKind::Dodecahedron),
            "20" | "icosahedron" => Ok(ShapeKind::Icosahedron),
            _ => Err(SpholyError::UnknownShape(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pairwise_abs_dots(normals: &[Vector]) -> Vec<Value> {
        let unit: Vec<Vector> = normals.iter().map(|n| n.normalize()).collect();
        let mut dots = Vec::new();
        for (i, a) in unit.iter().enumerate() {
            for b in &unit[i + 1..] {
                dots.push(a.dot(b).abs());
            }
        }
        dots
    }

    #[test]
    fn parses_names_and_face_counts() {
        assert_eq!("Cube".parse::<ShapeKind>().unwrap(), ShapeKind::Hexahedron);
        assert_eq!("HEXAHEDRON".parse::<ShapeKind>().unwrap(), ShapeKind::Hexahedron);
        assert_eq!("20".parse::<ShapeKind>().unwrap(), ShapeKind::Icosahedron);
        assert_eq!(" tetrahedron ".parse::<ShapeKind>().unwrap(), ShapeKind::Tetrahedron);
        for kind in ShapeKind::ALL {
            assert_eq!(kind.name().parse::<ShapeKind>().unwrap(), kind);
            assert_eq!(kind.face_count().to_string().parse::<ShapeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_shape() {
        let err = "torus".parse::<ShapeKind>().unwrap_err();
        assert!(matches!(err, SpholyError::UnknownShape(ref s) if s == "torus"));
        assert!("_".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn functional_count_matches_faces() {
        for kind in ShapeKind::ALL {
            let expected = match kind.sidedness() {
                Sidedness::Paired => kind.face_count() / 2,
                Sidedness::OneSided => kind.face_count(),
            };
            assert_eq!(kind.face_normals().len(), expected, "{kind}");
        }
    }

    #[test]
    fn normals_share_length() {
        for kind in ShapeKind::ALL {
            for n in kind.face_normals() {
                assert_relative_eq!(n.norm(), kind.radius_scale(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn adjacent_faces_meet_at_dihedral() {
        for kind in ShapeKind::ALL {
            let widest = pairwise_abs_dots(&kind.face_normals())
                .into_iter()
                .fold(0.0, Value::max);
            assert_relative_eq!(widest, kind.dihedral().cos().abs(), epsilon = 1e-12);
        }
    }

    #[test]
    fn dihedral_agrees_with_schlafli() {
        for kind in ShapeKind::ALL {
            let (p, q) = kind.schlafli();
            let half = (PI / q as Value).cos() / (PI / p as Value).sin();
            assert_relative_eq!((kind.dihedral() / 2.0).sin(), half, epsilon = 1e-12);
        }
    }

    #[test]
    fn circumradius_ratios() {
        assert_relative_eq!(ShapeKind::Tetrahedron.circumradius_ratio(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(ShapeKind::Hexahedron.circumradius_ratio(), 3f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(ShapeKind::Octahedron.circumradius_ratio(), 3f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(
            ShapeKind::Dodecahedron.circumradius_ratio(),
            ShapeKind::Icosahedron.circumradius_ratio(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn tetrahedron_faces_are_mutually_obtuse() {
        let normals = ShapeKind::Tetrahedron.face_normals();
        for (i, a) in normals.iter().enumerate() {
            for b in &normals[i + 1..] {
                assert_relative_eq!(a.dot(b), -1.0 / 3.0, epsilon = 1e-12);
            }
        }
        let sum: Vector = normals.iter().sum();
        assert_relative_eq!(sum.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn dodecahedron_normals_are_icosahedron_vertices() {
        let expected = 1.0 / 5f64.sqrt();
        for dot in pairwise_abs_dots(&ShapeKind::Dodecahedron.face_normals()) {
            assert_relative_eq!(dot, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn icosahedron_normals_are_dodecahedron_vertices() {
        let near = 5f64.sqrt() / 3.0;
        let far = 1.0 / 3.0;
        let dots = pairwise_abs_dots(&ShapeKind::Icosahedron.face_normals());
        assert_eq!(dots.len(), 45);
        for dot in &dots {
            assert!(
                (dot - near).abs() < 1e-12 || (dot - far).abs() < 1e-12,
                "unexpected face angle cosine {dot}"
            );
        }
        // A face's three neighbours are mirrored by its opposite's, so each pair borders three.
        let near_count = dots.iter().filter(|d| (*d - near).abs() < 1e-12).count();
        assert_eq!(near_count, 10 * 3 / 2);
    }

    #[test]
    fn icosahedron_cap_tilt() {
        let normals = ShapeKind::Icosahedron.face_normals();
        // Angle between a vertex and an adjacent face centre: cos = inradius / circumradius.
        let phi = (1.0 + 5f64.sqrt()) / 2.0;
        let expected = phi * phi / (3f64.sqrt() * (1.0 + phi * phi).sqrt());
        assert_relative_eq!(normals[0].z, expected, epsilon = 1e-12);
    }
}
