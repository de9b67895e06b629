use crate::types::{Point, Value};

// Return the interpolation factor t corresponding to iso_val
#[inline]
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    (iso_val - v0) / (v1 - v0)
}

// Linear interpolation
#[inline]
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// Linearly interpolate between two points by factor t
#[inline]
pub fn interpolate_points(p0: &Point, p1: &Point, t: Value) -> Point {
    Point::new(
        lerp(p0.x, p1.x, t),
        lerp(p0.y, p1.y, t),
        lerp(p0.z, p1.z, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_crossing_between_samples() {
        assert_eq!(find_t(-1.0, 3.0, 0.0), 0.25);
        let p = interpolate_points(&Point::new(0.0, 0.0, 0.0), &Point::new(4.0, -4.0, 8.0), 0.25);
        assert_eq!(p, Point::new(1.0, -1.0, 2.0));
    }
}
