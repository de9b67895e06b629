//! Generalized power-sum blending of face values.
//!
//! Every shape combines its face values `w_i` with the norm form
//! `(Σ |w_i|^n)^(1/n)`. For `n → ∞` this tends to `max |w_i|`, whose unit level set is the
//! sharp polyhedron; finite `n` rounds its edges and corners.
//!
//! An older formulation shifts each face value by a constant and compares the raw power sum
//! against a threshold (`Σ (c + w_i)^n − 1`). It is not a metric ball in face space and
//! moves the value at the center away from `-1`, so it is not used here.

use crate::types::Value;

/// Computes `Σ |w_i|^n`.
///
/// The absolute value is taken before exponentiation so non-integer exponents stay real for
/// negative face values.
#[inline]
pub fn power_sum<I>(values: I, exponent: Value) -> Value
where
    I: IntoIterator<Item = Value>,
{
    values.into_iter().map(|w| w.abs().powf(exponent)).sum()
}

/// Computes `(Σ |w_i|^n)^(1/n)`.
///
/// `exponent` must be positive; [`FieldParams::build`](crate::field::FieldParams::build)
/// rejects anything else before a field can reach this function.
#[inline]
pub fn power_norm<I>(values: I, exponent: Value) -> Value
where
    I: IntoIterator<Item = Value>,
{
    power_sum(values, exponent).powf(exponent.recip())
}

/// Positive part of a one-sided face value.
///
/// Faces without an opposite partner only bound the body on one side, so the half-space
/// behind them must contribute nothing to the blend.
#[inline]
pub fn ramp(w: Value) -> Value {
    // Not `w.max(0.0)`: that would swallow NaN.
    if w < 0.0 { 0.0 } else { w }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn power_sum_uses_absolute_values() {
        assert_relative_eq!(power_sum([-2.0, 1.0], 2.5), 2f64.powf(2.5) + 1.0);
        assert!(power_sum([-0.5, -0.25], 3.3).is_finite());
    }

    #[test]
    fn power_norm_is_euclidean_for_two() {
        assert_relative_eq!(power_norm([3.0, 4.0], 2.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn power_norm_tends_to_max() {
        let values = [0.3, -0.9, 0.5];
        let sharp = power_norm(values, 200.0);
        assert_relative_eq!(sharp, 0.9, epsilon = 1e-2);
        assert!(power_norm(values, 4.0) > sharp);
    }

    #[test]
    fn power_norm_of_zeros_is_zero() {
        assert_eq!(power_norm([0.0; 4], 9.0), 0.0);
    }

    #[test]
    fn ramp_clips_negative() {
        assert_eq!(ramp(-0.3), 0.0);
        assert_eq!(ramp(0.7), 0.7);
        assert!(ramp(Value::NAN).is_nan());
    }

    #[test]
    fn nan_propagates() {
        assert!(power_norm([Value::NAN, 1.0], 4.0).is_nan());
    }
}
