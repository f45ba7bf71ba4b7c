//! Numeric saturation helpers used across the project.
//!
//! Unit data arrives from designers and the network. Rather than rejecting a
//! whole tick because one unit carries a negative radius or a hit chance of
//! `1.3`, values are saturated at the point of use with these helpers.

/// Number of distinct outcomes of a 32-bit hit roll.
const ROLL_SPACE: f64 = 4_294_967_296.0;

/// Clamps `value` into `[0, 1]`; `NaN` maps to `0`.
#[must_use]
pub fn unit_interval(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Returns `value` when finite and non-negative, otherwise `0`.
#[must_use]
pub fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Returns `value` when finite and strictly positive, otherwise `fallback`.
#[must_use]
pub fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Converts a hit chance into the exclusive upper bound for a 32-bit roll.
///
/// A roll `r` hits when `u64::from(r) < hit_threshold(chance)`, so a chance
/// of `1.0` always hits and `0.0` never does.
///
/// # Examples
///
/// ```
/// use skirmish::numeric::hit_threshold;
/// assert_eq!(hit_threshold(0.0), 0);
/// assert_eq!(hit_threshold(1.0), 1 << 32);
/// assert_eq!(hit_threshold(0.5), 1 << 31);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The product lies in [0, 2^32] after clamping the chance."
)]
#[must_use]
pub fn hit_threshold(chance: f32) -> u64 {
    (f64::from(unit_interval(chance)) * ROLL_SPACE).floor() as u64
}

/// Converts a collection length into a `u32`, saturating at `u32::MAX`.
#[must_use]
pub fn saturating_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-0.5, 0.0)]
    #[case(0.25, 0.25)]
    #[case(1.5, 1.0)]
    #[case(f32::NAN, 0.0)]
    fn unit_interval_saturates(#[case] input: f32, #[case] expected: f32) {
        assert!((unit_interval(input) - expected).abs() < f32::EPSILON);
    }

    #[rstest]
    #[case(-1.0, 0.0)]
    #[case(f32::INFINITY, 0.0)]
    #[case(2.0, 2.0)]
    fn non_negative_rejects_bad_values(#[case] input: f32, #[case] expected: f32) {
        assert!((non_negative(input) - expected).abs() < f32::EPSILON);
    }

    #[rstest]
    fn positive_or_uses_fallback() {
        assert!((positive_or(0.0, 3.0) - 3.0).abs() < f32::EPSILON);
        assert!((positive_or(2.0, 3.0) - 2.0).abs() < f32::EPSILON);
    }

    #[rstest]
    fn threshold_is_monotonic() {
        let low = hit_threshold(0.2);
        let high = hit_threshold(0.8);
        assert!(low < high);
        assert_eq!(hit_threshold(7.0), hit_threshold(1.0));
    }
}
