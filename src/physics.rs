//! Mass-relative motion helpers.
//!
//! Heavier units accelerate, brake and turn more slowly. These functions
//! encapsulate the shared scaling curve so steering can stay readable and
//! the curve can be unit-tested on its own.

use crate::constants::{MASS_SCALE_EXPONENT, REF_MASS};

/// Smallest mass considered when scaling, guarding against zero division.
const MIN_MASS: f32 = 1e-3;

/// Clamps a unit mass into the usable domain. Non-finite or non-positive
/// values fall back to the reference mass.
#[must_use]
pub fn sanitize_mass(mass: f32) -> f32 {
    if mass.is_finite() && mass > 0.0 {
        mass.max(MIN_MASS)
    } else {
        REF_MASS
    }
}

/// Mass ratio relative to [`REF_MASS`].
#[must_use]
pub fn mass_ratio(mass: f32) -> f32 {
    sanitize_mass(mass) / REF_MASS
}

/// Scales a reference rate by `(mass / REF_MASS)^-EXP` and clamps it.
///
/// # Examples
///
/// ```
/// use skirmish::physics::mass_scaled_rate;
/// // A reference-mass unit keeps the reference rate.
/// assert!((mass_scaled_rate(20.0, 1.0, 4.0, 40.0) - 20.0).abs() < 1e-6);
/// // A unit four times heavier gets half the rate.
/// assert!((mass_scaled_rate(20.0, 4.0, 4.0, 40.0) - 10.0).abs() < 1e-5);
/// ```
#[must_use]
pub fn mass_scaled_rate(reference: f32, mass: f32, min: f32, max: f32) -> f32 {
    let scaled = reference / mass_ratio(mass).powf(MASS_SCALE_EXPONENT);
    scaled.clamp(min, max)
}

/// Distance needed to stop from `speed` at constant `decel`.
#[must_use]
pub fn stopping_distance(speed: f32, decel: f32) -> f32 {
    if decel <= 0.0 {
        return f32::INFINITY;
    }
    speed * speed / (2.0 * decel)
}

/// Moves `current` towards `target` by at most `max_delta`.
#[must_use]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(-3.0)]
    #[case(f32::NAN)]
    fn invalid_mass_falls_back_to_reference(#[case] mass: f32) {
        assert_relative_eq!(sanitize_mass(mass), REF_MASS);
    }

    #[rstest]
    fn heavier_units_get_lower_rates() {
        let light = mass_scaled_rate(20.0, 0.5, 1.0, 100.0);
        let heavy = mass_scaled_rate(20.0, 8.0, 1.0, 100.0);
        assert!(light > heavy);
    }

    #[rstest]
    fn rates_respect_clamp() {
        assert_relative_eq!(mass_scaled_rate(20.0, 1.0e6, 4.0, 40.0), 4.0);
        assert_relative_eq!(mass_scaled_rate(20.0, 1.0e-6, 4.0, 40.0), 40.0);
    }

    #[rstest]
    #[case(4.0, 8.0, 1.0)]
    #[case(0.0, 8.0, 0.0)]
    fn stopping_distance_matches_kinematics(
        #[case] speed: f32,
        #[case] decel: f32,
        #[case] expected: f32,
    ) {
        assert_relative_eq!(stopping_distance(speed, decel), expected);
    }

    #[rstest]
    fn approach_never_overshoots() {
        assert_relative_eq!(approach(0.0, 1.0, 0.4), 0.4);
        assert_relative_eq!(approach(0.9, 1.0, 0.4), 1.0);
        assert_relative_eq!(approach(1.0, 0.0, 0.4), 0.6);
    }
}
