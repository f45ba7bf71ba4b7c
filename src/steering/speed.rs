//! Target-speed shaping: heading throttle, turn braking and arrival easing.
use std::f32::consts::PI;

use crate::constants::{
    ARRIVAL_RADIUS_MAX, ARRIVAL_RADIUS_MIN, ARRIVAL_SAFETY_FACTOR, CHARGE_SPEED_FLOOR,
    HEADING_THROTTLE_EXPONENT, HEADING_THROTTLE_FLOOR, MASS_SCALE_EXPONENT,
    TURN_BRAKE_EXPONENT, TURN_BRAKE_STRENGTH, TURN_BRAKE_THRESHOLD_DEG,
};
use crate::physics::{mass_ratio, stopping_distance};

/// Speed multiplier for a heading error in radians.
///
/// Follows `cos(err)^EXP` but never drops below the floor, so a unit facing
/// away still creeps forward while it turns.
#[must_use]
pub fn heading_throttle(heading_error: f32) -> f32 {
    let aligned = heading_error.cos().max(0.0).powf(HEADING_THROTTLE_EXPONENT);
    aligned.max(HEADING_THROTTLE_FLOOR)
}

/// Extra braking multiplier once the heading error passes the threshold.
#[must_use]
pub fn turn_brake(heading_error: f32) -> f32 {
    let threshold = TURN_BRAKE_THRESHOLD_DEG.to_radians();
    if heading_error <= threshold {
        return 1.0;
    }
    let excess = ((heading_error - threshold) / (PI - threshold)).clamp(0.0, 1.0);
    1.0 / (1.0 + TURN_BRAKE_STRENGTH * excess.powf(TURN_BRAKE_EXPONENT))
}

/// Radius inside which arrival easing applies.
///
/// Grows with the physical stopping distance, the fraction of top speed in
/// use and the unit's mass.
#[must_use]
pub fn arrival_radius(speed: f32, max_speed: f32, decel: f32, mass: f32) -> f32 {
    let fraction = if max_speed > 0.0 {
        (speed / max_speed).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let weight = mass_ratio(mass).powf(MASS_SCALE_EXPONENT);
    let radius = stopping_distance(speed, decel)
        * ARRIVAL_SAFETY_FACTOR
        * (0.5 + 0.5 * fraction)
        * weight;
    if radius.is_finite() {
        radius.clamp(ARRIVAL_RADIUS_MIN, ARRIVAL_RADIUS_MAX)
    } else {
        ARRIVAL_RADIUS_MAX
    }
}

/// Cubic ease-out of the remaining distance, in `[0, 1]`.
#[must_use]
pub fn arrival_ease(remaining: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 1.0;
    }
    let t = (remaining / radius).clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Inputs for [`target_speed`].
#[derive(Debug, Clone, Copy)]
pub struct SpeedInputs {
    /// Top speed after any attack slowdown.
    pub max_speed: f32,
    /// Angle between heading and goal direction, in radians.
    pub heading_error: f32,
    /// Planar distance left to the goal.
    pub remaining: f32,
    /// Current planar speed.
    pub current_speed: f32,
    /// Mass-scaled deceleration.
    pub decel: f32,
    /// Unit mass.
    pub mass: f32,
    /// Charging through a hostile focus.
    pub charging: bool,
}

/// Speed the unit should be travelling at along its desired direction.
#[must_use]
pub fn target_speed(inputs: &SpeedInputs) -> f32 {
    let shaped = inputs.max_speed
        * heading_throttle(inputs.heading_error)
        * turn_brake(inputs.heading_error);
    let radius = arrival_radius(
        inputs.current_speed,
        inputs.max_speed,
        inputs.decel,
        inputs.mass,
    );
    if inputs.remaining >= radius {
        return shaped;
    }
    let eased = shaped.min(inputs.max_speed * arrival_ease(inputs.remaining, radius));
    if inputs.charging {
        eased.max(inputs.max_speed * CHARGE_SPEED_FLOOR)
    } else {
        eased
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn throttle_is_full_when_aligned_and_floored_when_reversed() {
        assert_relative_eq!(heading_throttle(0.0), 1.0);
        assert_relative_eq!(heading_throttle(PI), HEADING_THROTTLE_FLOOR);
        assert!(heading_throttle(0.5) < 1.0);
    }

    #[rstest]
    fn turn_brake_is_progressive() {
        assert_relative_eq!(turn_brake(0.2), 1.0);
        let moderate = turn_brake(90.0_f32.to_radians());
        let sharp = turn_brake(170.0_f32.to_radians());
        assert!(moderate < 1.0);
        assert!(sharp < moderate);
        assert!(sharp > 0.0);
    }

    #[rstest]
    fn arrival_radius_grows_with_speed_and_mass() {
        let slow = arrival_radius(1.0, 4.0, 28.0, 1.0);
        let fast = arrival_radius(4.0, 4.0, 28.0, 1.0);
        let heavy = arrival_radius(4.0, 4.0, 28.0, 9.0);
        assert_relative_eq!(slow, ARRIVAL_RADIUS_MIN);
        assert!(fast >= slow);
        assert!(heavy > fast);
        assert!(heavy <= ARRIVAL_RADIUS_MAX);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(1.0, 1.0)]
    #[case(2.0, 1.0)]
    fn ease_bounds(#[case] remaining: f32, #[case] expected: f32) {
        assert_relative_eq!(arrival_ease(remaining, 1.0), expected);
    }

    #[rstest]
    fn charging_keeps_a_floor_near_the_goal() {
        let inputs = SpeedInputs {
            max_speed: 5.0,
            heading_error: 0.0,
            remaining: 0.05,
            current_speed: 5.0,
            decel: 28.0,
            mass: 1.0,
            charging: false,
        };
        let braking = target_speed(&inputs);
        let charging = target_speed(&SpeedInputs {
            charging: true,
            ..inputs
        });
        assert!(braking < 5.0 * CHARGE_SPEED_FLOOR);
        assert_relative_eq!(charging, 5.0 * CHARGE_SPEED_FLOOR);
    }
}
