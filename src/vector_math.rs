//! Planar vector helpers.
//!
//! Steering and combat treat the world as a ground plane: the `y` axis is
//! ignored for distances, headings and cone tests. Yaw follows the
//! `atan2(x, z)` convention, so a yaw of zero faces `+Z`.
use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// Projects a world position onto the ground plane.
#[inline]
#[must_use]
pub const fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Planar offset from `from` to `to`.
#[inline]
#[must_use]
pub fn planar_delta(from: Vec3, to: Vec3) -> Vec2 {
    planar(to) - planar(from)
}

/// Squared planar distance between two positions.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use skirmish::vector_math::planar_distance_sq;
/// let d = planar_distance_sq(Vec3::ZERO, Vec3::new(3.0, 10.0, 4.0));
/// assert!((d - 25.0).abs() < f32::EPSILON);
/// ```
#[inline]
#[must_use]
pub fn planar_distance_sq(a: Vec3, b: Vec3) -> f32 {
    planar_delta(a, b).length_squared()
}

/// Yaw (radians) of a planar direction. Returns `None` for a zero or
/// non-finite vector.
#[must_use]
pub fn yaw_of(direction: Vec2) -> Option<f32> {
    if !direction.is_finite() || direction.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(direction.x.atan2(direction.y))
}

/// Unit planar direction for a yaw.
#[inline]
#[must_use]
pub fn forward_of(yaw: f32) -> Vec2 {
    let (sin, cos) = yaw.sin_cos();
    Vec2::new(sin, cos)
}

/// Yaw from `from` facing `to`, or `None` when the points coincide.
#[must_use]
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<f32> {
    yaw_of(planar_delta(from, to))
}

/// Wraps an angle into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Signed shortest difference `to - from`.
#[inline]
#[must_use]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Interpolates between two angles along the shortest arc.
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + angle_delta(from, to) * t)
}

/// Moves `from` towards `to` by at most `max_step` radians.
#[must_use]
pub fn step_angle(from: f32, to: f32, max_step: f32) -> f32 {
    let delta = angle_delta(from, to);
    if delta.abs() <= max_step {
        wrap_angle(to)
    } else {
        wrap_angle(from + max_step.copysign(delta))
    }
}

/// Blend factor for exponential smoothing at `rate` over `dt`.
///
/// Equivalent to `1 - e^(-rate * dt)`; independent of frame rate.
#[inline]
#[must_use]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt.max(0.0)).exp()
}

/// Whether `target` lies inside a cone of `half_angle` radians opening from
/// `origin` along `yaw`. Points at the origin count as inside.
#[must_use]
pub fn within_cone(origin: Vec3, yaw: f32, half_angle: f32, target: Vec3) -> bool {
    let offset = planar_delta(origin, target);
    let len_sq = offset.length_squared();
    if len_sq <= f32::EPSILON {
        return true;
    }
    let cos_half = half_angle.cos();
    let along = forward_of(yaw).dot(offset);
    if cos_half >= 0.0 {
        along >= 0.0 && along * along >= cos_half * cos_half * len_sq
    } else {
        along >= cos_half * len_sq.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Vec2::new(0.0, 1.0), 0.0)]
    #[case(Vec2::new(1.0, 0.0), PI / 2.0)]
    #[case(Vec2::new(0.0, -1.0), PI)]
    fn yaw_of_follows_atan2_x_z(#[case] dir: Vec2, #[case] expected: f32) {
        let yaw = yaw_of(dir).expect("non-zero direction");
        assert_relative_eq!(yaw, expected, epsilon = 1e-6);
    }

    #[rstest]
    fn yaw_of_rejects_degenerate_vectors() {
        assert!(yaw_of(Vec2::ZERO).is_none());
        assert!(yaw_of(Vec2::new(f32::NAN, 1.0)).is_none());
    }

    #[rstest]
    #[case(2.5 * PI, 0.5 * PI)]
    #[case(-2.5 * PI, -0.5 * PI)]
    #[case(0.5, 0.5)]
    fn wrap_angle_stays_in_range(#[case] input: f32, #[case] expected: f32) {
        assert_relative_eq!(wrap_angle(input), expected, epsilon = 1e-5);
    }

    #[rstest]
    fn lerp_angle_takes_short_way_round() {
        let from = PI - 0.1;
        let to = -PI + 0.1;
        let mid = lerp_angle(from, to, 0.5);
        assert_relative_eq!(mid.abs(), PI, epsilon = 1e-5);
    }

    #[rstest]
    fn step_angle_clamps_turn() {
        assert_relative_eq!(step_angle(0.0, 1.0, 0.25), 0.25);
        assert_relative_eq!(step_angle(0.0, -1.0, 0.25), -0.25);
        assert_relative_eq!(step_angle(0.0, 0.1, 0.25), 0.1);
    }

    #[rstest]
    #[case(Vec3::new(0.0, 0.0, 1.0), true)]
    #[case(Vec3::new(0.2, 0.0, 1.0), true)]
    #[case(Vec3::new(1.0, 0.0, 1.0), false)]
    #[case(Vec3::new(0.0, 0.0, -1.0), false)]
    fn cone_membership(#[case] target: Vec3, #[case] inside: bool) {
        let half = 15.0_f32.to_radians();
        assert_eq!(within_cone(Vec3::ZERO, 0.0, half, target), inside);
    }

    #[rstest]
    fn wide_cone_includes_flanks() {
        let half = 170.0_f32.to_radians() / 2.0 + 0.5;
        assert!(within_cone(Vec3::ZERO, 0.0, half, Vec3::new(1.0, 0.0, -0.1)));
    }

    #[rstest]
    fn smoothing_factor_is_bounded() {
        assert_relative_eq!(smoothing_factor(14.0, 0.0), 0.0);
        let f = smoothing_factor(14.0, 1.0 / 64.0);
        assert!(f > 0.0 && f < 1.0);
    }
}
