//! Facing resolution, independent of the velocity integrator.
use crate::components::{Unit, UnitTargets};
use crate::constants::{
    BASE_TURN_RATE_DEG, MASS_SCALE_EXPONENT, MAX_TURN_RATE_DEG, TURN_RATE_SPEED_PENALTY,
    YAW_MOVE_SPEED_THRESHOLD,
};
use crate::physics::mass_ratio;
use crate::vector_math::{planar, step_angle, yaw_of};

/// Heading the unit wants to face this tick.
///
/// Movement direction wins above a speed threshold, then the focus facing,
/// then the ordered destination facing.
#[must_use]
pub fn desired_yaw(unit: &Unit, targets: &UnitTargets, focus_facing: bool) -> Option<f32> {
    let velocity = planar(unit.velocity);
    if velocity.length() > YAW_MOVE_SPEED_THRESHOLD {
        if let Some(yaw) = yaw_of(velocity) {
            return Some(yaw);
        }
    }
    if focus_facing && targets.target_rotation.is_finite() {
        return Some(targets.target_rotation);
    }
    Some(targets.destination_rotation).filter(|yaw| yaw.is_finite())
}

/// Maximum turn rate in radians per second.
///
/// Heavier and faster units turn more slowly; the result never exceeds the
/// global cap.
#[must_use]
pub fn turn_rate(mass: f32, speed_fraction: f32) -> f32 {
    let base = BASE_TURN_RATE_DEG / mass_ratio(mass).powf(MASS_SCALE_EXPONENT);
    let penalty = 1.0 - TURN_RATE_SPEED_PENALTY * speed_fraction.clamp(0.0, 1.0);
    (base * penalty).min(MAX_TURN_RATE_DEG).to_radians()
}

/// Turns `unit` towards its desired heading, limited by [`turn_rate`].
pub fn resolve_yaw(
    unit: &mut Unit,
    targets: &UnitTargets,
    focus_facing: bool,
    max_speed: f32,
    dt: f32,
) {
    let Some(goal) = desired_yaw(unit, targets, focus_facing) else {
        return;
    };
    let speed = planar(unit.velocity).length();
    let fraction = if max_speed > 0.0 { speed / max_speed } else { 0.0 };
    let step = turn_rate(unit.mass, fraction) * dt.max(0.0);
    unit.yaw = step_angle(unit.yaw, goal, step);
}
