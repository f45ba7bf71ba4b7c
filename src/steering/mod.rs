//! Per-tick locomotion: sticky arrival, mass-scaled integration and facing.
//!
//! Each unit is in one of three [`SteeringState`]s. `Arrived` is latched: the
//! unit only wakes when its goal drifts beyond the stick radius or a live
//! focus pulls it away, which keeps idle units from jittering around their
//! destination.
//!
//! The integrator works on the ground plane only. Velocity is split into a
//! component along the desired direction, which accelerates or brakes towards
//! a shaped target speed, and a lateral slip component that decays.

pub mod speed;
pub mod yaw;

use glam::{Vec2, Vec3};
use log::debug;

use crate::components::{SteeringState, UnitRecord};
use crate::config::SteeringTuning;
use crate::constants::{
    ACCEL_MAX, ACCEL_MIN, ACCEL_REF, DECEL_MAX, DECEL_MIN, DECEL_REF, DEFAULT_ARRIVE_DISTANCE,
    REST_SPEED, SLIP_CORRECTION_RATE, SNAP_DISTANCE_SQ, STICK_RADIUS_FACTOR,
    YAW_MOVE_SPEED_THRESHOLD,
};
use crate::numeric::{non_negative, positive_or};
use crate::physics::{approach, mass_ratio, mass_scaled_rate};
use crate::targeting::Focus;
use crate::vector_math::{angle_delta, forward_of, planar, planar_delta, yaw_of};

pub use speed::{target_speed, SpeedInputs};
pub use yaw::resolve_yaw;

/// What the unit is steering towards this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringGoal {
    /// Point the unit moves towards.
    pub point: Vec3,
    /// A live focus drives the goal and facing.
    pub chasing_focus: bool,
    /// Charging through a hostile focus.
    pub charging: bool,
}

impl SteeringGoal {
    /// Resolves the goal for `record` given this tick's focus.
    #[must_use]
    pub fn resolve(record: &UnitRecord, focus: Option<&Focus>) -> Self {
        let targets = &record.targets;
        let chasing_focus =
            focus.is_some() && targets.active_target_set && targets.target_rotation.is_finite();
        let point = if chasing_focus {
            targets.target_position
        } else {
            targets.goal()
        };
        let charging = chasing_focus
            && record.attacker.is_charging
            && focus.is_some_and(|f| f.hostile);
        Self {
            point,
            chasing_focus,
            charging,
        }
    }
}

/// Advances one unit's locomotion by `dt`.
pub fn step_unit(
    record: &mut UnitRecord,
    focus: Option<&Focus>,
    tuning: &SteeringTuning,
    dt: f32,
) {
    let goal = SteeringGoal::resolve(record, focus);
    let min_distance = positive_or(tuning.arrive_distance, DEFAULT_ARRIVE_DISTANCE);
    let min_sq = min_distance * min_distance;
    let stick = STICK_RADIUS_FACTOR * min_distance;
    let dist_sq = planar_distance_sq(record, goal.point);
    let chase = goal.chasing_focus && dist_sq > min_sq;

    match record.unit.steering {
        SteeringState::Arrived if chase || dist_sq > stick * stick => {
            wake(record, chase);
        }
        SteeringState::Arrived => {
            record.unit.velocity = Vec3::ZERO;
            record.targets.has_arrived = true;
        }
        SteeringState::Seeking | SteeringState::Chasing if !chase && dist_sq <= min_sq => {
            arrive(record);
        }
        SteeringState::Seeking | SteeringState::Chasing => {
            record.unit.steering = if chase {
                SteeringState::Chasing
            } else {
                SteeringState::Seeking
            };
        }
    }

    if record.unit.steering != SteeringState::Arrived {
        integrate(record, &goal, dt);
    }

    let top = max_speed(record);
    resolve_yaw(&mut record.unit, &record.targets, goal.chasing_focus, top, dt);
}

fn planar_distance_sq(record: &UnitRecord, point: Vec3) -> f32 {
    planar_delta(record.unit.position, point).length_squared()
}

fn wake(record: &mut UnitRecord, chase: bool) {
    record.unit.steering = if chase {
        SteeringState::Chasing
    } else {
        SteeringState::Seeking
    };
    record.targets.has_arrived = false;
}

fn arrive(record: &mut UnitRecord) {
    debug!("unit arrived at {:?}", record.unit.position);
    record.unit.steering = SteeringState::Arrived;
    record.unit.velocity = Vec3::ZERO;
    record.targets.has_arrived = true;
    if !record.attacker.attack_move {
        record.targets.active_target_set = false;
    }
}

/// Top speed after the attack-window slowdown.
fn max_speed(record: &UnitRecord) -> f32 {
    let base = non_negative(record.stats.move_speed);
    if record.attacker.is_swinging() {
        base * record.combat.attack_slowdown()
    } else {
        base
    }
}

fn integrate(record: &mut UnitRecord, goal: &SteeringGoal, dt: f32) {
    let offset = planar_delta(record.unit.position, goal.point);
    let distance = offset.length();
    if distance * distance <= SNAP_DISTANCE_SQ {
        snap_to(record, goal.point);
        return;
    }
    let direction = offset / distance;
    let mass = record.unit.mass;
    let top = max_speed(record);
    let accel = mass_scaled_rate(ACCEL_REF, mass, ACCEL_MIN, ACCEL_MAX);
    let decel = mass_scaled_rate(DECEL_REF, mass, DECEL_MIN, DECEL_MAX);

    let velocity = planar(record.unit.velocity);
    let speed = velocity.length();
    let heading = if speed > YAW_MOVE_SPEED_THRESHOLD {
        velocity
    } else {
        forward_of(record.unit.yaw)
    };
    let heading_error = heading_error(heading, direction);

    let wanted = target_speed(&SpeedInputs {
        max_speed: top,
        heading_error,
        remaining: distance,
        current_speed: speed,
        decel,
        mass,
        charging: goal.charging,
    });

    let along = velocity.dot(direction);
    let rate = if along < wanted { accel } else { decel };
    let new_along = approach(along, wanted, rate * dt);

    let speed_fraction = if top > 0.0 { (speed / top).min(1.0) } else { 0.0 };
    let slip_rate = SLIP_CORRECTION_RATE * (0.5 + 0.5 * speed_fraction) / mass_ratio(mass);
    let lateral = (velocity - direction * along) * (-slip_rate * dt).exp();

    let mut next = direction * new_along + lateral;
    if next.length_squared() < REST_SPEED * REST_SPEED && wanted <= REST_SPEED {
        next = Vec2::ZERO;
    }
    if new_along * dt >= distance {
        snap_to(record, goal.point);
        return;
    }
    record.unit.position.x += next.x * dt;
    record.unit.position.z += next.y * dt;
    record.unit.velocity = Vec3::new(next.x, 0.0, next.y);
}

fn snap_to(record: &mut UnitRecord, point: Vec3) {
    record.unit.position.x = point.x;
    record.unit.position.z = point.z;
    record.unit.velocity = Vec3::ZERO;
}

fn heading_error(heading: Vec2, direction: Vec2) -> f32 {
    match (yaw_of(heading), yaw_of(direction)) {
        (Some(from), Some(to)) => angle_delta(from, to).abs(),
        _ => 0.0,
    }
}
