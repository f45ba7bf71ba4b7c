//! Tuning constants shared by the steering and combat passes.
//!
//! Values that designers are expected to tweak per match live in
//! [`SimulationConfig`](crate::config::SimulationConfig) and default to the
//! constants below. Everything else is a fixed part of the movement model.

/// Number of factions addressable by the hostility table.
pub const MAX_FACTIONS: usize = 32;

/// Default fixed simulation rate.
pub const DEFAULT_TICK_HZ: f32 = 64.0;

// --- steering -------------------------------------------------------------

/// Planar distance within which a unit counts as arrived.
pub const DEFAULT_ARRIVE_DISTANCE: f32 = 0.15;
/// Multiplier applied to the arrive distance for the sticky wake-up radius.
pub const STICK_RADIUS_FACTOR: f32 = 3.0;

/// Reference mass at which the accel/decel references apply unscaled.
pub const REF_MASS: f32 = 1.0;
/// Exponent of the mass scaling curve for acceleration and deceleration.
pub const MASS_SCALE_EXPONENT: f32 = 0.5;

/// Acceleration (m/s²) at the reference mass.
pub const ACCEL_REF: f32 = 18.0;
/// Lower clamp on scaled acceleration.
pub const ACCEL_MIN: f32 = 3.0;
/// Upper clamp on scaled acceleration.
pub const ACCEL_MAX: f32 = 40.0;

/// Deceleration (m/s²) at the reference mass.
pub const DECEL_REF: f32 = 28.0;
/// Lower clamp on scaled deceleration.
pub const DECEL_MIN: f32 = 5.0;
/// Upper clamp on scaled deceleration.
pub const DECEL_MAX: f32 = 60.0;

/// Lowest throttle a unit keeps while turning away from its goal.
pub const HEADING_THROTTLE_FLOOR: f32 = 0.15;
/// Exponent applied to `cos(heading_error)` for the throttle curve.
pub const HEADING_THROTTLE_EXPONENT: f32 = 2.0;

/// Base rate (1/s) at which sideways velocity decays.
pub const SLIP_CORRECTION_RATE: f32 = 10.0;

/// Heading error (degrees) beyond which turn braking engages.
pub const TURN_BRAKE_THRESHOLD_DEG: f32 = 50.0;
/// Extra deceleration multiplier at a full reversal.
pub const TURN_BRAKE_STRENGTH: f32 = 1.5;
/// Exponent shaping how quickly turn braking ramps with sharpness.
pub const TURN_BRAKE_EXPONENT: f32 = 1.5;

/// Safety margin applied to the physical stopping distance.
pub const ARRIVAL_SAFETY_FACTOR: f32 = 1.35;
/// Smallest radius inside which arrival easing applies.
pub const ARRIVAL_RADIUS_MIN: f32 = 0.4;
/// Largest arrival easing radius.
pub const ARRIVAL_RADIUS_MAX: f32 = 6.0;
/// Fraction of max speed a charging unit keeps while closing on a hostile focus.
pub const CHARGE_SPEED_FLOOR: f32 = 0.6;

/// Squared distance below which the remaining offset is snapped away.
pub const SNAP_DISTANCE_SQ: f32 = 1.0e-4;
/// Speeds below this are treated as standing still.
pub const REST_SPEED: f32 = 1.0e-3;

/// Speed above which yaw follows the movement direction.
pub const YAW_MOVE_SPEED_THRESHOLD: f32 = 0.35;
/// Base turn rate for a reference-mass unit (degrees per second).
pub const BASE_TURN_RATE_DEG: f32 = 540.0;
/// Global yaw rate cap (degrees per second).
pub const MAX_TURN_RATE_DEG: f32 = 720.0;
/// Share of the turn rate lost at full speed.
pub const TURN_RATE_SPEED_PENALTY: f32 = 0.4;

// --- follow / anchor ------------------------------------------------------

/// Exponential smoothing rate for the pursuit point (1/s).
pub const PURSUIT_SMOOTHING_RATE: f32 = 14.0;
/// Extra spacing kept from friendly follow targets.
pub const DEFAULT_FOLLOW_PADDING: f32 = 0.75;

// --- combat ---------------------------------------------------------------

/// Slack added to or removed from melee reach.
pub const DEFAULT_REACH_TOLERANCE: f32 = 0.1;
/// Minimum relative improvement required to switch aim.
pub const DEFAULT_AIM_HYSTERESIS: f32 = 0.1;
/// Seconds the attack slowdown persists after the nominal swing duration.
pub const DEFAULT_POST_IMPACT_SLOW_EXTENSION: f32 = 0.25;
/// Health removed by one landed hit.
pub const DEFAULT_DAMAGE_PER_HIT: i32 = 1;
