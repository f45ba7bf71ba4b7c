//! Per-unit data model.
//!
//! Every simulated unit owns one of each component below, bundled in a
//! [`UnitRecord`]. Optional capabilities (a targeting footprint, a temporary
//! faction override) are explicit `Option` fields rather than looked up at run
//! time.
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_FACTIONS;
use crate::entity::UnitHandle;
use crate::error::FactionIdError;
use crate::numeric::{non_negative, positive_or, unit_interval};

/// Locomotion state of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SteeringState {
    /// Latched idle; velocity stays at zero until woken.
    #[default]
    Arrived,
    /// Moving to the ordered destination.
    Seeking,
    /// Following a live focus entity.
    Chasing,
}

/// Kinematic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// World position; steering only moves it on the ground plane.
    pub position: Vec3,
    /// Heading in radians, `atan2(x, z)` convention.
    pub yaw: f32,
    /// Planar velocity in m/s.
    pub velocity: Vec3,
    /// Mass in reference units; always positive once spawned.
    pub mass: f32,
    /// Locomotion state.
    pub steering: SteeringState,
}

impl Unit {
    /// Creates a resting unit.
    #[must_use]
    pub fn at(position: Vec3, yaw: f32, mass: f32) -> Self {
        Self {
            position,
            yaw,
            velocity: Vec3::ZERO,
            mass: crate::physics::sanitize_mass(mass),
            steering: SteeringState::Arrived,
        }
    }
}

/// Movement and perception stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitStats {
    /// Top speed in m/s.
    pub move_speed: f32,
    /// Radius scanned by auto-targeting.
    pub detection_radius: f32,
    /// Seeds [`Unit::mass`] at spawn.
    pub weight: f32,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            detection_radius: 12.0,
            weight: 1.0,
        }
    }
}

/// Melee weapon stats. All values are saturated at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatStats {
    /// Chance in `[0, 1]` that a roll lands.
    pub hitchance: f32,
    /// Reach beyond both footprints, in metres.
    pub attack_range: f32,
    /// Full cone aperture in degrees, within `(0, 180]`.
    pub attack_cone_deg: f32,
    /// Swing rate; sets the minimum cooldown.
    pub attacks_per_second: f32,
    /// Speed multiplier while an attack window is open.
    pub attack_slowdown: f32,
    /// Seconds the attack window stays open.
    pub attack_duration: f32,
    /// Seconds from swing start to impact.
    pub impact_delay: f32,
    /// Cap on victims per impact; `None` hits every candidate.
    pub max_entities_hit: Option<u32>,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            hitchance: 0.75,
            attack_range: 1.5,
            attack_cone_deg: 60.0,
            attacks_per_second: 1.0,
            attack_slowdown: 0.4,
            attack_duration: 0.8,
            impact_delay: 0.4,
            max_entities_hit: Some(1),
        }
    }
}

impl CombatStats {
    /// Hit chance clamped into `[0, 1]`.
    #[must_use]
    pub fn hitchance(&self) -> f32 {
        unit_interval(self.hitchance)
    }

    /// Non-negative attack range.
    #[must_use]
    pub fn attack_range(&self) -> f32 {
        non_negative(self.attack_range)
    }

    /// Half of the cone aperture in radians, within `(0, PI/2]`.
    #[must_use]
    pub fn cone_half_angle(&self) -> f32 {
        let degrees = positive_or(self.attack_cone_deg, 1.0).min(180.0);
        (degrees * 0.5).to_radians()
    }

    /// Seconds between the end of one window and the next swing.
    #[must_use]
    pub fn attack_interval(&self) -> f32 {
        1.0 / positive_or(self.attacks_per_second, 1.0)
    }

    /// Slowdown clamped into `[0, 1]`.
    #[must_use]
    pub fn attack_slowdown(&self) -> f32 {
        unit_interval(self.attack_slowdown)
    }

    /// Window length, always positive.
    #[must_use]
    pub fn attack_duration(&self) -> f32 {
        positive_or(self.attack_duration, f32::EPSILON)
    }

    /// Impact delay clamped into `[0, attack_duration]`.
    #[must_use]
    pub fn impact_delay(&self) -> f32 {
        non_negative(self.impact_delay).min(self.attack_duration())
    }
}

/// Per-unit attack state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attacker {
    /// Seconds until the next swing may start.
    pub cooldown_left: f32,
    /// Seconds until the impact is due.
    pub impact_delay_left: f32,
    /// Seconds until the attack window closes.
    pub duration_left: f32,
    /// Whether this window already made its impact attempt.
    pub impact_done: bool,
    /// Incremented once per swing start; presentation keys animations on it.
    pub attack_tick: u32,
    /// Set to the swing's `attack_tick` when it expired without an impact.
    pub attack_cancel_tick: u32,
    /// Unit currently aimed at.
    pub aim_entity: Option<UnitHandle>,
    /// Position of the aimed unit when aim was last taken.
    pub aim_position: Vec3,
    /// `NaN` means "no aim".
    pub aim_rotation: f32,
    /// Mirror of the focus chosen by auto-targeting.
    pub attack_target_entity: Option<UnitHandle>,
    /// Whether the unit picks its own targets.
    pub auto_target: bool,
    /// `< 0` aggressive, `0` hold ground, `> 0` defensive leash radius.
    pub max_chase_meters: f32,
    /// Engage hostiles met while moving.
    pub attack_move: bool,
    /// Run through the focus instead of stopping at a ring.
    pub is_charging: bool,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            cooldown_left: 0.0,
            impact_delay_left: 0.0,
            duration_left: 0.0,
            impact_done: true,
            attack_tick: 0,
            attack_cancel_tick: 0,
            aim_entity: None,
            aim_position: Vec3::ZERO,
            aim_rotation: f32::NAN,
            attack_target_entity: None,
            auto_target: true,
            max_chase_meters: -1.0,
            attack_move: false,
            is_charging: false,
        }
    }
}

impl Attacker {
    /// Whether an attack window is currently open.
    #[must_use]
    pub fn is_swinging(&self) -> bool {
        self.duration_left > 0.0
    }

    /// Whether the unit currently holds a valid aim.
    #[must_use]
    pub fn has_aim(&self) -> bool {
        self.aim_rotation.is_finite()
    }

    /// Drops the current aim.
    pub fn clear_aim(&mut self) {
        self.aim_entity = None;
        self.aim_rotation = f32::NAN;
    }

    /// Current phase of the attack window.
    #[must_use]
    pub fn phase(&self) -> AttackPhase {
        if self.duration_left > 0.0 {
            if self.impact_done {
                AttackPhase::Recovery
            } else if self.impact_delay_left > 0.0 {
                AttackPhase::Windup
            } else {
                AttackPhase::Impact
            }
        } else if self.cooldown_left > 0.0 {
            AttackPhase::Cooldown
        } else {
            AttackPhase::Idle
        }
    }
}

/// Observable phase of an [`Attacker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    /// No window open and no cooldown pending.
    Idle,
    /// Window open, impact not yet due.
    Windup,
    /// Impact is due and will resolve at the start of the next tick.
    Impact,
    /// Impact resolved; the slowed tail of the window is still running.
    Recovery,
    /// Window closed, waiting for the next swing.
    Cooldown,
}

/// Movement intent and resolved pursuit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTargets {
    /// Ordered destination.
    pub destination_position: Vec3,
    /// Ordered facing on arrival.
    pub destination_rotation: f32,
    /// Offset added to the destination by formation orders.
    pub formation_offset: Vec3,
    /// Smoothed pursuit point around the focus.
    pub target_position: Vec3,
    /// Smoothed facing towards the focus; `NaN` means "no focus facing".
    pub target_rotation: f32,
    /// Explicit focus from a player order.
    pub target_entity: Option<UnitHandle>,
    /// Whether a focus currently drives movement.
    pub active_target_set: bool,
    /// Whether arrival has latched.
    pub has_arrived: bool,
    /// Highest order sequence applied so far.
    pub last_applied_sequence: u64,
}

impl UnitTargets {
    /// Targets for a unit resting at `position`.
    #[must_use]
    pub fn resting_at(position: Vec3, yaw: f32) -> Self {
        Self {
            destination_position: position,
            destination_rotation: yaw,
            formation_offset: Vec3::ZERO,
            target_position: position,
            target_rotation: f32::NAN,
            target_entity: None,
            active_target_set: false,
            has_arrived: true,
            last_applied_sequence: 0,
        }
    }

    /// Destination including the formation offset.
    #[must_use]
    pub fn goal(&self) -> Vec3 {
        self.destination_position + self.formation_offset
    }
}

/// Faction id in `[0, 31]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Faction(u8);

impl Faction {
    /// Creates a faction id, rejecting values outside the table.
    ///
    /// # Errors
    /// Returns [`FactionIdError`] when `id` is not below [`MAX_FACTIONS`].
    pub fn new(id: u8) -> Result<Self, FactionIdError> {
        if usize::from(id) < MAX_FACTIONS {
            Ok(Self(id))
        } else {
            Err(FactionIdError(id))
        }
    }

    /// Raw id.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Faction {
    type Error = FactionIdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Faction> for u8 {
    fn from(value: Faction) -> Self {
        value.0
    }
}

/// Temporary allegiance layered over the base faction (e.g. mind control).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporaryFactionOverride {
    /// Faction used while the override lasts.
    pub faction: Faction,
    /// Remaining duration in seconds.
    pub seconds_left: f32,
}

impl TemporaryFactionOverride {
    /// Whether time remains on the override.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.seconds_left > 0.0
    }
}

/// Footprint used for reach and ring spacing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetingSize {
    /// Footprint radius in metres.
    pub radius: f32,
    /// Footprint height in metres.
    pub height: f32,
}

impl TargetingSize {
    /// Non-negative radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        non_negative(self.radius)
    }
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Remaining hit points.
    pub current: i32,
    /// Hit points at spawn.
    pub max: i32,
}

impl Health {
    /// Health filled to `max`.
    #[must_use]
    pub const fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Whether any hit points remain.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.current > 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full(10)
    }
}

/// How a unit positions itself around a hostile focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnchorPolicy {
    /// Always move to the outer ring.
    Kiting,
    /// Hold anywhere between the inner and outer rings.
    #[default]
    Zone,
}

/// Player-selected engagement stance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stance {
    /// Auto pursuit is unbounded.
    Aggressive,
    /// Auto pursuit stays within `radius` of the destination.
    Defensive {
        /// Leash radius in metres.
        radius: f32,
    },
    /// Auto pursuit never leaves the current position.
    HoldGround,
}

impl Stance {
    /// Leash distance stored in [`Attacker::max_chase_meters`].
    #[must_use]
    pub fn max_chase_meters(self) -> f32 {
        match self {
            Self::Aggressive => -1.0,
            // A zero radius would silently turn defensive into hold ground.
            Self::Defensive { radius } => positive_or(radius, f32::EPSILON),
            Self::HoldGround => 0.0,
        }
    }
}

/// Description of a unit to spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitBlueprint {
    /// Spawn position.
    pub position: Vec3,
    /// Spawn heading in radians.
    #[serde(default)]
    pub yaw: f32,
    /// Base faction.
    pub faction: Faction,
    /// Movement stats.
    #[serde(default)]
    pub stats: UnitStats,
    /// Weapon stats.
    #[serde(default)]
    pub combat: CombatStats,
    /// Starting health.
    #[serde(default)]
    pub health: Health,
    /// Optional footprint.
    #[serde(default)]
    pub size: Option<TargetingSize>,
    /// Positioning around a hostile focus.
    #[serde(default)]
    pub anchor: AnchorPolicy,
    /// Initial auto-targeting toggle.
    #[serde(default = "default_auto_target")]
    pub auto_target: bool,
    /// Initial stance.
    #[serde(default = "default_stance")]
    pub stance: Stance,
}

const fn default_auto_target() -> bool {
    true
}

const fn default_stance() -> Stance {
    Stance::Aggressive
}

impl UnitBlueprint {
    /// Blueprint with default stats for `faction` at `position`.
    #[must_use]
    pub fn new(faction: Faction, position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            faction,
            stats: UnitStats::default(),
            combat: CombatStats::default(),
            health: Health::default(),
            size: None,
            anchor: AnchorPolicy::default(),
            auto_target: true,
            stance: Stance::Aggressive,
        }
    }
}

/// All state owned by one simulated unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRecord {
    /// Kinematic state.
    pub unit: Unit,
    /// Movement stats.
    pub stats: UnitStats,
    /// Weapon stats.
    pub combat: CombatStats,
    /// Attack state machine.
    pub attacker: Attacker,
    /// Movement intent and pursuit point.
    pub targets: UnitTargets,
    /// Base faction.
    pub faction: Faction,
    /// Temporary allegiance, if any.
    pub faction_override: Option<TemporaryFactionOverride>,
    /// Optional footprint.
    pub size: Option<TargetingSize>,
    /// Hit points.
    pub health: Health,
    /// Positioning around a hostile focus.
    pub anchor: AnchorPolicy,
}

impl UnitRecord {
    /// Builds the spawn-time record for `blueprint`.
    #[must_use]
    pub fn from_blueprint(blueprint: &UnitBlueprint) -> Self {
        let attacker = Attacker {
            auto_target: blueprint.auto_target,
            max_chase_meters: blueprint.stance.max_chase_meters(),
            ..Attacker::default()
        };
        Self {
            unit: Unit::at(blueprint.position, blueprint.yaw, blueprint.stats.weight),
            stats: blueprint.stats,
            combat: blueprint.combat,
            attacker,
            targets: UnitTargets::resting_at(blueprint.position, blueprint.yaw),
            faction: blueprint.faction,
            faction_override: None,
            size: blueprint.size,
            health: blueprint.health,
            anchor: blueprint.anchor,
        }
    }

    /// Footprint radius; units without a [`TargetingSize`] have none.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.size.map_or(0.0, |size| size.radius())
    }

    /// Faction used for hostility checks this tick.
    #[must_use]
    pub fn effective_faction(&self) -> Faction {
        crate::faction::effective_faction(self.faction, self.faction_override.as_ref())
    }
}
