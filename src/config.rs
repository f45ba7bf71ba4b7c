//! Simulation tuning, faction tables and scenario files.
//!
//! All structures deserialise from JSON with every field optional, so a
//! scenario only needs to spell out what differs from the defaults.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::UnitBlueprint;
use crate::constants::{
    DEFAULT_AIM_HYSTERESIS, DEFAULT_ARRIVE_DISTANCE, DEFAULT_DAMAGE_PER_HIT,
    DEFAULT_FOLLOW_PADDING, DEFAULT_POST_IMPACT_SLOW_EXTENSION, DEFAULT_REACH_TOLERANCE,
    DEFAULT_TICK_HZ, PURSUIT_SMOOTHING_RATE,
};
use crate::error::ConfigError;
use crate::faction::FactionHostilityTable;
use crate::orders::OrderKind;

/// Arrival tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringTuning {
    /// Planar distance at which a unit counts as arrived.
    pub arrive_distance: f32,
}

impl Default for SteeringTuning {
    fn default() -> Self {
        Self {
            arrive_distance: DEFAULT_ARRIVE_DISTANCE,
        }
    }
}

/// Melee tuning shared by every attacker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Slack added to attack range when testing reach.
    pub reach_tolerance: f32,
    /// Fractional improvement needed before switching aim.
    pub aim_hysteresis: f32,
    /// Seconds the slowed window lingers past the nominal duration.
    pub post_impact_slow_extension: f32,
    /// Health removed by one landed hit.
    pub damage_per_hit: i32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            reach_tolerance: DEFAULT_REACH_TOLERANCE,
            aim_hysteresis: DEFAULT_AIM_HYSTERESIS,
            post_impact_slow_extension: DEFAULT_POST_IMPACT_SLOW_EXTENSION,
            damage_per_hit: DEFAULT_DAMAGE_PER_HIT,
        }
    }
}

/// Pursuit-point tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowTuning {
    /// Extra gap kept from a friendly focus.
    pub follow_padding: f32,
    /// Exponential smoothing rate for the pursuit point.
    pub smoothing_rate: f32,
}

impl Default for FollowTuning {
    fn default() -> Self {
        Self {
            follow_padding: DEFAULT_FOLLOW_PADDING,
            smoothing_rate: PURSUIT_SMOOTHING_RATE,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation rate in ticks per second.
    pub tick_hz: f32,
    /// Arrival tuning.
    pub steering: SteeringTuning,
    /// Melee tuning.
    pub combat: CombatTuning,
    /// Pursuit-point tuning.
    pub follow: FollowTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,
            steering: SteeringTuning::default(),
            combat: CombatTuning::default(),
            follow: FollowTuning::default(),
        }
    }
}

impl SimulationConfig {
    /// Fixed timestep in seconds.
    #[must_use]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz
    }

    /// Checks values that cannot be saturated sensibly.
    ///
    /// # Errors
    /// Returns [`ConfigError::TickRate`] for a non-positive or non-finite
    /// tick rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz.is_finite() && self.tick_hz > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::TickRate(self.tick_hz))
        }
    }
}

/// Serialised form of the hostility table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactionConfig {
    /// Hostile `(of, towards)` pairs, optionally mirrored.
    Pairs {
        /// `(of, towards)` pairs marking `towards` hostile to `of`.
        hostile_pairs: Vec<(u8, u8)>,
        /// Also mark each `of` hostile to its `towards`.
        #[serde(default)]
        symmetric: bool,
    },
    /// Raw bitmask rows, one per faction.
    Rows {
        /// Row `i` has bit `j` set when `j` is hostile to `i`.
        rows: Vec<u32>,
    },
}

impl Default for FactionConfig {
    fn default() -> Self {
        Self::Rows { rows: Vec::new() }
    }
}

impl FactionConfig {
    /// Builds the immutable table.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for out-of-range ids or too many rows.
    pub fn build(&self) -> Result<FactionHostilityTable, ConfigError> {
        match self {
            Self::Pairs {
                hostile_pairs,
                symmetric,
            } => Ok(FactionHostilityTable::from_pairs(hostile_pairs, *symmetric)?),
            Self::Rows { rows } => FactionHostilityTable::from_rows(rows),
        }
    }
}

/// An order scheduled by a scenario, addressed by unit position in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedOrder {
    /// Tick at or after which the order is applied.
    pub tick: u64,
    /// Index into [`Scenario::units`].
    pub unit: usize,
    /// What the unit is told to do.
    pub order: ScenarioOrder,
}

/// Scenario-side order; unit references are indices into the unit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioOrder {
    /// Focus another scenario unit.
    Attack {
        /// Index into [`Scenario::units`].
        target: usize,
    },
    /// Any order that names no other unit.
    Other(OrderKind),
}

/// A self-contained match setup for the headless runner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Simulation tuning.
    pub config: SimulationConfig,
    /// Hostility table.
    pub factions: FactionConfig,
    /// Units spawned in file order.
    pub units: Vec<UnitBlueprint>,
    /// Orders applied as the run reaches their tick.
    pub orders: Vec<ScriptedOrder>,
}

impl Scenario {
    /// Parses and validates a scenario from JSON text.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on malformed JSON or invalid values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reads a scenario file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_json`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        self.factions.build()?;
        let count = self.units.len();
        for scripted in &self.orders {
            let mut referenced = vec![scripted.unit];
            if let ScenarioOrder::Attack { target } = scripted.order {
                referenced.push(target);
            }
            if let Some(&bad) = referenced.iter().find(|&&i| i >= count) {
                return Err(ConfigError::UnknownScenarioUnit(bad, count));
            }
        }
        Ok(())
    }
}
