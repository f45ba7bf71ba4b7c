//! Error types surfaced by configuration loading and order ingestion.
//!
//! Simulation ticks themselves never fail; these errors only arise at the
//! edges where external data enters the core.
use std::path::PathBuf;

use thiserror::Error;

use crate::entity::UnitHandle;

/// A faction id outside `[0, 31]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("faction id {0} is outside the supported range 0..=31")]
pub struct FactionIdError(pub u8);

/// Failures while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for the expected shape.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// A faction id lies outside the table.
    #[error(transparent)]
    FactionId(#[from] FactionIdError),
    /// More rows than the table can hold.
    #[error("faction table has {0} rows; at most 32 are supported")]
    TooManyFactionRows(usize),
    /// The tick rate cannot produce a timestep.
    #[error("tick rate must be a positive finite number, got {0}")]
    TickRate(f32),
    /// A scripted order names a unit the scenario lacks.
    #[error("scripted order references unit #{0}, but the scenario only defines {1} units")]
    UnknownScenarioUnit(usize, usize),
}

/// Failures while applying an order to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The addressed unit is gone.
    #[error("order addressed to {0:?}, which no longer exists")]
    StaleUnit(UnitHandle),
    /// The attack target is gone.
    #[error("attack order from {unit:?} names {target:?}, which no longer exists")]
    StaleTarget {
        /// Unit that received the order.
        unit: UnitHandle,
        /// Target that no longer resolves.
        target: UnitHandle,
    },
}
