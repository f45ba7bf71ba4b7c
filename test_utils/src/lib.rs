//! Utility helpers for tests.
//!
//! Builders for unit blueprints and small pre-wired simulations, so
//! integration tests can state only what differs from the defaults.

pub mod units;
pub mod world;

pub use units::{faction, UnitBuilder};
pub use world::{duel, duel_with, duelist, hostility, run_ticks, Duel};
