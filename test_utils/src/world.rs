//! Pre-wired simulations.

use skirmish::config::SimulationConfig;
use skirmish::entity::UnitHandle;
use skirmish::faction::FactionHostilityTable;
use skirmish::world::{SimulationContext, TickReport};

use crate::UnitBuilder;

/// Hostility table from `(of, towards)` pairs.
///
/// # Panics
/// Panics if a pair names a faction outside the table.
#[must_use]
pub fn hostility(pairs: &[(u8, u8)], symmetric: bool) -> FactionHostilityTable {
    FactionHostilityTable::from_pairs(pairs, symmetric)
        .unwrap_or_else(|e| panic!("test hostility table: {e}"))
}

/// A lone attacker facing a passive victim one metre ahead.
#[derive(Debug, Clone)]
pub struct Duel {
    pub sim: SimulationContext,
    pub attacker: UnitHandle,
    pub victim: UnitHandle,
}

/// The attacker used by [`duel`]: a 30 degree cone with a sure hit, a one
/// second window, half a second of windup and one attack per second.
#[must_use]
pub fn duelist() -> UnitBuilder {
    UnitBuilder::new(0)
        .range(1.5)
        .cone(30.0)
        .hitchance(1.0)
        .swing(1.0, 0.5)
        .attacks_per_second(1.0)
}

/// Builds a [`Duel`]: faction 0 is hostile to faction 1 but not the other way
/// round, the attacker stands at the origin facing `+Z`, and both units have
/// no footprint.
#[must_use]
pub fn duel() -> Duel {
    duel_with(SimulationConfig::default(), duelist())
}

/// A [`duel`] under `config` with a custom attacker.
///
/// The victim stands one metre ahead of the attacker with ten health.
#[must_use]
pub fn duel_with(config: SimulationConfig, fighter: UnitBuilder) -> Duel {
    let mut sim = SimulationContext::new(config, hostility(&[(0, 1)], false));
    let attacker = sim.spawn(&fighter.build());
    let victim = sim.spawn(&UnitBuilder::new(1).at(0.0, 1.0).health(10).build());
    Duel {
        sim,
        attacker,
        victim,
    }
}

/// Advances `sim` by `ticks` configured steps, collecting every report.
pub fn run_ticks(sim: &mut SimulationContext, ticks: usize) -> Vec<TickReport> {
    (0..ticks).map(|_| sim.advance()).collect()
}
