//! The simulation context: owner of all unit state and the tick pipeline.
//!
//! There is no ambient global state. Callers hold a [`SimulationContext`]
//! and advance it explicitly with [`SimulationContext::step`]. Each step runs
//! three passes, each reading from a fresh [`Snapshot`]:
//!
//! 1. impacts of swings already in progress, buffered in an
//!    [`ImpactLedger`] and applied in slot order, then dead units are reaped;
//! 2. targeting, pursuit and steering;
//! 3. aim acquisition, swing start and timers.
use glam::Vec3;
use log::{debug, info, warn};

use crate::combat::{self, TimerOutcome};
use crate::components::{
    Faction, SteeringState, TemporaryFactionOverride, UnitBlueprint, UnitRecord,
};
use crate::config::{Scenario, SimulationConfig};
use crate::constants::MAX_FACTIONS;
use crate::damage::{HitEvent, ImpactLedger};
use crate::entity::{Arena, UnitHandle};
use crate::error::{ConfigError, OrderError};
use crate::faction::{self, FactionHostilityTable};
use crate::follow;
use crate::orders::{self, Order};
use crate::snapshot::Snapshot;
use crate::steering;
use crate::targeting;

/// Everything a tick produced that presentation or networking may consume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Number of the tick just completed (starting at 1).
    pub tick: u64,
    /// Hits applied this tick, in application order.
    pub hits: Vec<HitEvent>,
    /// Rolls that missed, as `(attacker, victim, attack_tick)`.
    pub misses: Vec<(UnitHandle, UnitHandle, u32)>,
    /// Swings opened this tick with their new `attack_tick`.
    pub swings_started: Vec<(UnitHandle, u32)>,
    /// Windows that closed without resolving an impact.
    pub swings_cancelled: Vec<(UnitHandle, u32)>,
    /// Units removed because their health reached zero.
    pub despawned: Vec<UnitHandle>,
}

/// Authoritative simulation state.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    config: SimulationConfig,
    factions: FactionHostilityTable,
    units: Arena<UnitRecord>,
    tick: u64,
}

impl SimulationContext {
    /// Empty context with the given tuning and hostility.
    #[must_use]
    pub fn new(config: SimulationConfig, factions: FactionHostilityTable) -> Self {
        Self {
            config,
            factions,
            units: Arena::new(),
            tick: 0,
        }
    }

    /// Builds a context from a scenario, spawning its units in file order.
    ///
    /// Unit `i` of the scenario receives the handle with slot index `i`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the scenario's faction table is invalid.
    pub fn from_scenario(scenario: &Scenario) -> Result<(Self, Vec<UnitHandle>), ConfigError> {
        scenario.config.validate()?;
        let mut context = Self::new(scenario.config, scenario.factions.build()?);
        let handles = scenario
            .units
            .iter()
            .map(|blueprint| context.spawn(blueprint))
            .collect();
        Ok((context, handles))
    }

    /// Tuning in use.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Hostility table in use.
    #[must_use]
    pub const fn factions(&self) -> &FactionHostilityTable {
        &self.factions
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Adds a unit with spawn-time defaults.
    pub fn spawn(&mut self, blueprint: &UnitBlueprint) -> UnitHandle {
        let handle = self.units.insert(UnitRecord::from_blueprint(blueprint));
        debug!("spawned {handle:?} for faction {}", blueprint.faction.id());
        handle
    }

    /// Removes a unit, invalidating every handle to it.
    pub fn despawn(&mut self, handle: UnitHandle) -> Option<UnitRecord> {
        self.units.remove(handle)
    }

    /// Looks up a live unit.
    #[must_use]
    pub fn get(&self, handle: UnitHandle) -> Option<&UnitRecord> {
        self.units.get(handle)
    }

    /// Mutable access for collaborators that own extra per-unit state.
    pub fn get_mut(&mut self, handle: UnitHandle) -> Option<&mut UnitRecord> {
        self.units.get_mut(handle)
    }

    /// Live units in slot order.
    pub fn units(&self) -> impl Iterator<Item = (UnitHandle, &UnitRecord)> {
        self.units.iter()
    }

    /// Number of live units.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Applies an order. The core records its sequence but never filters.
    ///
    /// # Errors
    /// Returns [`OrderError`] when the addressee or a referenced target no
    /// longer exists; the order is then ignored.
    pub fn apply_order(&mut self, order: &Order) -> Result<(), OrderError> {
        if let Some(target) = order.referenced_target() {
            if !self.units.contains(target) {
                warn!("dropping order {}: target {target:?} is gone", order.sequence);
                return Err(OrderError::StaleTarget {
                    unit: order.unit,
                    target,
                });
            }
        }
        let Some(record) = self.units.get_mut(order.unit) else {
            warn!("dropping order {}: unit {:?} is gone", order.sequence, order.unit);
            return Err(OrderError::StaleUnit(order.unit));
        };
        orders::apply(record, order);
        Ok(())
    }

    /// Layers a temporary allegiance over a unit's base faction.
    ///
    /// # Errors
    /// Returns [`OrderError::StaleUnit`] for a handle that no longer resolves.
    pub fn set_faction_override(
        &mut self,
        handle: UnitHandle,
        faction: Faction,
        seconds: f32,
    ) -> Result<(), OrderError> {
        let record = self
            .units
            .get_mut(handle)
            .ok_or(OrderError::StaleUnit(handle))?;
        record.faction_override = Some(TemporaryFactionOverride {
            faction,
            seconds_left: seconds,
        });
        Ok(())
    }

    /// Advances one tick using the configured timestep.
    pub fn advance(&mut self) -> TickReport {
        self.step(self.config.dt())
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        for (_, record) in self.units.iter_mut() {
            faction::tick_override(&mut record.faction_override, dt);
        }

        self.resolve_impacts(&mut report);
        self.move_units(dt);
        self.run_combat(dt, &mut report);
        report
    }

    fn resolve_impacts(&mut self, report: &mut TickReport) {
        let snapshot = Snapshot::capture(&self.units);
        let mut ledger = ImpactLedger::default();
        for (handle, record) in self.units.iter_mut() {
            let strikes = combat::resolve_impact(
                handle,
                record,
                &snapshot,
                &self.factions,
                &self.config.combat,
            );
            for strike in &strikes {
                if !strike.landed {
                    report
                        .misses
                        .push((strike.attacker, strike.victim, strike.attack_tick));
                }
            }
            ledger.extend(strikes);
        }
        report.hits = ledger.apply(&mut self.units);

        let dead: Vec<UnitHandle> = self
            .units
            .iter()
            .filter(|(_, record)| !record.health.is_alive())
            .map(|(handle, _)| handle)
            .collect();
        for handle in dead {
            self.units.remove(handle);
            info!("{handle:?} died");
            report.despawned.push(handle);
        }
    }

    fn move_units(&mut self, dt: f32) {
        let snapshot = Snapshot::capture(&self.units);
        let config = &self.config;
        for (handle, record) in self.units.iter_mut() {
            let focus = targeting::update_focus(handle, record, &snapshot, &self.factions);
            if let Some(focus) = focus.as_ref() {
                follow::update_pursuit(record, focus, &config.combat, &config.follow, dt);
            }
            steering::step_unit(record, focus.as_ref(), &config.steering, dt);
        }
    }

    fn run_combat(&mut self, dt: f32, report: &mut TickReport) {
        let snapshot = Snapshot::capture(&self.units);
        let tuning = &self.config.combat;
        for (handle, record) in self.units.iter_mut() {
            combat::acquire_aim(handle, record, &snapshot, &self.factions, tuning);
            if let Some(attack_tick) =
                combat::try_start_swing(handle, record, &snapshot, &self.factions, tuning)
            {
                report.swings_started.push((handle, attack_tick));
            }
            if let TimerOutcome::Cancelled(attack_tick) =
                combat::tick_timers(&mut record.attacker, &record.combat, dt)
            {
                debug!("{handle:?} swing {attack_tick} ended without impact");
                report.swings_cancelled.push((handle, attack_tick));
            }
        }
    }

    /// Stable 64-bit FNV-1a digest of all live state, in slot order.
    ///
    /// Two contexts fed identical inputs produce identical digests, which
    /// makes replay divergence cheap to detect.
    #[must_use]
    pub fn digest(&self) -> u64 {
        let mut hash = Fnv1a::default();
        hash.write_u64(self.tick);
        for (handle, record) in self.units.iter() {
            hash.write_u32(handle.index());
            hash.write_u32(handle.generation());
            hash.write_vec3(record.unit.position);
            hash.write_f32(record.unit.yaw);
            hash.write_vec3(record.unit.velocity);
            hash.write_u32(steering_code(record.unit.steering));
            hash.write_i32(record.health.current);
            let attacker = &record.attacker;
            hash.write_f32(attacker.cooldown_left);
            hash.write_f32(attacker.duration_left);
            hash.write_f32(attacker.impact_delay_left);
            hash.write_u32(u32::from(attacker.impact_done));
            hash.write_u32(attacker.attack_tick);
            hash.write_u32(attacker.attack_cancel_tick);
            hash.write_handle(attacker.aim_entity);
            hash.write_f32(attacker.aim_rotation);
            hash.write_vec3(record.targets.target_position);
            hash.write_f32(record.targets.target_rotation);
            hash.write_handle(record.targets.target_entity);
            hash.write_u32(u32::from(record.effective_faction().id()));
        }
        hash.finish()
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(
            SimulationConfig::default(),
            FactionHostilityTable::default().with_faction_count(MAX_FACTIONS),
        )
    }
}

const fn steering_code(state: SteeringState) -> u32 {
    match state {
        SteeringState::Arrived => 0,
        SteeringState::Seeking => 1,
        SteeringState::Chasing => 2,
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self(FNV_OFFSET)
    }
}

impl Fnv1a {
    fn write_u64(&mut self, value: u64) {
        for shift in (0..64).step_by(8) {
            self.0 ^= (value >> shift) & 0xff;
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn write_i32(&mut self, value: i32) {
        self.write_u32(u32::from(value < 0));
        self.write_u32(value.unsigned_abs());
    }

    fn write_u32(&mut self, value: u32) {
        self.write_u64(u64::from(value));
    }

    fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    fn write_vec3(&mut self, value: Vec3) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    fn write_handle(&mut self, handle: Option<UnitHandle>) {
        match handle {
            Some(h) => {
                self.write_u32(1);
                self.write_u32(h.index());
                self.write_u32(h.generation());
            }
            None => self.write_u32(0),
        }
    }

    const fn finish(&self) -> u64 {
        self.0
    }
}
