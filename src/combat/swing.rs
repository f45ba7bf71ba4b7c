//! Swing start and attack timers.
use log::debug;

use crate::components::{Attacker, CombatStats, UnitRecord};
use crate::config::CombatTuning;
use crate::entity::UnitHandle;
use crate::faction::FactionHostilityTable;
use crate::snapshot::Snapshot;

use super::cone_targets;

/// Whether the attacker's timers and aim allow a new swing.
#[must_use]
pub fn ready_to_swing(attacker: &Attacker) -> bool {
    attacker.cooldown_left <= 0.0 && attacker.duration_left <= 0.0 && attacker.has_aim()
}

/// Opens a new attack window when the unit is ready and a hostile stands in
/// its cone. Returns the new `attack_tick` on success.
pub fn try_start_swing(
    handle: UnitHandle,
    record: &mut UnitRecord,
    snapshot: &Snapshot,
    table: &FactionHostilityTable,
    tuning: &CombatTuning,
) -> Option<u32> {
    if !ready_to_swing(&record.attacker) {
        return None;
    }
    if cone_targets(handle, record, snapshot, table, tuning).is_empty() {
        return None;
    }
    let combat = record.combat;
    let attacker = &mut record.attacker;
    attacker.duration_left =
        combat.attack_duration() + tuning.post_impact_slow_extension.max(0.0);
    attacker.impact_delay_left = combat.impact_delay();
    attacker.impact_done = false;
    attacker.attack_tick = attacker.attack_tick.wrapping_add(1);
    debug!("{handle:?} started swing {}", attacker.attack_tick);
    Some(attacker.attack_tick)
}

/// Result of counting an attacker's timers down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// No window closed this tick.
    Running,
    /// The window closed after its impact resolved.
    Completed,
    /// The window closed without an impact; carries the swing's tick.
    Cancelled(u32),
}

/// Counts cooldown and window timers down by `dt`.
///
/// When the window closes the cooldown is raised to at least one attack
/// interval, and an unresolved impact is forced done as a miss. A window
/// whose impact only fell due during this decrement stays open for one more
/// step so the next impact pass can resolve it.
pub fn tick_timers(attacker: &mut Attacker, combat: &CombatStats, dt: f32) -> TimerOutcome {
    let step = dt.max(0.0);
    attacker.cooldown_left = (attacker.cooldown_left - step).max(0.0);
    if !attacker.is_swinging() {
        return TimerOutcome::Running;
    }
    let fresh_impact = !attacker.impact_done && attacker.impact_delay_left >= 0.0;
    attacker.duration_left -= step;
    attacker.impact_delay_left -= step;
    if attacker.duration_left > 0.0 {
        return TimerOutcome::Running;
    }
    if fresh_impact && step > 0.0 {
        attacker.duration_left = step;
        attacker.impact_delay_left = attacker.impact_delay_left.min(0.0);
        return TimerOutcome::Running;
    }
    attacker.duration_left = 0.0;
    attacker.impact_delay_left = 0.0;
    attacker.cooldown_left = attacker.cooldown_left.max(combat.attack_interval());
    if attacker.impact_done {
        TimerOutcome::Completed
    } else {
        attacker.impact_done = true;
        attacker.attack_cancel_tick = attacker.attack_tick;
        TimerOutcome::Cancelled(attacker.attack_tick)
    }
}
