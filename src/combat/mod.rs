//! Melee attack-window state machine.
//!
//! An attacker moves through `Idle → Windup → Impact → Cooldown → Idle`
//! (see [`AttackPhase`](crate::components::AttackPhase)). Each tick the
//! simulation context drives the stages in a fixed order:
//!
//! 1. [`impact::resolve_impact`] consumes windows whose windup elapsed on a
//!    previous tick,
//! 2. [`aim::acquire_aim`] refreshes the aim,
//! 3. [`swing::try_start_swing`] opens a new window when allowed,
//! 4. [`swing::tick_timers`] counts every timer down.
//!
//! Impact therefore always consumes the previous tick's window before a new
//! one may open.

pub mod aim;
pub mod hit_roll;
pub mod impact;
pub mod swing;

use crate::components::UnitRecord;
use crate::config::CombatTuning;
use crate::entity::UnitHandle;
use crate::faction::FactionHostilityTable;
use crate::snapshot::{Snapshot, UnitView};
use crate::vector_math::within_cone;

pub use aim::acquire_aim;
pub use impact::{resolve_impact, Strike};
pub use swing::{tick_timers, try_start_swing, TimerOutcome};

/// Centre distance at which `attacker` can strike a unit of `target_radius`.
#[must_use]
pub fn reach(attacker: &UnitRecord, target_radius: f32, tuning: &CombatTuning) -> f32 {
    attacker.combat.attack_range()
        + tuning.reach_tolerance.max(0.0)
        + attacker.radius()
        + target_radius.max(0.0)
}

/// Hostile units inside the attack cone and within reach, in slot order,
/// paired with their squared centre distance.
#[must_use]
pub fn cone_targets<'a>(
    handle: UnitHandle,
    record: &UnitRecord,
    snapshot: &'a Snapshot,
    table: &'a FactionHostilityTable,
    tuning: &CombatTuning,
) -> Vec<(&'a UnitView, f32)> {
    let origin = record.unit.position;
    let half_angle = record.combat.cone_half_angle();
    snapshot
        .hostiles_around(handle, origin, record.effective_faction(), table)
        .filter(|&(view, dist_sq)| {
            let r = reach(record, view.radius, tuning);
            dist_sq <= r * r && within_cone(origin, record.unit.yaw, half_angle, view.position)
        })
        .collect()
}
