//! Cone impact resolution.
//!
//! Impacts never write to victims directly. Each attacker produces
//! [`Strike`]s against the frozen snapshot; the landed ones are buffered in
//! the [`ImpactLedger`](crate::damage::ImpactLedger) and applied afterwards in
//! a fixed order.
use log::debug;
use ordered_float::OrderedFloat;

use crate::components::{Attacker, UnitRecord};
use crate::config::CombatTuning;
use crate::entity::UnitHandle;
use crate::faction::FactionHostilityTable;
use crate::snapshot::Snapshot;

use super::{cone_targets, hit_roll};

/// Outcome of one attacker/victim roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    /// Unit that swung.
    pub attacker: UnitHandle,
    /// Unit inside the cone.
    pub victim: UnitHandle,
    /// Swing this roll belongs to.
    pub attack_tick: u32,
    /// Whether the hit roll passed.
    pub landed: bool,
    /// Health removed if the strike lands.
    pub damage: i32,
}

/// Whether the attacker's windup has elapsed with its impact still pending.
#[must_use]
pub fn impact_due(attacker: &Attacker) -> bool {
    attacker.is_swinging() && attacker.impact_delay_left <= 0.0 && !attacker.impact_done
}

/// Resolves a pending impact for `handle`, marking it done.
///
/// Candidates are ranked nearest-first by raw centre distance (ties keep slot
/// order) and capped at `max_entities_hit`.
pub fn resolve_impact(
    handle: UnitHandle,
    record: &mut UnitRecord,
    snapshot: &Snapshot,
    table: &FactionHostilityTable,
    tuning: &CombatTuning,
) -> Vec<Strike> {
    if !impact_due(&record.attacker) {
        return Vec::new();
    }
    let mut candidates = cone_targets(handle, record, snapshot, table, tuning);
    candidates.sort_by_key(|&(_, dist_sq)| OrderedFloat(dist_sq));
    if let Some(cap) = record.combat.max_entities_hit {
        candidates.truncate(usize::try_from(cap).unwrap_or(usize::MAX));
    }

    let attack_tick = record.attacker.attack_tick;
    let chance = record.combat.hitchance();
    let damage = tuning.damage_per_hit.max(0);
    let strikes: Vec<Strike> = candidates
        .into_iter()
        .map(|(view, _)| Strike {
            attacker: handle,
            victim: view.handle,
            attack_tick,
            landed: hit_roll::is_hit(chance, attack_tick, handle, view.handle),
            damage,
        })
        .collect();
    record.attacker.impact_done = true;
    debug!(
        "{handle:?} swing {attack_tick} resolved: {} of {} landed",
        strikes.iter().filter(|s| s.landed).count(),
        strikes.len()
    );
    strikes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Faction, UnitBlueprint};
    use crate::entity::Arena;
    use glam::Vec3;
    use rstest::rstest;

    fn swinging_attacker(cap: Option<u32>) -> UnitBlueprint {
        let mut blueprint = UnitBlueprint::new(Faction::new(0).expect("valid faction"), Vec3::ZERO);
        blueprint.combat.hitchance = 1.0;
        blueprint.combat.attack_range = 3.0;
        blueprint.combat.max_entities_hit = cap;
        blueprint
    }

    fn enemy(z: f32) -> UnitRecord {
        UnitRecord::from_blueprint(&UnitBlueprint::new(
            Faction::new(1).expect("valid faction"),
            Vec3::new(0.0, 0.0, z),
        ))
    }

    fn resolve(cap: Option<u32>) -> (Vec<Strike>, Vec<UnitHandle>, Attacker) {
        let mut units = Arena::new();
        let far = units.insert(enemy(2.5));
        let near = units.insert(enemy(1.0));
        let me = units.insert(UnitRecord::from_blueprint(&swinging_attacker(cap)));
        {
            let attacker = &mut units.get_mut(me).expect("me").attacker;
            attacker.duration_left = 0.5;
            attacker.impact_delay_left = 0.0;
            attacker.impact_done = false;
            attacker.attack_tick = 1;
        }
        let snapshot = Snapshot::capture(&units);
        let table = FactionHostilityTable::from_pairs(&[(0, 1)], false).expect("table");
        let record = units.get_mut(me).expect("me");
        let strikes = resolve_impact(me, record, &snapshot, &table, &CombatTuning::default());
        (strikes, vec![near, far], record.attacker)
    }

    #[rstest]
    fn nearest_victim_is_hit_first() {
        let (strikes, order, attacker) = resolve(Some(1));
        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].victim, order[0]);
        assert!(strikes[0].landed);
        assert!(attacker.impact_done);
    }

    #[rstest]
    fn uncapped_impact_hits_everyone_in_order() {
        let (strikes, order, _) = resolve(None);
        let victims: Vec<_> = strikes.iter().map(|s| s.victim).collect();
        assert_eq!(victims, order);
    }

    #[rstest]
    fn impact_resolves_at_most_once() {
        let mut attacker = Attacker {
            duration_left: 0.5,
            impact_delay_left: 0.0,
            impact_done: false,
            ..Attacker::default()
        };
        assert!(impact_due(&attacker));
        attacker.impact_done = true;
        assert!(!impact_due(&attacker));
        attacker.impact_done = false;
        attacker.impact_delay_left = 0.1;
        assert!(!impact_due(&attacker));
    }
}
