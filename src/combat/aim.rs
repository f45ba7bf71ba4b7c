//! Aim acquisition with its own switching hysteresis.
//!
//! Aim is narrower than the movement focus: only units within weapon reach
//! qualify. Once aimed, a competitor must be closer by the configured
//! fraction before the attacker swaps, which stops two equidistant enemies
//! from flipping the aim every tick.
use log::debug;

use crate::components::UnitRecord;
use crate::config::CombatTuning;
use crate::entity::UnitHandle;
use crate::faction::FactionHostilityTable;
use crate::snapshot::{nearest, Snapshot, UnitView};
use crate::vector_math::{planar_distance_sq, yaw_towards};

use super::reach;

/// Whether `candidate_sq` beats `current_sq` by the hysteresis margin.
///
/// # Examples
/// ```
/// use skirmish::combat::aim::beats_current;
/// assert!(!beats_current(4.6 * 4.6, 5.0 * 5.0, 0.1));
/// assert!(beats_current(4.4 * 4.4, 5.0 * 5.0, 0.1));
/// ```
#[must_use]
pub fn beats_current(candidate_sq: f32, current_sq: f32, hysteresis: f32) -> bool {
    let keep = 1.0 - crate::numeric::unit_interval(hysteresis);
    candidate_sq <= current_sq * keep * keep
}

fn reachable<'a>(
    record: &UnitRecord,
    view: &'a UnitView,
    tuning: &CombatTuning,
) -> Option<(&'a UnitView, f32)> {
    let dist_sq = planar_distance_sq(record.unit.position, view.position);
    let r = reach(record, view.radius, tuning);
    (dist_sq <= r * r).then_some((view, dist_sq))
}

/// Refreshes `record`'s aim from `snapshot`.
pub fn acquire_aim(
    handle: UnitHandle,
    record: &mut UnitRecord,
    snapshot: &Snapshot,
    table: &FactionHostilityTable,
    tuning: &CombatTuning,
) {
    let faction = record.effective_faction();
    let hostile_in_reach = |candidate: UnitHandle| {
        snapshot
            .get_alive(candidate)
            .filter(|view| table.is_hostile(faction, view.faction))
            .and_then(|view| reachable(record, view, tuning))
    };

    let manual = record.targets.target_entity.and_then(hostile_in_reach);
    let chosen = manual.or_else(|| {
        if !(record.attacker.auto_target || record.attacker.attack_move) {
            return None;
        }
        let current = record.attacker.aim_entity.and_then(hostile_in_reach);
        let candidate = nearest(
            snapshot
                .hostiles_around(handle, record.unit.position, faction, table)
                .filter_map(|(view, _)| reachable(record, view, tuning)),
        );
        match (current, candidate) {
            (Some(cur), Some(cand))
                if cand.0.handle != cur.0.handle
                    && beats_current(cand.1, cur.1, tuning.aim_hysteresis) =>
            {
                Some(cand)
            }
            (Some(cur), _) => Some(cur),
            (None, cand) => cand,
        }
    });

    let Some((view, _)) = chosen else {
        if record.attacker.aim_entity.is_some() {
            debug!("{handle:?} lost aim");
        }
        record.attacker.clear_aim();
        return;
    };
    if record.attacker.aim_entity != Some(view.handle) {
        debug!("{handle:?} aiming at {:?}", view.handle);
    }
    let rotation = yaw_towards(record.unit.position, view.position).unwrap_or(record.unit.yaw);
    record.attacker.aim_entity = Some(view.handle);
    record.attacker.aim_position = view.position;
    record.attacker.aim_rotation = rotation;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Faction, UnitBlueprint};
    use crate::entity::Arena;
    use glam::Vec3;
    use rstest::{fixture, rstest};

    struct Range {
        units: Arena<UnitRecord>,
        table: FactionHostilityTable,
        tuning: CombatTuning,
    }

    impl Range {
        fn spawn(&mut self, id: u8, x: f32, z: f32) -> UnitHandle {
            let mut blueprint =
                UnitBlueprint::new(Faction::new(id).expect("valid faction"), Vec3::new(x, 0.0, z));
            blueprint.combat.attack_range = 6.0;
            self.units.insert(UnitRecord::from_blueprint(&blueprint))
        }

        fn aim(&mut self, handle: UnitHandle) -> Option<UnitHandle> {
            let snapshot = Snapshot::capture(&self.units);
            let record = self.units.get_mut(handle).expect("live unit");
            acquire_aim(handle, record, &snapshot, &self.table, &self.tuning);
            record.attacker.aim_entity
        }
    }

    #[fixture]
    fn range() -> Range {
        Range {
            units: Arena::new(),
            table: FactionHostilityTable::from_pairs(&[(0, 1)], false).expect("table"),
            tuning: CombatTuning {
                aim_hysteresis: 0.1,
                reach_tolerance: 0.0,
                ..CombatTuning::default()
            },
        }
    }

    #[rstest]
    #[case(4.6, false)]
    #[case(4.4, true)]
    fn switching_requires_clear_improvement(
        mut range: Range,
        #[case] challenger: f32,
        #[case] switches: bool,
    ) {
        let me = range.spawn(0, 0.0, 0.0);
        let x = range.spawn(1, 0.0, 5.0);
        assert_eq!(range.aim(me), Some(x));
        let y = range.spawn(1, challenger, 0.0);
        let expected = if switches { y } else { x };
        assert_eq!(range.aim(me), Some(expected));
    }

    #[rstest]
    fn out_of_reach_units_are_not_aimed(mut range: Range) {
        let me = range.spawn(0, 0.0, 0.0);
        range.spawn(1, 0.0, 9.0);
        assert_eq!(range.aim(me), None);
        let record = range.units.get(me).expect("live unit");
        assert!(record.attacker.aim_rotation.is_nan());
    }

    #[rstest]
    fn manual_target_in_reach_is_preferred(mut range: Range) {
        let me = range.spawn(0, 0.0, 0.0);
        let _near = range.spawn(1, 1.0, 0.0);
        let chosen = range.spawn(1, 0.0, 5.0);
        range.units.get_mut(me).expect("me").targets.target_entity = Some(chosen);
        assert_eq!(range.aim(me), Some(chosen));
    }

    #[rstest]
    fn passive_units_only_aim_at_manual_targets(mut range: Range) {
        let me = range.spawn(0, 0.0, 0.0);
        let enemy = range.spawn(1, 1.0, 0.0);
        range.units.get_mut(me).expect("me").attacker.auto_target = false;
        assert_eq!(range.aim(me), None);
        range.units.get_mut(me).expect("me").targets.target_entity = Some(enemy);
        assert_eq!(range.aim(me), Some(enemy));
    }

    #[rstest]
    fn aim_rotation_faces_target(mut range: Range) {
        let me = range.spawn(0, 0.0, 0.0);
        range.spawn(1, 3.0, 0.0);
        range.aim(me);
        let record = range.units.get(me).expect("live unit");
        approx::assert_relative_eq!(
            record.attacker.aim_rotation,
            std::f32::consts::FRAC_PI_2
        );
    }
}
