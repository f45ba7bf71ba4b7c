//! Read-only views of every unit, captured before each mutation pass.
//!
//! Candidate scans (targeting, aim, impact) read only from a [`Snapshot`], so
//! the order in which units are later mutated cannot leak into what another
//! unit observes during the same pass.
use glam::Vec3;

use crate::components::{Faction, UnitRecord};
use crate::entity::{Arena, UnitHandle};
use crate::faction::FactionHostilityTable;
use crate::vector_math::planar_distance_sq;

/// Frozen copy of the fields other units may observe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitView {
    /// Handle of the observed unit.
    pub handle: UnitHandle,
    /// World position.
    pub position: Vec3,
    /// Heading in radians.
    pub yaw: f32,
    /// Effective faction at capture time.
    pub faction: Faction,
    /// Footprint radius.
    pub radius: f32,
    /// Whether health was above zero.
    pub alive: bool,
}

/// Slot-ordered collection of [`UnitView`]s.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    views: Vec<UnitView>,
}

impl Snapshot {
    /// Captures every live unit in `units`.
    #[must_use]
    pub fn capture(units: &Arena<UnitRecord>) -> Self {
        let views = units
            .iter()
            .map(|(handle, record)| UnitView {
                handle,
                position: record.unit.position,
                yaw: record.unit.yaw,
                faction: record.effective_faction(),
                radius: record.radius(),
                alive: record.health.is_alive(),
            })
            .collect();
        Self { views }
    }

    /// Resolves `handle`; stale handles yield `None`.
    #[must_use]
    pub fn get(&self, handle: UnitHandle) -> Option<&UnitView> {
        self.views
            .binary_search_by_key(&handle.index(), |view| view.handle.index())
            .ok()
            .and_then(|i| self.views.get(i))
            .filter(|view| view.handle == handle)
    }

    /// Resolves `handle` only if the unit is alive.
    #[must_use]
    pub fn get_alive(&self, handle: UnitHandle) -> Option<&UnitView> {
        self.get(handle).filter(|view| view.alive)
    }

    /// Views in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitView> {
        self.views.iter()
    }

    /// Number of captured units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether no units were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Live units other than `observer` that `faction` considers hostile,
    /// paired with their squared planar distance from `origin`.
    #[must_use]
    pub fn hostiles_around<'a>(
        &'a self,
        observer: UnitHandle,
        origin: Vec3,
        faction: Faction,
        table: &'a FactionHostilityTable,
    ) -> impl Iterator<Item = (&'a UnitView, f32)> + 'a {
        self.views
            .iter()
            .filter(move |view| {
                view.handle != observer && view.alive && table.is_hostile(faction, view.faction)
            })
            .map(move |view| (view, planar_distance_sq(origin, view.position)))
    }
}

/// Picks the nearest candidate; ties keep the first in iteration order.
#[must_use]
pub fn nearest<'a, I>(candidates: I) -> Option<(&'a UnitView, f32)>
where
    I: IntoIterator<Item = (&'a UnitView, f32)>,
{
    candidates
        .into_iter()
        .fold(None::<(&'a UnitView, f32)>, |best, (view, dist_sq)| match best {
            Some((_, best_sq)) if best_sq <= dist_sq => best,
            _ => Some((view, dist_sq)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::UnitBlueprint;
    use rstest::rstest;

    fn blueprint(faction: u8, x: f32) -> UnitBlueprint {
        UnitBlueprint::new(
            Faction::new(faction).expect("valid faction"),
            Vec3::new(x, 0.0, 0.0),
        )
    }

    #[rstest]
    fn lookups_reject_stale_handles() {
        let mut arena = Arena::new();
        let a = arena.insert(UnitRecord::from_blueprint(&blueprint(0, 0.0)));
        let b = arena.insert(UnitRecord::from_blueprint(&blueprint(1, 1.0)));
        arena.remove(a);
        let snapshot = Snapshot::capture(&arena);
        assert!(snapshot.get(a).is_none());
        assert_eq!(snapshot.get(b).map(|v| v.handle), Some(b));
        assert_eq!(snapshot.len(), 1);
    }

    #[rstest]
    fn nearest_keeps_first_on_ties() {
        let mut arena = Arena::new();
        let left = arena.insert(UnitRecord::from_blueprint(&blueprint(1, -2.0)));
        let _right = arena.insert(UnitRecord::from_blueprint(&blueprint(1, 2.0)));
        let observer = arena.insert(UnitRecord::from_blueprint(&blueprint(0, 0.0)));
        let snapshot = Snapshot::capture(&arena);
        let table = FactionHostilityTable::from_pairs(&[(0, 1)], false).expect("table");
        let faction = Faction::new(0).expect("valid faction");
        let found = nearest(snapshot.hostiles_around(observer, Vec3::ZERO, faction, &table));
        assert_eq!(found.map(|(v, _)| v.handle), Some(left));
    }

    #[rstest]
    fn dead_units_are_not_hostile_candidates() {
        let mut arena = Arena::new();
        let mut corpse = UnitRecord::from_blueprint(&blueprint(1, 1.0));
        corpse.health.current = 0;
        arena.insert(corpse);
        let observer = arena.insert(UnitRecord::from_blueprint(&blueprint(0, 0.0)));
        let snapshot = Snapshot::capture(&arena);
        let table = FactionHostilityTable::from_pairs(&[(0, 1)], false).expect("table");
        let faction = Faction::new(0).expect("valid faction");
        assert_eq!(
            snapshot
                .hostiles_around(observer, Vec3::ZERO, faction, &table)
                .count(),
            0
        );
    }
}
