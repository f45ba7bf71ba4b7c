//! Per-tick focus selection.
//!
//! A manual target from a player order always wins while it lives. Otherwise
//! units with auto-targeting (or an active attack-move) pick the nearest
//! hostile inside their detection radius. The chosen focus is mirrored onto
//! [`Attacker::attack_target_entity`](crate::components::Attacker) for combat.
use log::debug;

use crate::components::UnitRecord;
use crate::entity::UnitHandle;
use crate::faction::FactionHostilityTable;
use crate::snapshot::{nearest, Snapshot, UnitView};
use crate::vector_math::yaw_towards;

/// The unit a follower is currently oriented around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Focus {
    /// Snapshot of the focused unit.
    pub view: UnitView,
    /// Chosen by a player order rather than by the scan.
    pub manual: bool,
    /// Whether the focus is hostile to the follower.
    pub hostile: bool,
}

/// Selects this tick's focus for `handle` and updates its targeting state.
pub fn update_focus(
    handle: UnitHandle,
    record: &mut UnitRecord,
    snapshot: &Snapshot,
    table: &FactionHostilityTable,
) -> Option<Focus> {
    let faction = record.effective_faction();

    if let Some(target) = record.targets.target_entity {
        if let Some(view) = snapshot.get_alive(target) {
            let focus = Focus {
                view: *view,
                manual: true,
                hostile: table.is_hostile(faction, view.faction),
            };
            engage(record, &focus);
            return Some(focus);
        }
        debug!("{handle:?} lost manual target {target:?}");
        record.targets.target_entity = None;
    }

    if record.attacker.attack_move || record.attacker.auto_target {
        let radius = record.stats.detection_radius.max(0.0);
        let found = nearest(
            snapshot
                .hostiles_around(handle, record.unit.position, faction, table)
                .filter(|&(_, dist_sq)| dist_sq <= radius * radius),
        );
        if let Some((view, _)) = found {
            if record.attacker.attack_target_entity != Some(view.handle) {
                debug!("{handle:?} acquired {:?}", view.handle);
                record.targets.target_position = record.unit.position;
                record.targets.target_rotation = f32::NAN;
            }
            let focus = Focus {
                view: *view,
                manual: false,
                hostile: true,
            };
            engage(record, &focus);
            return Some(focus);
        }
    }

    release(record);
    None
}

fn engage(record: &mut UnitRecord, focus: &Focus) {
    record.attacker.attack_target_entity = Some(focus.view.handle);
    record.targets.active_target_set = true;
    if !record.targets.target_rotation.is_finite() {
        record.targets.target_rotation =
            yaw_towards(record.unit.position, focus.view.position).unwrap_or(record.unit.yaw);
    }
}

fn release(record: &mut UnitRecord) {
    record.attacker.attack_target_entity = None;
    record.targets.target_rotation = f32::NAN;
    record.targets.active_target_set = false;
}
