//! Player intent arriving from the transport layer.
//!
//! Orders are assumed to be deduplicated upstream: each carries a sequence
//! number that is recorded on the unit, but nothing here drops repeats.
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::{Stance, UnitRecord};
use crate::entity::UnitHandle;

/// What the player asked a unit to do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Walk to `position` and face `rotation` on arrival.
    MoveTo {
        /// Destination shared by the whole selection.
        position: Vec3,
        /// Facing on arrival, in radians.
        #[serde(default)]
        rotation: f32,
        /// This unit's slot relative to `position`.
        #[serde(default)]
        formation_offset: Vec3,
    },
    /// Walk to `position`, engaging hostiles met on the way.
    AttackMove {
        /// Destination.
        position: Vec3,
        /// Facing on arrival, in radians.
        #[serde(default)]
        rotation: f32,
    },
    /// Focus a specific unit.
    Attack {
        /// Unit to focus.
        target: UnitHandle,
    },
    /// Hold the current position.
    Stop,
    /// Changes the engagement stance.
    SetStance(Stance),
    /// Toggles auto-targeting.
    SetAutoTarget(bool),
    /// Toggles charging through the focus.
    Charge(bool),
}

/// An order addressed to one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unit receiving the order.
    pub unit: UnitHandle,
    /// Upstream sequence number, recorded but never deduplicated.
    pub sequence: u64,
    /// What the unit is told to do.
    pub kind: OrderKind,
}

impl Order {
    /// Bundles an order.
    #[must_use]
    pub const fn new(unit: UnitHandle, sequence: u64, kind: OrderKind) -> Self {
        Self {
            unit,
            sequence,
            kind,
        }
    }

    /// Handle the order depends on besides its addressee, if any.
    #[must_use]
    pub const fn referenced_target(&self) -> Option<UnitHandle> {
        match self.kind {
            OrderKind::Attack { target } => Some(target),
            _ => None,
        }
    }
}

/// Writes the order's intent onto `record`.
///
/// Referenced handles must already have been checked by the caller.
pub(crate) fn apply(record: &mut UnitRecord, order: &Order) {
    match order.kind {
        OrderKind::MoveTo {
            position,
            rotation,
            formation_offset,
        } => {
            set_destination(record, position, rotation, formation_offset);
            record.attacker.attack_move = false;
        }
        OrderKind::AttackMove { position, rotation } => {
            set_destination(record, position, rotation, Vec3::ZERO);
            record.attacker.attack_move = true;
        }
        OrderKind::Attack { target } => {
            if record.targets.target_entity != Some(target) {
                record.targets.target_position = record.unit.position;
                record.targets.target_rotation = f32::NAN;
            }
            record.targets.target_entity = Some(target);
            record.targets.active_target_set = true;
            record.attacker.attack_move = false;
        }
        OrderKind::Stop => {
            let (position, yaw) = (record.unit.position, record.unit.yaw);
            set_destination(record, position, yaw, Vec3::ZERO);
            record.attacker.attack_move = false;
            record.attacker.is_charging = false;
        }
        OrderKind::SetStance(stance) => {
            record.attacker.max_chase_meters = stance.max_chase_meters();
        }
        OrderKind::SetAutoTarget(enabled) => record.attacker.auto_target = enabled,
        OrderKind::Charge(enabled) => record.attacker.is_charging = enabled,
    }
    let seen = record.targets.last_applied_sequence;
    record.targets.last_applied_sequence = seen.max(order.sequence);
}

fn set_destination(record: &mut UnitRecord, position: Vec3, rotation: f32, offset: Vec3) {
    let targets = &mut record.targets;
    targets.destination_position = position;
    targets.destination_rotation = rotation;
    targets.formation_offset = offset;
    targets.target_entity = None;
    targets.active_target_set = false;
    targets.target_rotation = f32::NAN;
}
