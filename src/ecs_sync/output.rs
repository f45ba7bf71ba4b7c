//! Output systems writing simulation state back into ECS components.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::debug;

use crate::components::{AttackPhase, Faction, SteeringState, UnitRecord};
use crate::entity::UnitHandle;

use super::{LastTickReport, SimHandle, SimulationResource};

/// Kinematic state mirrored from the simulation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SimPose {
    /// World position.
    pub position: Vec3,
    /// Heading in radians.
    pub yaw: f32,
    /// Planar velocity.
    pub velocity: Vec3,
    /// Locomotion state.
    pub steering: SteeringState,
}

/// Hit points mirrored from the simulation.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimHealth {
    /// Remaining health.
    pub current: i32,
    /// Health at spawn.
    pub max: i32,
}

/// Attack state for animation and effects.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AttackPresentation {
    /// Current phase of the attack window.
    pub phase: AttackPhase,
    /// Advances once per started swing.
    pub attack_tick: u32,
    /// Last swing whose window closed without an impact.
    pub attack_cancel_tick: u32,
    /// Entity being aimed at, if mirrored.
    pub aim: Option<Entity>,
    /// Facing towards the aimed unit; `NaN` when nothing is aimed at.
    pub aim_rotation: f32,
}

/// Where the unit is heading while it follows a focus.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PursuitMarker {
    /// Entity mirroring the focus, if any.
    pub target: Option<Entity>,
    /// Smoothed pursuit point.
    pub position: Vec3,
    /// Smoothed facing; `NaN` without a focus facing.
    pub rotation: f32,
    /// Whether the unit has latched its arrival.
    pub has_arrived: bool,
}

/// Faction used for hostility this tick, overrides included.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveFaction(pub Faction);

/// Every component the output pass rewrites.
#[derive(Bundle, Debug, Clone, Copy)]
pub(crate) struct Presentation {
    pose: SimPose,
    health: SimHealth,
    attack: AttackPresentation,
    pursuit: PursuitMarker,
    faction: EffectiveFaction,
}

impl Presentation {
    pub(crate) fn capture(record: &UnitRecord, sim: &SimulationResource) -> Self {
        let resolve = |handle: Option<UnitHandle>| handle.and_then(|h| sim.entity_for(h));
        Self {
            pose: SimPose {
                position: record.unit.position,
                yaw: record.unit.yaw,
                velocity: record.unit.velocity,
                steering: record.unit.steering,
            },
            health: SimHealth {
                current: record.health.current,
                max: record.health.max,
            },
            attack: AttackPresentation {
                phase: record.attacker.phase(),
                attack_tick: record.attacker.attack_tick,
                attack_cancel_tick: record.attacker.attack_cancel_tick,
                aim: resolve(record.attacker.aim_entity),
                aim_rotation: record.attacker.aim_rotation,
            },
            pursuit: PursuitMarker {
                target: resolve(record.targets.target_entity),
                position: record.targets.target_position,
                rotation: record.targets.target_rotation,
                has_arrived: record.targets.has_arrived,
            },
            faction: EffectiveFaction(record.effective_faction()),
        }
    }
}

type OutputQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static SimHandle,
        &'static mut SimPose,
        &'static mut SimHealth,
        &'static mut AttackPresentation,
        &'static mut PursuitMarker,
        &'static mut EffectiveFaction,
    ),
>;

/// Copies the stepped simulation into ECS and despawns dead units.
///
/// Entities whose units died this tick are despawned before their components
/// are refreshed, so observers never see a stale live pose for them.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems receive resources by value."
)]
pub fn write_simulation_outputs_system(
    mut commands: Commands,
    mut sim: ResMut<SimulationResource>,
    report: Res<LastTickReport>,
    mut query: OutputQuery<'_, '_>,
) {
    for &handle in &report.0.despawned {
        let Some(entity) = sim.unlink_handle(handle) else {
            continue;
        };
        if let Ok(mut doomed) = commands.get_entity(entity) {
            doomed.despawn();
        }
        debug!("despawned {entity:?} after {handle:?} died");
    }

    for (&SimHandle(handle), mut pose, mut health, mut attack, mut pursuit, mut faction) in
        &mut query
    {
        let Some(record) = sim.context.get(handle) else {
            continue;
        };
        let fresh = Presentation::capture(record, &sim);
        *pose = fresh.pose;
        *health = fresh.health;
        *attack = fresh.attack;
        *pursuit = fresh.pursuit;
        *faction = fresh.faction;
    }
}
