//! Systems carrying ECS-side changes into the simulation.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::orders::{Order, OrderKind};

use super::output::Presentation;
use super::{
    OrderInbox, OrderIntent, QueuedOrder, SimHandle, SimSyncError, SimSyncErrorContext,
    SimulationResource, UnitSpawn,
};

/// Registers a simulated unit for every entity that gained a [`UnitSpawn`].
///
/// The entity receives its [`SimHandle`] plus freshly captured presentation
/// components so it can be drawn before the first step.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems receive queries by value."
)]
pub fn register_spawned_units_system(
    mut commands: Commands,
    mut sim: ResMut<SimulationResource>,
    spawned: Query<(Entity, &UnitSpawn), Added<UnitSpawn>>,
) {
    for (entity, UnitSpawn(blueprint)) in spawned.iter() {
        if let Some(previous) = sim.handle_for(entity) {
            warn!("{entity:?} requested a second unit; keeping {previous:?}");
            continue;
        }
        let handle = sim.context.spawn(blueprint);
        sim.link(entity, handle);
        let Some(record) = sim.context.get(handle) else {
            continue;
        };
        let presentation = Presentation::capture(record, &sim);
        commands.entity(entity).insert((SimHandle(handle), presentation));
        debug!("{entity:?} mirrors {handle:?}");
    }
}

/// Removes simulated units whose entities were despawned or lost their
/// [`SimHandle`].
pub fn release_removed_units_system(
    mut sim: ResMut<SimulationResource>,
    mut removed: RemovedComponents<SimHandle>,
) {
    for entity in removed.read() {
        if let Some(handle) = sim.unlink_entity(entity) {
            sim.context.despawn(handle);
            debug!("{entity:?} left the simulation as {handle:?}");
        }
    }
}

/// Translates queued entity-addressed orders and applies them in sequence
/// order.
///
/// Orders that cannot be mapped or that name stale units are dropped and
/// reported through a [`SimSyncError`] event.
pub fn apply_queued_orders_system(
    mut commands: Commands,
    mut sim: ResMut<SimulationResource>,
    mut inbox: ResMut<OrderInbox>,
) {
    for queued in inbox.drain() {
        let applied = translate(&sim, &queued)
            .and_then(|order| {
                sim.context
                    .apply_order(&order)
                    .map_err(|e| SimSyncError::new(SimSyncErrorContext::Order, e.to_string()))
            });
        if let Err(error) = applied {
            commands.trigger(error);
        }
    }
}

fn translate(sim: &SimulationResource, queued: &QueuedOrder) -> Result<Order, SimSyncError> {
    let unmapped = |entity: Entity| {
        SimSyncError::new(
            SimSyncErrorContext::Mapping,
            format!("{entity:?} has no simulated unit"),
        )
    };
    let unit = sim
        .handle_for(queued.entity)
        .ok_or_else(|| unmapped(queued.entity))?;
    let kind = match queued.intent {
        OrderIntent::Attack(target) => OrderKind::Attack {
            target: sim.handle_for(target).ok_or_else(|| unmapped(target))?,
        },
        OrderIntent::Kind(kind) => kind,
    };
    Ok(Order::new(unit, queued.sequence, kind))
}
