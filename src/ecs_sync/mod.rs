//! Synchronisation systems mirroring the simulation into Bevy ECS.
//!
//! The simulation stays authoritative. Entities request a unit through
//! [`UnitSpawn`], receive a [`SimHandle`] once registered, and have their
//! presentation components rewritten after every step. Player intent enters
//! through the [`OrderInbox`] resource.

mod input;
mod output;
mod plugin;
mod state;

pub use input::{
    apply_queued_orders_system, register_spawned_units_system, release_removed_units_system,
};
pub use output::{
    write_simulation_outputs_system, AttackPresentation, EffectiveFaction, PursuitMarker,
    SimHealth, SimPose,
};
pub use plugin::{SimSyncError, SimSyncErrorContext, SkirmishPlugin};
pub use state::{
    step_simulation_system, LastTickReport, OrderInbox, OrderIntent, QueuedOrder, SimHandle,
    SimulationResource, UnitSpawn,
};
