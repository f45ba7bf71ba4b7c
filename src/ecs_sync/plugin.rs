//! Bevy plugin wiring the simulation systems into the schedule.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use log::error;
use thiserror::Error;

use crate::config::SimulationConfig;
use crate::constants::MAX_FACTIONS;
use crate::faction::FactionHostilityTable;
use crate::world::SimulationContext;

use super::{
    apply_queued_orders_system, register_spawned_units_system, release_removed_units_system,
    step_simulation_system, write_simulation_outputs_system, LastTickReport, OrderInbox,
    SimulationResource,
};

/// Context carried by [`SimSyncError`] events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimSyncErrorContext {
    /// The plugin was built with an invalid configuration.
    Config,
    /// An order was rejected by the simulation.
    Order,
    /// An entity had no simulated counterpart.
    Mapping,
}

/// Event raised when synchronisation hits an error path.
///
/// Observers log these events so diagnostics stay visible even without a
/// Bevy log plugin.
#[derive(Event, Debug, Clone, Error)]
#[error("{context:?}: {detail}")]
pub struct SimSyncError {
    /// Where the failure occurred.
    pub context: SimSyncErrorContext,
    /// Description of the underlying error.
    pub detail: String,
}

impl SimSyncError {
    /// Convenience constructor used by systems to emit error events.
    pub fn new(context: SimSyncErrorContext, detail: impl Into<String>) -> Self {
        Self {
            context,
            detail: detail.into(),
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_sync_error(event: On<SimSyncError>) {
    let SimSyncError { context, detail } = event.event();
    error!("simulation sync error during {context:?}: {detail}");
}

/// Bevy plugin installing the simulation and its synchronisation systems.
#[derive(Debug, Clone)]
pub struct SkirmishPlugin {
    /// Tuning for the simulation context.
    pub config: SimulationConfig,
    /// Hostility table loaded once at startup.
    pub factions: FactionHostilityTable,
}

impl Default for SkirmishPlugin {
    fn default() -> Self {
        Self {
            config: SimulationConfig::default(),
            factions: FactionHostilityTable::default().with_faction_count(MAX_FACTIONS),
        }
    }
}

impl Plugin for SkirmishPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_sync_error);

        if let Err(e) = self.config.validate() {
            app.world_mut()
                .trigger(SimSyncError::new(SimSyncErrorContext::Config, e.to_string()));
            return;
        }

        app.insert_resource(SimulationResource::new(SimulationContext::new(
            self.config,
            self.factions,
        )));
        app.init_resource::<OrderInbox>();
        app.init_resource::<LastTickReport>();
        app.add_systems(
            Update,
            (
                register_spawned_units_system,
                release_removed_units_system,
                apply_queued_orders_system,
                step_simulation_system,
                write_simulation_outputs_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Faction, Health, UnitBlueprint};
    use crate::ecs_sync::{OrderIntent, QueuedOrder, SimHandle, SimHealth, SimPose, UnitSpawn};
    use crate::orders::OrderKind;
    use glam::Vec3;
    use rstest::{fixture, rstest};

    #[derive(Resource, Default)]
    struct SeenErrors(Vec<SimSyncErrorContext>);

    #[fixture]
    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(SkirmishPlugin {
            factions: FactionHostilityTable::from_pairs(&[(0, 1)], false).expect("valid pairs"),
            ..SkirmishPlugin::default()
        });
        app.init_resource::<SeenErrors>();
        app.add_observer(|event: On<SimSyncError>, mut seen: ResMut<SeenErrors>| {
            seen.0.push(event.event().context);
        });
        app
    }

    fn blueprint(faction: u8, position: Vec3) -> UnitBlueprint {
        UnitBlueprint::new(Faction::new(faction).expect("valid faction"), position)
    }

    fn spawn_unit(app: &mut App, faction: u8, position: Vec3) -> Entity {
        app.world_mut()
            .spawn(UnitSpawn(blueprint(faction, position)))
            .id()
    }

    #[rstest]
    fn plugin_initialises_resources(app: App) {
        assert!(app.world().contains_resource::<SimulationResource>());
        assert!(app.world().contains_resource::<OrderInbox>());
        assert!(app.world().contains_resource::<LastTickReport>());
    }

    #[rstest]
    fn invalid_config_installs_nothing() {
        let mut app = App::new();
        let mut plugin = SkirmishPlugin::default();
        plugin.config.tick_hz = 0.0;
        app.add_plugins(plugin);
        assert!(!app.world().contains_resource::<SimulationResource>());
    }

    #[rstest]
    fn spawned_entities_are_mirrored(mut app: App) {
        let entity = spawn_unit(&mut app, 0, Vec3::new(2.0, 0.0, 3.0));
        app.update();
        let SimHandle(handle) = *app.world().get::<SimHandle>(entity).expect("registered");
        let sim = app.world().resource::<SimulationResource>();
        assert_eq!(sim.entity_for(handle), Some(entity));
        let pose = app.world().get::<SimPose>(entity).expect("pose");
        assert_eq!(pose.position, Vec3::new(2.0, 0.0, 3.0));
        assert_eq!(app.world().resource::<LastTickReport>().0.tick, 1);
    }

    #[rstest]
    fn despawning_an_entity_removes_its_unit(mut app: App) {
        let entity = spawn_unit(&mut app, 0, Vec3::ZERO);
        app.update();
        app.world_mut().despawn(entity);
        app.update();
        let sim = app.world().resource::<SimulationResource>();
        assert_eq!(sim.context().unit_count(), 0);
        assert!(sim.handle_for(entity).is_none());
    }

    #[rstest]
    fn orders_for_unmapped_entities_raise_errors(mut app: App) {
        let stray = app.world_mut().spawn_empty().id();
        app.world_mut()
            .resource_mut::<OrderInbox>()
            .push(QueuedOrder {
                entity: stray,
                sequence: 1,
                intent: OrderIntent::Kind(OrderKind::Stop),
            });
        app.update();
        assert_eq!(
            app.world().resource::<SeenErrors>().0,
            vec![SimSyncErrorContext::Mapping]
        );
    }

    #[rstest]
    fn dead_units_are_despawned(mut app: App) {
        let mut striker = blueprint(0, Vec3::ZERO);
        striker.combat.hitchance = 1.0;
        let mut target = blueprint(1, Vec3::new(0.0, 0.0, 1.0));
        target.health = Health::full(2);
        let attacker = app.world_mut().spawn(UnitSpawn(striker)).id();
        let victim = app.world_mut().spawn(UnitSpawn(target)).id();
        app.update();
        app.world_mut().resource_mut::<OrderInbox>().push(QueuedOrder {
            entity: attacker,
            sequence: 1,
            intent: OrderIntent::Attack(victim),
        });
        let mut hp = Vec::new();
        for _ in 0..600 {
            app.update();
            match app.world().get::<SimHealth>(victim) {
                Some(health) => hp.push(health.current),
                None => break,
            }
        }
        assert!(app.world().get::<SimHandle>(victim).is_none());
        assert!(hp.windows(2).all(|pair| matches!(pair, [a, b] if b <= a)));
        assert_eq!(hp.last(), Some(&1));
        assert!(app.world().resource::<SeenErrors>().0.is_empty());
    }
}
