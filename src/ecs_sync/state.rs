//! Resources and markers shared by the synchronisation systems.

use bevy_ecs::prelude::{Component, Entity, ResMut, Resource};
use hashbrown::HashMap;
use log::debug;

use crate::components::UnitBlueprint;
use crate::entity::UnitHandle;
use crate::orders::OrderKind;
use crate::world::{SimulationContext, TickReport};

/// Requests a simulated unit for the entity carrying it.
#[derive(Component, Debug, Clone)]
pub struct UnitSpawn(pub UnitBlueprint);

/// Handle of the simulated unit backing an entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimHandle(pub UnitHandle);

/// Resource owning the simulation and the entity mapping.
#[derive(Resource, Debug, Default)]
pub struct SimulationResource {
    pub(crate) context: SimulationContext,
    /// Cached mapping from unit handles to the entities that mirror them.
    pub(crate) entity_for_handle: HashMap<UnitHandle, Entity>,
    /// Reverse mapping maintained alongside `entity_for_handle`.
    pub(crate) handle_for_entity: HashMap<Entity, UnitHandle>,
}

impl SimulationResource {
    /// Wraps `context` with empty entity mappings.
    #[must_use]
    pub fn new(context: SimulationContext) -> Self {
        Self {
            context,
            entity_for_handle: HashMap::new(),
            handle_for_entity: HashMap::new(),
        }
    }

    /// The simulation being mirrored.
    #[must_use]
    pub const fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// Looks up the entity mirroring `handle`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skirmish::ecs_sync::SimulationResource;
    /// use skirmish::entity::UnitHandle;
    /// let sim = SimulationResource::default();
    /// assert!(sim.entity_for(UnitHandle::from_raw_parts(0, 0)).is_none());
    /// ```
    #[must_use]
    pub fn entity_for(&self, handle: UnitHandle) -> Option<Entity> {
        self.entity_for_handle.get(&handle).copied()
    }

    /// Looks up the unit mirrored by `entity`.
    #[must_use]
    pub fn handle_for(&self, entity: Entity) -> Option<UnitHandle> {
        self.handle_for_entity.get(&entity).copied()
    }

    pub(crate) fn link(&mut self, entity: Entity, handle: UnitHandle) {
        self.entity_for_handle.insert(handle, entity);
        self.handle_for_entity.insert(entity, handle);
    }

    /// Drops the mapping for `entity`, returning the handle it pointed at.
    pub(crate) fn unlink_entity(&mut self, entity: Entity) -> Option<UnitHandle> {
        let handle = self.handle_for_entity.remove(&entity)?;
        self.entity_for_handle.remove(&handle);
        Some(handle)
    }

    /// Drops the mapping for `handle`, returning the entity it pointed at.
    pub(crate) fn unlink_handle(&mut self, handle: UnitHandle) -> Option<Entity> {
        let entity = self.entity_for_handle.remove(&handle)?;
        self.handle_for_entity.remove(&entity);
        Some(entity)
    }
}

/// What a queued order asks for, with units named by entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderIntent {
    /// Focus the unit mirrored by this entity.
    Attack(Entity),
    /// Any order that names no other unit.
    Kind(OrderKind),
}

/// An order addressed by entity, waiting in the [`OrderInbox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedOrder {
    /// Entity whose unit receives the order.
    pub entity: Entity,
    /// Upstream sequence number; orders apply in ascending sequence.
    pub sequence: u64,
    /// What the order asks for.
    pub intent: OrderIntent,
}

/// Buffered orders awaiting the next simulation step.
#[derive(Resource, Default, Debug)]
pub struct OrderInbox {
    orders: Vec<QueuedOrder>,
}

impl OrderInbox {
    /// Queues one order.
    pub fn push(&mut self, order: QueuedOrder) {
        self.orders.push(order);
    }

    /// Queues several orders.
    pub fn extend<I>(&mut self, orders: I)
    where
        I: IntoIterator<Item = QueuedOrder>,
    {
        self.orders.extend(orders);
    }

    /// Empties the inbox in ascending `sequence` order.
    ///
    /// Orders sharing a sequence number keep their submission order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, QueuedOrder> {
        self.orders.sort_by_key(|order| order.sequence);
        self.orders.drain(..)
    }

    /// Whether no orders are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Report produced by the most recent simulation step.
#[derive(Resource, Default, Debug, Clone)]
pub struct LastTickReport(pub TickReport);

/// Advances the simulation by one configured timestep.
pub fn step_simulation_system(
    mut sim: ResMut<SimulationResource>,
    mut last: ResMut<LastTickReport>,
) {
    let report = sim.context.advance();
    if !report.hits.is_empty() || !report.despawned.is_empty() {
        debug!(
            "tick {}: {} hits, {} deaths",
            report.tick,
            report.hits.len(),
            report.despawned.len()
        );
    }
    last.0 = report;
}
