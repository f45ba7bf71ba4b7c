//! Deterministic unit steering and melee combat for a realtime strategy game.
//!
//! The core is a fixed-timestep simulation owned by a
//! [`SimulationContext`]. Units pick a focus from a faction hostility table,
//! steer towards a pursuit point around it, and resolve cone-shaped melee
//! swings whose hit rolls are pure functions of the swing and its
//! participants. The [`ecs_sync`] module mirrors that state into Bevy ECS.
pub mod combat;
pub mod components;
pub mod config;
pub mod constants;
pub mod damage;
pub mod ecs_sync;
pub mod entity;
pub mod error;
pub mod faction;
pub mod follow;
pub mod logging;
pub mod numeric;
pub mod orders;
pub mod physics;
pub mod snapshot;
pub mod steering;
pub mod targeting;
pub mod vector_math;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use components::{
    AnchorPolicy, AttackPhase, Attacker, CombatStats, Faction, Health, Stance, SteeringState,
    TargetingSize, TemporaryFactionOverride, Unit, UnitBlueprint, UnitRecord, UnitStats,
    UnitTargets,
};
pub use config::{Scenario, SimulationConfig};
pub use damage::{HitEvent, ImpactLedger};
pub use ecs_sync::SkirmishPlugin;
pub use entity::{Arena, UnitHandle};
pub use error::{ConfigError, FactionIdError, OrderError};
pub use faction::FactionHostilityTable;
pub use logging::init as init_logging;
pub use orders::{Order, OrderKind};
pub use world::{SimulationContext, TickReport};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust
    //! use skirmish::prelude::*;
    //! let mut sim = SimulationContext::default();
    //! let unit = sim.spawn(&UnitBlueprint::new(Faction::default(), Vec3::ZERO));
    //! sim.advance();
    //! assert!(sim.get(unit).is_some());
    //! ```

    pub use crate::components::{Faction, UnitBlueprint};
    pub use crate::entity::UnitHandle;
    pub use crate::faction::FactionHostilityTable;
    pub use crate::orders::{Order, OrderKind};
    pub use crate::world::SimulationContext;
    pub use glam::Vec3;
}
