//! Fluent construction of [`UnitBlueprint`]s.

use glam::Vec3;
use skirmish::components::{Faction, Health, Stance, TargetingSize, UnitBlueprint};

/// Faction id that must be valid.
///
/// # Panics
/// Panics if `id` is outside the hostility table.
#[must_use]
pub fn faction(id: u8) -> Faction {
    Faction::new(id).unwrap_or_else(|e| panic!("test faction: {e}"))
}

/// Builder over [`UnitBlueprint`] with test-friendly setters.
///
/// # Examples
/// ```
/// use test_utils::UnitBuilder;
/// let blueprint = UnitBuilder::new(1).at(2.0, 3.0).hitchance(1.0).build();
/// assert_eq!(blueprint.faction.id(), 1);
/// assert_eq!(blueprint.combat.hitchance, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct UnitBuilder {
    blueprint: UnitBlueprint,
}

impl UnitBuilder {
    #[must_use]
    pub fn new(faction_id: u8) -> Self {
        Self {
            blueprint: UnitBlueprint::new(faction(faction_id), Vec3::ZERO),
        }
    }

    /// Places the unit on the ground plane.
    #[must_use]
    pub fn at(mut self, x: f32, z: f32) -> Self {
        self.blueprint.position = Vec3::new(x, 0.0, z);
        self
    }

    #[must_use]
    pub fn yaw(mut self, yaw: f32) -> Self {
        self.blueprint.yaw = yaw;
        self
    }

    #[must_use]
    pub fn hitchance(mut self, chance: f32) -> Self {
        self.blueprint.combat.hitchance = chance;
        self
    }

    #[must_use]
    pub fn range(mut self, range: f32) -> Self {
        self.blueprint.combat.attack_range = range;
        self
    }

    /// Full aperture of the attack cone in degrees.
    #[must_use]
    pub fn cone(mut self, degrees: f32) -> Self {
        self.blueprint.combat.attack_cone_deg = degrees;
        self
    }

    /// Window length and windup, in seconds.
    #[must_use]
    pub fn swing(mut self, duration: f32, impact_delay: f32) -> Self {
        self.blueprint.combat.attack_duration = duration;
        self.blueprint.combat.impact_delay = impact_delay;
        self
    }

    #[must_use]
    pub fn attacks_per_second(mut self, rate: f32) -> Self {
        self.blueprint.combat.attacks_per_second = rate;
        self
    }

    #[must_use]
    pub fn health(mut self, max: i32) -> Self {
        self.blueprint.health = Health::full(max);
        self
    }

    #[must_use]
    pub fn radius(mut self, radius: f32) -> Self {
        self.blueprint.size = Some(TargetingSize {
            radius,
            height: 1.8,
        });
        self
    }

    #[must_use]
    pub fn detection(mut self, radius: f32) -> Self {
        self.blueprint.stats.detection_radius = radius;
        self
    }

    #[must_use]
    pub fn auto_target(mut self, enabled: bool) -> Self {
        self.blueprint.auto_target = enabled;
        self
    }

    #[must_use]
    pub fn stance(mut self, stance: Stance) -> Self {
        self.blueprint.stance = stance;
        self
    }

    #[must_use]
    pub fn build(self) -> UnitBlueprint {
        self.blueprint
    }
}
