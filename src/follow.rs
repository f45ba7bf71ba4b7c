//! Pursuit point and facing around the current focus.
//!
//! Followers settle on rings around their focus: the inner ring where the two
//! footprints touch, and the outer ring at weapon reach (or a small padding
//! for friendly escorts). The result is smoothed exponentially so the pursuit
//! point glides rather than snaps.
use glam::Vec3;

use crate::components::{AnchorPolicy, UnitRecord};
use crate::config::{CombatTuning, FollowTuning};
use crate::targeting::Focus;
use crate::vector_math::{
    forward_of, lerp_angle, planar, planar_delta, smoothing_factor, yaw_towards,
};

/// Inner and outer stop distances around a focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopRings {
    /// Distance at which the footprints touch.
    pub inner: f32,
    /// Distance at weapon reach or escort padding.
    pub outer: f32,
}

impl StopRings {
    /// Computes the rings for `record` following `focus`.
    #[must_use]
    pub fn around(
        record: &UnitRecord,
        focus: &Focus,
        combat: &CombatTuning,
        follow: &FollowTuning,
    ) -> Self {
        let inner = record.radius() + focus.view.radius;
        let outer = if focus.hostile {
            (record.combat.attack_range() - combat.reach_tolerance.max(0.0) + inner).max(inner)
        } else {
            inner + follow.follow_padding.max(0.0)
        };
        Self { inner, outer }
    }

    /// Desired distance from the focus centre, or `None` to hold position.
    #[must_use]
    pub fn desired_distance(&self, policy: AnchorPolicy, current: f32) -> Option<f32> {
        match policy {
            AnchorPolicy::Kiting => Some(self.outer),
            AnchorPolicy::Zone if (self.inner..=self.outer).contains(&current) => None,
            AnchorPolicy::Zone if current < self.inner => Some(self.inner),
            AnchorPolicy::Zone => Some(self.outer),
        }
    }
}

/// Whether a zone-anchored unit already sits inside its band and should hold
/// both position and facing.
#[must_use]
pub fn holds_in_zone(
    record: &UnitRecord,
    focus: &Focus,
    combat: &CombatTuning,
    follow: &FollowTuning,
) -> bool {
    if record.attacker.is_charging {
        return false;
    }
    let rings = StopRings::around(record, focus, combat, follow);
    let distance = planar_delta(focus.view.position, record.unit.position).length();
    rings.desired_distance(record.anchor, distance).is_none()
}

/// Unsmoothed stop point for `record` around `focus`.
#[must_use]
pub fn desired_stop(
    record: &UnitRecord,
    focus: &Focus,
    combat: &CombatTuning,
    follow: &FollowTuning,
) -> Vec3 {
    let position = record.unit.position;
    let centre = focus.view.position;
    if record.attacker.is_charging {
        return Vec3::new(centre.x, position.y, centre.z);
    }

    let rings = StopRings::around(record, focus, combat, follow);
    let away = planar_delta(centre, position);
    let distance = away.length();
    let mut stop = match rings.desired_distance(record.anchor, distance) {
        None => position,
        Some(d) => {
            let dir = away
                .try_normalize()
                .unwrap_or_else(|| -forward_of(record.unit.yaw));
            let ground = planar(centre) + dir * d;
            Vec3::new(ground.x, position.y, ground.y)
        }
    };

    if !focus.manual {
        let leash = record.attacker.max_chase_meters;
        if leash == 0.0 {
            stop = position;
        } else if leash > 0.0 {
            let home = record.targets.goal();
            let offset = planar_delta(home, stop);
            if offset.length_squared() > leash * leash {
                let clamped = planar(home) + offset.normalize() * leash;
                stop = Vec3::new(clamped.x, position.y, clamped.y);
            }
        }
    }
    stop
}

/// Moves the smoothed pursuit point and facing towards `focus`.
///
/// Inside its zone band a unit holds its pursuit facing. A fresh focus has
/// no facing yet and is seeded with the direction towards it.
pub fn update_pursuit(
    record: &mut UnitRecord,
    focus: &Focus,
    combat: &CombatTuning,
    follow: &FollowTuning,
    dt: f32,
) {
    let desired = desired_stop(record, focus, combat, follow);
    let holding = holds_in_zone(record, focus, combat, follow);
    let blend = smoothing_factor(follow.smoothing_rate.max(0.0), dt);
    let targets = &mut record.targets;
    targets.target_position = targets.target_position.lerp(desired, blend);

    let Some(facing) = yaw_towards(record.unit.position, focus.view.position) else {
        return;
    };
    if !targets.target_rotation.is_finite() {
        targets.target_rotation = facing;
    } else if !holding {
        targets.target_rotation = lerp_angle(targets.target_rotation, facing, blend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Faction, Stance, TargetingSize, UnitBlueprint};
    use crate::entity::UnitHandle;
    use crate::snapshot::UnitView;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn follower(anchor: AnchorPolicy, radius: f32) -> UnitRecord {
        let mut blueprint = UnitBlueprint::new(Faction::default(), Vec3::ZERO);
        blueprint.anchor = anchor;
        blueprint.size = Some(TargetingSize {
            radius,
            height: 1.0,
        });
        blueprint.combat.attack_range = 2.0;
        UnitRecord::from_blueprint(&blueprint)
    }

    fn focus_at(z: f32, radius: f32, manual: bool, hostile: bool) -> Focus {
        Focus {
            view: UnitView {
                handle: UnitHandle::from_raw_parts(1, 0),
                position: Vec3::new(0.0, 0.0, z),
                yaw: 0.0,
                faction: Faction::default(),
                radius,
                alive: true,
            },
            manual,
            hostile,
        }
    }

    fn tuning() -> (CombatTuning, FollowTuning) {
        (CombatTuning::default(), FollowTuning::default())
    }

    #[rstest]
    fn rings_for_hostile_and_friendly_focus() {
        let (combat, follow) = tuning();
        let record = follower(AnchorPolicy::Zone, 0.5);
        let enemy = focus_at(5.0, 0.5, false, true);
        let hostile = StopRings::around(&record, &enemy, &combat, &follow);
        assert_relative_eq!(hostile.inner, 1.0);
        assert_relative_eq!(hostile.outer, 2.0 - combat.reach_tolerance + 1.0);
        let friendly =
            StopRings::around(&record, &focus_at(5.0, 0.5, true, false), &combat, &follow);
        assert_relative_eq!(friendly.outer, 1.0 + follow.follow_padding);
    }

    #[rstest]
    fn outer_ring_never_inside_inner() {
        let (combat, follow) = tuning();
        let mut record = follower(AnchorPolicy::Zone, 1.0);
        record.combat.attack_range = 0.0;
        let rings = StopRings::around(&record, &focus_at(5.0, 1.0, false, true), &combat, &follow);
        assert_relative_eq!(rings.outer, rings.inner);
    }

    #[rstest]
    #[case(AnchorPolicy::Zone, 2.0, None)]
    #[case(AnchorPolicy::Zone, 0.5, Some(1.0))]
    #[case(AnchorPolicy::Zone, 9.0, Some(3.0))]
    #[case(AnchorPolicy::Kiting, 2.0, Some(3.0))]
    fn anchor_policies(
        #[case] policy: AnchorPolicy,
        #[case] current: f32,
        #[case] expected: Option<f32>,
    ) {
        let rings = StopRings {
            inner: 1.0,
            outer: 3.0,
        };
        assert_eq!(rings.desired_distance(policy, current), expected);
    }

    #[rstest]
    fn zone_holds_position_inside_band() {
        let (combat, follow) = tuning();
        let record = follower(AnchorPolicy::Zone, 0.0);
        let stop = desired_stop(&record, &focus_at(1.5, 0.0, false, true), &combat, &follow);
        assert_eq!(stop, Vec3::ZERO);
    }

    #[rstest]
    fn approaches_to_outer_ring_from_afar() {
        let (combat, follow) = tuning();
        let record = follower(AnchorPolicy::Zone, 0.0);
        let stop = desired_stop(&record, &focus_at(10.0, 0.0, false, true), &combat, &follow);
        assert_relative_eq!(stop.z, 10.0 - (2.0 - combat.reach_tolerance), epsilon = 1e-5);
    }

    #[rstest]
    fn hold_ground_pins_auto_pursuit() {
        let (combat, follow) = tuning();
        let mut record = follower(AnchorPolicy::Kiting, 0.0);
        record.attacker.max_chase_meters = Stance::HoldGround.max_chase_meters();
        let stop = desired_stop(&record, &focus_at(10.0, 0.0, false, true), &combat, &follow);
        assert_eq!(stop, Vec3::ZERO);
        let manual = desired_stop(&record, &focus_at(10.0, 0.0, true, true), &combat, &follow);
        assert!(manual.z > 1.0);
    }

    #[rstest]
    fn defensive_leash_clamps_to_home() {
        let (combat, follow) = tuning();
        let mut record = follower(AnchorPolicy::Kiting, 0.0);
        record.attacker.max_chase_meters = 4.0;
        let stop = desired_stop(&record, &focus_at(20.0, 0.0, false, true), &combat, &follow);
        assert_relative_eq!(stop.z, 4.0, epsilon = 1e-5);
    }

    #[rstest]
    fn charging_targets_focus_centre() {
        let (combat, follow) = tuning();
        let mut record = follower(AnchorPolicy::Kiting, 0.0);
        record.attacker.is_charging = true;
        record.attacker.max_chase_meters = 0.0;
        let stop = desired_stop(&record, &focus_at(6.0, 0.0, false, true), &combat, &follow);
        assert_eq!(stop, Vec3::new(0.0, 0.0, 6.0));
    }

    #[rstest]
    fn pursuit_point_is_smoothed_not_snapped() {
        let (combat, follow) = tuning();
        let mut record = follower(AnchorPolicy::Kiting, 0.0);
        let focus = focus_at(10.0, 0.0, false, true);
        update_pursuit(&mut record, &focus, &combat, &follow, 1.0 / 64.0);
        let z = record.targets.target_position.z;
        assert!(z > 0.0 && z < 8.0, "pursuit point jumped to {z}");
        assert_relative_eq!(record.targets.target_rotation, 0.0);
    }

    #[rstest]
    fn zone_band_keeps_pursuit_facing() {
        let (combat, follow) = tuning();
        let mut record = follower(AnchorPolicy::Zone, 0.0);
        let focus = focus_at(1.5, 0.0, false, true);
        assert!(holds_in_zone(&record, &focus, &combat, &follow));

        record.targets.target_rotation = 1.0;
        update_pursuit(&mut record, &focus, &combat, &follow, 1.0 / 64.0);
        assert_relative_eq!(record.targets.target_rotation, 1.0);

        record.targets.target_rotation = f32::NAN;
        update_pursuit(&mut record, &focus, &combat, &follow, 1.0 / 64.0);
        assert_relative_eq!(record.targets.target_rotation, 0.0);
    }

    #[rstest]
    fn zone_outside_band_turns_towards_focus() {
        let (combat, follow) = tuning();
        let mut record = follower(AnchorPolicy::Zone, 0.0);
        let focus = focus_at(10.0, 0.0, false, true);
        assert!(!holds_in_zone(&record, &focus, &combat, &follow));
        record.targets.target_rotation = 1.0;
        update_pursuit(&mut record, &focus, &combat, &follow, 1.0 / 64.0);
        let turned = record.targets.target_rotation;
        assert!(turned > 0.0 && turned < 1.0, "facing {turned}");
    }
}
