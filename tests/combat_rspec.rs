//! Behaviour-driven tests using rust-rspec.
//!
//! These tests walk a lone attacker through one full attack window against a
//! passive victim.

use skirmish::components::AttackPhase;
use test_utils::{duel, run_ticks, Duel};

fn health_of_victim(duel: &Duel) -> i32 {
    duel.sim
        .get(duel.victim)
        .map_or(0, |record| record.health.current)
}

#[test]
fn attack_window_behaviour() {
    rspec::run(&rspec::given(
        "an attacker facing a passive victim one metre away",
        duel(),
        |ctx| {
            ctx.when("a single tick passes", |ctx| {
                ctx.before_each(|duel| {
                    run_ticks(&mut duel.sim, 1);
                });
                ctx.then("the attacker winds up its first swing", |duel| {
                    let record = duel.sim.get(duel.attacker).expect("attacker");
                    assert_eq!(record.attacker.attack_tick, 1);
                    assert_eq!(record.attacker.phase(), AttackPhase::Windup);
                });
                ctx.then("the victim is untouched", |duel| {
                    assert_eq!(health_of_victim(duel), 10);
                });
            });

            ctx.when("half a second of windup has elapsed", |ctx| {
                ctx.before_each(|duel| {
                    run_ticks(&mut duel.sim, 33);
                });
                ctx.then("the victim lost exactly one health", |duel| {
                    assert_eq!(health_of_victim(duel), 9);
                });
                ctx.then("the swing counter did not move", |duel| {
                    let record = duel.sim.get(duel.attacker).expect("attacker");
                    assert_eq!(record.attacker.attack_tick, 1);
                    assert!(record.attacker.impact_done);
                });
            });

            ctx.when("the whole window has closed", |ctx| {
                ctx.before_each(|duel| {
                    run_ticks(&mut duel.sim, 80);
                });
                ctx.then("the attacker is cooling down", |duel| {
                    let record = duel.sim.get(duel.attacker).expect("attacker");
                    assert_eq!(record.attacker.phase(), AttackPhase::Cooldown);
                    assert!(record.attacker.cooldown_left >= record.combat.attack_interval());
                });
                ctx.then("only one hit has landed", |duel| {
                    assert_eq!(health_of_victim(duel), 9);
                });
            });
        },
    ));
}
