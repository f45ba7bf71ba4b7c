//! Replays of the same scenario stay bit-identical.

use rstest::{fixture, rstest};
use skirmish::config::{ScenarioOrder, ScriptedOrder};
use skirmish::{ConfigError, Order, OrderKind, Scenario, SimulationContext, UnitHandle};
use std::thread;

const SKIRMISH: &str = r#"{
    "config": { "tick_hz": 64.0 },
    "factions": { "hostile_pairs": [[0, 1]], "symmetric": true },
    "units": [
        { "position": [0.0, 0.0, 0.0], "faction": 0 },
        { "position": [1.5, 0.0, 3.0], "faction": 0, "combat": { "hitchance": 0.5 } },
        { "position": [0.5, 0.0, 6.0], "faction": 1, "yaw": 3.14 },
        { "position": [-2.0, 0.0, 7.0], "faction": 1, "health": { "current": 3, "max": 3 } }
    ],
    "orders": [
        { "tick": 0, "unit": 0, "order": { "Attack": { "target": 3 } } },
        { "tick": 40, "unit": 2, "order": { "Other": { "Charge": true } } },
        { "tick": 90, "unit": 1, "order": { "Other": "Stop" } }
    ]
}"#;

#[fixture]
fn scenario() -> Scenario {
    Scenario::from_json(SKIRMISH).expect("valid scenario")
}

fn to_order(scripted: &ScriptedOrder, handles: &[UnitHandle], sequence: u64) -> Order {
    let unit = *handles.get(scripted.unit).expect("scripted unit");
    let kind = match scripted.order {
        ScenarioOrder::Attack { target } => OrderKind::Attack {
            target: *handles.get(target).expect("scripted target"),
        },
        ScenarioOrder::Other(kind) => kind,
    };
    Order::new(unit, sequence, kind)
}

#[derive(Debug, PartialEq, Eq)]
struct Replay {
    digests: Vec<u64>,
    rejected: usize,
}

/// Runs `ticks` steps, recording the digest after each one.
fn replay(scenario: &Scenario, ticks: u64) -> Replay {
    let (mut sim, handles) = SimulationContext::from_scenario(scenario).expect("context");
    let mut digests = Vec::new();
    let mut rejected = 0;
    while sim.tick() < ticks {
        for (sequence, scripted) in (1..).zip(&scenario.orders) {
            if scripted.tick == sim.tick()
                && sim
                    .apply_order(&to_order(scripted, &handles, sequence))
                    .is_err()
            {
                rejected += 1;
            }
        }
        sim.advance();
        digests.push(sim.digest());
    }
    Replay { digests, rejected }
}

#[rstest]
fn identical_runs_produce_identical_digests(scenario: Scenario) {
    assert_eq!(replay(&scenario, 400), replay(&scenario, 400));
}

#[rstest]
fn runs_on_other_threads_agree(scenario: Scenario) {
    let expected = replay(&scenario, 200);
    let workers: Vec<_> = (0..3)
        .map(|_| {
            let copy = scenario.clone();
            thread::spawn(move || replay(&copy, 200))
        })
        .collect();
    for worker in workers {
        assert_eq!(worker.join().expect("replay thread"), expected);
    }
}

#[rstest]
fn digests_change_as_the_fight_unfolds(scenario: Scenario) {
    let Replay { digests, .. } = replay(&scenario, 120);
    assert_eq!(digests.len(), 120);
    let first = digests.first().copied();
    assert!(digests.iter().any(|&d| Some(d) != first));
}

#[rstest]
fn scripted_orders_must_name_known_units() {
    let broken = SKIRMISH.replace(r#""target": 3"#, r#""target": 9"#);
    assert!(matches!(
        Scenario::from_json(&broken),
        Err(ConfigError::UnknownScenarioUnit(9, 4))
    ));
}

#[rstest]
fn zero_tick_rate_is_rejected() {
    let broken = SKIRMISH.replace("64.0", "0.0");
    assert!(matches!(
        Scenario::from_json(&broken),
        Err(ConfigError::TickRate(_))
    ));
}
