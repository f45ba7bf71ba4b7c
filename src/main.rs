//! Headless scenario runner: loads a JSON scenario, simulates a fixed
//! number of ticks and logs the outcome with a replay digest.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use skirmish::config::{ScenarioOrder, ScriptedOrder};
use skirmish::{init_logging, Order, OrderKind, Scenario, SimulationContext, UnitHandle};

/// Headless runner for skirmish scenarios
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Number of fixed ticks to simulate
    #[arg(short, long, default_value_t = 640)]
    ticks: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn resolve(scripted: &ScriptedOrder, handles: &[UnitHandle], sequence: u64) -> Option<Order> {
    let unit = *handles.get(scripted.unit)?;
    let kind = match scripted.order {
        ScenarioOrder::Attack { target } => OrderKind::Attack {
            target: *handles.get(target)?,
        },
        ScenarioOrder::Other(kind) => kind,
    };
    Some(Order::new(unit, sequence, kind))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?;
    let (mut sim, handles) =
        SimulationContext::from_scenario(&scenario).context("building simulation")?;
    info!(
        "loaded {} units and {} scripted orders from {}",
        handles.len(),
        scenario.orders.len(),
        args.scenario.display()
    );

    let mut scripted: Vec<(u64, &ScriptedOrder)> = (1..).zip(&scenario.orders).collect();
    scripted.sort_by_key(|&(sequence, order)| (order.tick, sequence));
    let mut pending = scripted.into_iter().peekable();

    let mut hits = 0_usize;
    let mut deaths = 0_usize;
    while sim.tick() < args.ticks {
        while let Some((sequence, order)) = pending.next_if(|(_, o)| o.tick <= sim.tick()) {
            let Some(resolved) = resolve(order, &handles, sequence) else {
                continue;
            };
            if let Err(e) = sim.apply_order(&resolved) {
                warn!("scripted order {sequence} skipped: {e}");
            }
        }
        let report = sim.advance();
        for hit in &report.hits {
            debug!(
                "tick {}: {:?} hit {:?} ({} left)",
                report.tick, hit.attacker, hit.victim, hit.remaining
            );
        }
        for dead in &report.despawned {
            info!("tick {}: {dead:?} died", report.tick);
        }
        hits += report.hits.len();
        deaths += report.despawned.len();
    }

    info!(
        "ran {} ticks: {hits} hits, {deaths} deaths, {} units remain",
        sim.tick(),
        sim.unit_count()
    );
    info!("state digest {:016x}", sim.digest());
    Ok(())
}
