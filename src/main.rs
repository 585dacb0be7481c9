//! hexsupply demo runner
//!
//! Plays the standard two-faction scenario for a fixed number of rounds with
//! a simple scripted plan for both sides, then prints what happened.

use std::path::PathBuf;

use clap::Parser;
use hexsupply::campaign::scenario::{standard_game, NORTH, SOUTH};
use hexsupply::campaign::{
    path_cost, FactionStatus, FixedRoll, HexCoord, RoundEngine, RoundReport, SeededRolls,
};
use hexsupply::core::config::{load_rules, RulesConfig};
use hexsupply::core::error::Result;
use hexsupply::core::types::{FactionId, Resource};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Run the standard hexsupply scenario
#[derive(Parser, Debug)]
#[command(name = "hexsupply")]
#[command(about = "Run the two-faction supply war scenario")]
struct Args {
    /// Rules file (TOML); built-in defaults when omitted
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Number of rounds to play
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Seed for the combat rolls
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Use this roll for every attack instead of a seeded stream
    #[arg(long)]
    roll: Option<f64>,

    /// Print the round reports and final status as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct RunSummary {
    reports: Vec<RoundReport>,
    status: Vec<FactionStatus>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hexsupply=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => RulesConfig::default(),
    };

    let mut engine = match args.roll {
        Some(r) => standard_game(rules, FixedRoll(r)),
        None => standard_game(rules, SeededRolls::new(args.seed)),
    };

    tracing::info!(rounds = args.rounds, seed = args.seed, "hexsupply starting");

    let mut reports = Vec::new();
    for _ in 0..args.rounds {
        for (me, enemy) in [(NORTH, SOUTH), (SOUTH, NORTH)] {
            plan_faction(&mut engine, me, enemy);
        }

        let completed = engine.advance_upgrades();
        if !completed.is_empty() {
            tracing::info!(cells = completed.len(), "road upgrades finished");
        }

        let report = engine.run_round();
        if !args.json {
            print_report(&report);
        }
        let winner = report.winner;
        reports.push(report);
        if winner.is_some() {
            break;
        }
    }

    if args.json {
        let summary = RunSummary {
            reports,
            status: engine.status(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_status(&engine);
    }

    Ok(())
}

/// Scripted turn: stock up, drive to the centre, build road, attack.
///
/// Rejected actions are logged and skipped; the demo never aborts on them.
fn plan_faction(engine: &mut RoundEngine, me: FactionId, enemy: FactionId) {
    let Some(faction) = engine.faction(me) else {
        return;
    };
    let front = HexCoord::new(0, 0);
    let warehouse = faction.warehouses.first().map(|w| (w.id, w.position));
    let trucks: Vec<_> = faction
        .trucks
        .iter()
        .map(|t| (t.id, t.position, t.remaining_mp, t.free_capacity()))
        .collect();
    let engineer = faction.engineer_units.first().map(|e| e.id);
    let committed = faction.soldiers / 3;

    for (truck, position, remaining_mp, free) in trucks {
        if let Some((warehouse, _)) = warehouse {
            if free > 0 && engine.is_adjacent_to_warehouse(me, truck, warehouse) {
                let stock = engine
                    .faction(me)
                    .and_then(|f| f.get_warehouse(warehouse))
                    .map_or(0, |w| w.stock.food);
                let amount = free.min(stock);
                if amount > 0 {
                    if let Err(e) = engine.load(me, truck, warehouse, Resource::Food, amount) {
                        tracing::warn!(faction = %me, %truck, error = %e, "load failed");
                    }
                }
            }
        }

        if position == front {
            continue;
        }
        let Some(route) = engine.plan_path(position, front) else {
            continue;
        };

        let budget = if remaining_mp == 0 {
            engine.rules().movement.mp_per_round
        } else {
            remaining_mp
        };
        let steps = route.steps();
        let reach = (1..=steps.len())
            .rev()
            .find(|&n| path_cost(engine.grid(), &steps[..n], &engine.rules().movement) <= budget)
            .unwrap_or(0);
        if reach == 0 {
            continue;
        }
        if let Err(e) = engine.queue_move(me, truck, &steps[..reach]) {
            tracing::warn!(faction = %me, %truck, error = %e, "move failed");
        }
    }

    if let (Some(engineer), Some((_, home))) = (engineer, warehouse) {
        // Work outward from the warehouse along the row
        let step = if home.q < front.q { 1 } else { -1 };
        let target = (1..=home.q.abs())
            .map(|n| HexCoord::new(home.q + step * n, home.r))
            .find(|c| {
                engine
                    .grid()
                    .get(c)
                    .is_some_and(|cell| !cell.road_upgraded() && !cell.upgrade_in_progress())
            });
        if let Some(target) = target {
            if let Err(e) = engine.start_upgrade(me, engineer, target) {
                tracing::warn!(faction = %me, %engineer, error = %e, "upgrade failed");
            }
        }
    }

    if committed > 0 {
        engine.queue_attack(me, enemy, committed);
    }
}

fn print_report(report: &RoundReport) {
    println!("\n=== Round {} ===", report.round);
    for m in &report.moves {
        println!(
            "  {} {} moved {} -> {} (cost {})",
            m.faction, m.truck, m.from, m.to, m.cost
        );
    }
    for a in &report.attacks {
        let outcome = if a.result.success { "hit" } else { "repelled" };
        println!(
            "  {} attacked {} with {}: {} (p={:.2}, roll={:.2}, damage {}, lost {})",
            a.attacker,
            a.defender,
            a.result.participating,
            outcome,
            a.result.probability,
            a.result.roll,
            a.result.damage,
            a.result.attacker_loss
        );
    }
    for u in &report.upkeep {
        if u.starvation_loss > 0 {
            println!(
                "  {} starving: ate {}, lost {} soldiers",
                u.faction, u.food_consumed, u.starvation_loss
            );
        }
    }
    if let Some(winner) = report.winner {
        println!("  {} wins!", winner);
    }
}

fn print_status(engine: &RoundEngine) {
    println!("\n=== Status after {} rounds ===", engine.round() - 1);
    for f in engine.status() {
        println!(
            "{} ({}): soldiers {}, ammo {}, food {}, engineers {}",
            f.id, f.name, f.soldiers, f.ammo, f.food, f.engineers
        );
        for t in &f.trucks {
            println!(
                "  {} at {} mp {} cargo {}",
                t.id,
                t.position,
                t.remaining_mp,
                t.cargo.total()
            );
        }
    }
}
