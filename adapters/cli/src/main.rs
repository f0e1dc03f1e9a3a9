#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Neon Path waves headlessly.

mod runner;
mod scenario;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use neon_path_core::{GameStats, Outcome};
use neon_path_simulation::Simulation;
use neon_path_world::query;
use tracing_subscriber::EnvFilter;

use crate::{
    runner::{run, RunReport},
    scenario::Scenario,
};

/// Plays Neon Path waves without a window and prints how the defence fared.
#[derive(Debug, Parser)]
#[command(name = "neon-path", version)]
struct Args {
    /// TOML scenario describing the map and the towers to build.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Number of waves to play; defaults to the scenario's value.
    #[arg(long)]
    waves: Option<u32>,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,
    /// Log filter directives, overriding `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

/// Entry point for the Neon Path command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::builtin()?,
    };
    let mut simulation = scenario.build()?;
    println!("{}", query::welcome_banner(simulation.world()));

    let waves = args
        .waves
        .or(scenario.waves)
        .unwrap_or(simulation.stats().max_waves);
    let report = run(&mut simulation, waves, Duration::from_millis(args.dt_ms))?;
    print_summary(&simulation, &report);
    Ok(())
}

fn init_tracing(directives: Option<&str>) {
    let filter = match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_summary(simulation: &Simulation, report: &RunReport) {
    let stats = simulation.stats();
    println!("{}", outcome_line(&stats));
    println!(
        "Waves played {}, cleared {} of {}",
        report.waves_played, report.waves_cleared, stats.max_waves
    );
    println!(
        "Lives {}  Money {}  Score {}  Level {} ({} xp)",
        stats.lives, stats.money, stats.score, stats.level, stats.xp
    );
    println!(
        "Enemies spawned {}, killed {}, leaked {}; {} projectiles fired; {} level-ups",
        report.enemies_spawned,
        stats.enemies_killed,
        stats.enemies_leaked,
        report.projectiles_fired,
        report.level_ups
    );
    for tower in simulation.towers().iter() {
        let path = tower
            .path
            .map_or_else(|| "-".to_owned(), |path| format!("{path:?}"));
        println!(
            "  {} T{} at ({}, {}) path {} level {}",
            tower.kind.name(),
            tower.tier(),
            tower.cell.column(),
            tower.cell.row(),
            path,
            tower.level
        );
    }
}

fn outcome_line(stats: &GameStats) -> String {
    match stats.outcome {
        Some(Outcome::Won) => format!("Victory after wave {}", stats.wave),
        Some(Outcome::Lost) => format!("Defeat during wave {}", stats.wave),
        None => format!("Stopped after wave {}", stats.wave),
    }
}
