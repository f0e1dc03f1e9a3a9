use std::time::Duration;

use anyhow::{bail, Result};
use neon_path_core::{Event, WaveStartError};
use neon_path_simulation::Simulation;

/// Ticks allowed per wave before the run is considered stuck.
const MAX_TICKS_PER_WAVE: u32 = 1_000_000;

/// Tally of the events observed during a headless run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub(crate) waves_played: u32,
    pub(crate) waves_cleared: u32,
    pub(crate) enemies_spawned: u32,
    pub(crate) projectiles_fired: u32,
    pub(crate) level_ups: u32,
}

impl RunReport {
    fn record(&mut self, event: &Event) {
        match event {
            Event::WaveCleared { .. } => self.waves_cleared += 1,
            Event::EnemySpawned { .. } => self.enemies_spawned += 1,
            Event::ProjectileFired { .. } => self.projectiles_fired += 1,
            Event::LeveledUp { .. } => self.level_ups += 1,
            _ => {}
        }
    }
}

/// Plays up to `waves` waves back to back with a fixed tick length.
///
/// The run stops early once the game ends or no waves remain.
pub(crate) fn run(simulation: &mut Simulation, waves: u32, dt: Duration) -> Result<RunReport> {
    if dt.is_zero() {
        bail!("tick length must be positive");
    }

    let mut report = RunReport::default();
    for _ in 0..waves {
        match simulation.start_next_wave() {
            Ok(_) => report.waves_played += 1,
            Err(WaveStartError::GameOver | WaveStartError::MaxWavesReached) => break,
            Err(error) => bail!("wave could not start: {error}"),
        }
        play_wave(simulation, dt, &mut report)?;

        let stats = simulation.stats();
        if stats.is_terminal() {
            break;
        }
        tracing::debug!(
            "After wave {}: {} lives, {} money",
            stats.wave,
            stats.lives,
            stats.money
        );
    }
    Ok(report)
}

fn play_wave(simulation: &mut Simulation, dt: Duration, report: &mut RunReport) -> Result<()> {
    for _ in 0..MAX_TICKS_PER_WAVE {
        simulation.tick(dt);
        for event in simulation.drain_events() {
            report.record(&event);
        }
        let stats = simulation.stats();
        if !stats.wave_active || stats.is_terminal() {
            return Ok(());
        }
    }
    bail!(
        "wave {} did not finish within {MAX_TICKS_PER_WAVE} ticks",
        simulation.stats().wave
    )
}
