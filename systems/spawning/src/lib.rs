#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for timing enemy spawns.
//!
//! [`build_wave`] expands a wave index into an ordered list of
//! [`SpawnEvent`] values whose offsets never decrease. [`WaveSchedule`] holds
//! the remaining events of the active wave and releases every event that fell
//! due during a tick, so a long tick may spawn several enemies at once.

use std::collections::VecDeque;
use std::time::Duration;

use neon_path_core::EnemyKind;

/// Pause inserted after every kind group before the next group starts.
pub const GROUP_GAP_SECS: f32 = 0.8;

/// Number of enemies of one kind spawned back to back at a fixed cadence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnGroup {
    /// Kind of enemy spawned by the group.
    pub kind: EnemyKind,
    /// Number of enemies in the group.
    pub count: u32,
    /// Seconds between consecutive spawns of the group.
    pub interval: f32,
}

impl SpawnGroup {
    const fn new(kind: EnemyKind, count: u32, interval: f32) -> Self {
        Self {
            kind,
            count,
            interval,
        }
    }
}

/// Single enemy spawn scheduled relative to the start of a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnEvent {
    /// Seconds after the wave started at which the enemy appears.
    pub offset: f32,
    /// Kind of enemy to spawn.
    pub kind: EnemyKind,
}

/// Kind groups making up the provided wave, in spawn order.
#[must_use]
pub fn wave_groups(wave: u32) -> Vec<SpawnGroup> {
    let base = 7 + wave * 2;
    let mut groups = Vec::with_capacity(7);

    if wave < 5 {
        groups.push(SpawnGroup::new(EnemyKind::Runner, base, 0.8));
        if wave >= 2 {
            groups.push(SpawnGroup::new(EnemyKind::Sprinter, 3 + wave, 0.6));
        }
    } else if wave < 10 {
        groups.push(SpawnGroup::new(EnemyKind::Runner, base.saturating_sub(4), 0.7));
        groups.push(SpawnGroup::new(EnemyKind::Sprinter, 4 + wave, 0.55));
        groups.push(SpawnGroup::new(EnemyKind::Swarm, 3 + wave / 2, 0.4));
        groups.push(SpawnGroup::new(EnemyKind::Brute, 2 + wave / 3, 1.2));
    } else if wave < 15 {
        groups.push(SpawnGroup::new(EnemyKind::Runner, base.saturating_sub(6), 0.65));
        groups.push(SpawnGroup::new(EnemyKind::Sprinter, 6 + wave, 0.5));
        groups.push(SpawnGroup::new(EnemyKind::Swarm, 6 + wave / 2, 0.35));
        groups.push(SpawnGroup::new(EnemyKind::Brute, 3 + wave / 2, 1.1));
        groups.push(SpawnGroup::new(EnemyKind::Regenerator, 3 + wave / 3, 0.9));
    } else {
        groups.push(SpawnGroup::new(EnemyKind::Runner, base.saturating_sub(6), 0.6));
        groups.push(SpawnGroup::new(EnemyKind::Sprinter, 7 + wave, 0.45));
        groups.push(SpawnGroup::new(EnemyKind::Swarm, 7 + wave / 2, 0.3));
        groups.push(SpawnGroup::new(EnemyKind::Brute, 4 + wave / 2, 1.0));
        groups.push(SpawnGroup::new(EnemyKind::Regenerator, 5 + wave / 3, 0.8));
        groups.push(SpawnGroup::new(EnemyKind::Shielded, 4 + wave / 3, 1.0));
    }

    if wave % 5 == 0 {
        groups.push(SpawnGroup::new(EnemyKind::Boss, 1 + wave / 10, 3.0));
    }

    groups
}

/// Expands a wave into its ordered spawn events.
#[must_use]
pub fn build_wave(wave: u32) -> Vec<SpawnEvent> {
    let groups = wave_groups(wave);
    let total = groups.iter().map(|group| group.count as usize).sum();
    let mut events = Vec::with_capacity(total);

    let mut offset = 0.0_f32;
    for group in groups {
        for _ in 0..group.count {
            events.push(SpawnEvent {
                offset,
                kind: group.kind,
            });
            offset += group.interval;
        }
        offset += GROUP_GAP_SECS;
    }
    events
}

/// Remaining spawn events of the active wave plus the wave clock.
#[derive(Clone, Debug, Default)]
pub struct WaveSchedule {
    pending: VecDeque<SpawnEvent>,
    elapsed: f32,
}

impl WaveSchedule {
    /// Creates a schedule with nothing left to spawn.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule for the provided wave with the clock at zero.
    #[must_use]
    pub fn for_wave(wave: u32) -> Self {
        Self {
            pending: build_wave(wave).into(),
            elapsed: 0.0,
        }
    }

    /// Advances the wave clock and emits every kind whose event fell due.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<EnemyKind>) {
        self.elapsed += dt.as_secs_f32();
        while let Some(event) = self.pending.front() {
            if event.offset > self.elapsed {
                break;
            }
            out.push(event.kind);
            let _ = self.pending.pop_front();
        }
    }

    /// Reports whether every event of the wave was released.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of events still waiting to be released.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Seconds elapsed since the wave started.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
