#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Neon Path.
//!
//! The world owns every tower, enemy and projectile together with the
//! economy and wave progression. Systems never mutate it directly: they emit
//! [`Command`] values that [`apply`] executes in order, and player actions go
//! through the dedicated functions in this crate, which either succeed and
//! broadcast [`Event`] values or return a rejection without touching state.

mod combat;
mod economy;
mod enemies;
mod projectiles;
mod towers;

use std::time::Duration;

use glam::Vec2;
use neon_path_core::{
    AbilityError, CellCoord, Command, EnemyId, EnemyKind, Event, GameConfig, Outcome, PathError,
    PathModel, PlacementError, ProjectileId, SellError, TowerId, TowerKind, UpgradeError,
    UpgradePath, WaveStartError, WELCOME_BANNER,
};
use neon_path_system_spawning::WaveSchedule;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::economy::Economy;
use crate::enemies::{Enemy, EnemyRoster, Leak};
use crate::projectiles::ProjectileStore;
use crate::towers::{TowerRegistry, RETRY_COOLDOWN_SECS};

const FREEZE_DURATION_SECS: f32 = 4.0;
const STORM_BASE_DAMAGE: f32 = 40.0;
const STORM_DAMAGE_PER_WAVE: f32 = 4.0;
const KILL_XP_BASE: u32 = 3;
const STORM_KILL_XP_BASE: u32 = 5;
const WAVE_CLEAR_XP_BASE: u32 = 25;
const WAVE_CLEAR_XP_PER_WAVE: u32 = 4;
const WAVE_CLEAR_BONUS_BASE: u32 = 80;
const WAVE_CLEAR_BONUS_PER_WAVE: u32 = 10;

/// Slowest simulation speed multiplier.
pub const MIN_SPEED: f32 = 0.5;
/// Fastest simulation speed multiplier.
pub const MAX_SPEED: f32 = 3.0;

/// Represents the authoritative Neon Path world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    path: PathModel,
    towers: TowerRegistry,
    enemies: EnemyRoster,
    projectiles: ProjectileStore,
    economy: Economy,
    lives: u32,
    wave: u32,
    wave_active: bool,
    schedule: WaveSchedule,
    paused: bool,
    speed: f32,
    freeze_remaining: f32,
    freeze_used: bool,
    storm_used: bool,
    outcome: Option<Outcome>,
    enemies_leaked: u32,
    rng: ChaCha8Rng,
    spawned: Vec<EnemyKind>,
    leaks: Vec<Leak>,
}

impl World {
    /// Creates a world for a fresh play-through described by `config`.
    pub fn new(config: GameConfig) -> Result<Self, PathError> {
        let path = config.build_path()?;
        Ok(Self {
            banner: WELCOME_BANNER,
            path,
            towers: TowerRegistry::new(),
            enemies: EnemyRoster::new(),
            projectiles: ProjectileStore::new(),
            economy: Economy::new(config.starting_money),
            lives: config.starting_lives,
            wave: 0,
            wave_active: false,
            schedule: WaveSchedule::new(),
            paused: false,
            speed: 1.0,
            freeze_remaining: 0.0,
            freeze_used: false,
            storm_used: false,
            outcome: None,
            enemies_leaked: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            spawned: Vec::new(),
            leaks: Vec::new(),
            config,
        })
    }

    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let secs = dt.as_secs_f32();
        out_events.push(Event::TimeAdvanced { dt });

        if self.wave_active {
            self.schedule.advance(dt, &mut self.spawned);
            for kind in self.spawned.drain(..) {
                let enemy = self.enemies.spawn(kind, self.wave);
                tracing::debug!("Spawned {} {}", kind.name(), enemy.get());
                out_events.push(Event::EnemySpawned { enemy, kind });
            }
        }

        let freeze_active = self.freeze_remaining > 0.0;
        self.enemies.advance(
            secs,
            freeze_active,
            self.path.total_length(),
            &mut self.leaks,
        );
        for leak in self.leaks.drain(..) {
            self.lives = self.lives.saturating_sub(1);
            self.enemies_leaked = self.enemies_leaked.saturating_add(1);
            tracing::debug!(
                "{} {} leaked, {} lives left",
                leak.kind.name(),
                leak.id.get(),
                self.lives
            );
            out_events.push(Event::EnemyLeaked {
                enemy: leak.id,
                kind: leak.kind,
                lives_remaining: self.lives,
            });
            if self.lives == 0 && self.outcome.is_none() {
                self.outcome = Some(Outcome::Lost);
                tracing::info!("Base destroyed during wave {}", self.wave);
                out_events.push(Event::GameLost);
            }
        }

        if freeze_active {
            self.freeze_remaining = (self.freeze_remaining - secs).max(0.0);
        }
        self.towers.cool_down(secs);
    }

    fn fire(&mut self, tower_id: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.get(tower_id) else {
            return;
        };
        let fire_rate = tower.effective.fire_rate;
        if fire_rate <= 0.0 {
            return;
        }
        if !self.enemies.get(target).is_some_and(Enemy::is_living) {
            self.hold_fire(tower_id);
            return;
        }

        let projectile = self.projectiles.launch(tower, target);
        if let Some(tower) = self.towers.get_mut(tower_id) {
            tower.cooldown = 1.0 / fire_rate;
        }
        out_events.push(Event::ProjectileFired {
            projectile,
            tower: tower_id,
            target,
        });
    }

    fn hold_fire(&mut self, tower_id: TowerId) {
        if let Some(tower) = self.towers.get_mut(tower_id) {
            tower.cooldown = RETRY_COOLDOWN_SECS;
        }
    }

    fn resolve_hit(&mut self, id: ProjectileId, impact: Vec2, out_events: &mut Vec<Event>) {
        let Some(projectile) = self.projectiles.get_mut(id) else {
            return;
        };
        let target = projectile.target;
        let payload = projectile.payload;
        let Some(enemy) = self.enemies.get_mut(target).filter(|enemy| enemy.is_living()) else {
            projectile.spent = true;
            return;
        };

        combat::strike(enemy, &payload, &mut self.rng);
        let killed = enemy.hp <= 0.0;
        combat::splash(&mut self.enemies, &self.path, target, impact, &payload);
        if killed {
            self.record_kill(target, KILL_XP_BASE + self.wave, out_events);
        }

        let Some(projectile) = self.projectiles.get_mut(id) else {
            return;
        };
        if projectile.pierce_remaining == 0 {
            projectile.spent = true;
            return;
        }
        projectile.pierce_remaining -= 1;
        projectile.position = impact;
        projectile.struck.push(target);
        match nearest_unstruck(
            &self.enemies,
            &self.path,
            impact,
            projectile.reach,
            &projectile.struck,
        ) {
            Some(next) => projectile.target = next,
            None => projectile.spent = true,
        }
    }

    fn record_kill(&mut self, id: EnemyId, xp: u32, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(id) else {
            return;
        };
        if !enemy.alive {
            return;
        }
        enemy.alive = false;
        let (kind, reward) = (enemy.kind, enemy.reward);
        self.economy.credit_kill(reward);
        tracing::debug!("Killed {} {} for {}", kind.name(), id.get(), reward);
        out_events.push(Event::EnemyKilled {
            enemy: id,
            kind,
            reward,
        });
        self.grant_xp(xp, out_events);
    }

    fn grant_xp(&mut self, xp: u32, out_events: &mut Vec<Event>) {
        for level in self.economy.grant_xp(xp) {
            tracing::info!("Reached level {}", level);
            out_events.push(Event::LeveledUp { level });
        }
    }

    fn conclude_tick(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.compact();
        self.projectiles.compact();

        if !self.wave_active || !self.schedule.is_exhausted() || !self.enemies.is_empty() {
            return;
        }
        self.wave_active = false;
        let wave = self.wave;
        self.grant_xp(
            WAVE_CLEAR_XP_BASE + WAVE_CLEAR_XP_PER_WAVE * wave,
            out_events,
        );

        if wave >= self.config.max_waves {
            self.outcome = Some(Outcome::Won);
            tracing::info!("Final wave {} cleared", wave);
            out_events.push(Event::WaveCleared { wave, bonus: 0 });
            out_events.push(Event::GameWon);
            return;
        }

        let bonus = WAVE_CLEAR_BONUS_BASE + WAVE_CLEAR_BONUS_PER_WAVE * wave;
        self.economy.credit(bonus);
        tracing::info!("Wave {} cleared, bonus {}", wave, bonus);
        out_events.push(Event::WaveCleared { wave, bonus });
    }
}

fn nearest_unstruck(
    enemies: &EnemyRoster,
    path: &PathModel,
    origin: Vec2,
    reach: f32,
    struck: &[EnemyId],
) -> Option<EnemyId> {
    let mut best: Option<(f32, EnemyId)> = None;
    for enemy in enemies.iter() {
        if !enemy.is_living() || struck.contains(&enemy.id) {
            continue;
        }
        let distance = path.position(enemy.distance).distance(origin);
        if distance > reach {
            continue;
        }
        if best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, enemy.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands are ignored once the play-through reached a terminal state.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.is_terminal() {
        return;
    }
    match command {
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::ApplyModifiers { modifiers } => world.towers.apply_modifiers(&modifiers),
        Command::FireProjectile { tower, target } => world.fire(tower, target, out_events),
        Command::HoldFire { tower } => world.hold_fire(tower),
        Command::MoveProjectile { projectile, to } => {
            if let Some(projectile) = world.projectiles.get_mut(projectile) {
                if to.is_finite() {
                    projectile.position = to;
                }
            }
        }
        Command::ResolveHit { projectile, impact } => {
            world.resolve_hit(projectile, impact, out_events);
        }
        Command::DiscardProjectile { projectile } => world.projectiles.discard(projectile),
        Command::ConcludeTick => world.conclude_tick(out_events),
    }
}

/// Builds a tower of `kind` on `cell`, charging its price.
pub fn place_tower(
    world: &mut World,
    kind: TowerKind,
    cell: CellCoord,
    out_events: &mut Vec<Event>,
) -> Result<TowerId, PlacementError> {
    if world.is_terminal() {
        return Err(PlacementError::GameOver);
    }
    if !world.config.in_bounds(cell) {
        return Err(PlacementError::OutOfBounds);
    }
    if world.towers.at_cell(cell).is_some() {
        return Err(PlacementError::Occupied);
    }
    if world.path.contains_cell(cell) {
        return Err(PlacementError::OnPath);
    }
    if !world.economy.try_spend(kind.definition().cost) {
        return Err(PlacementError::InsufficientFunds);
    }

    let tower = world
        .towers
        .insert(kind, cell, cell.center(world.config.tile_size));
    tracing::debug!(
        "Placed {} {} at ({}, {})",
        kind.name(),
        tower.get(),
        cell.column(),
        cell.row()
    );
    out_events.push(Event::TowerPlaced { tower, kind, cell });
    Ok(tower)
}

/// Buys the next tier of `path` for `tower`, committing the path on first use.
pub fn upgrade_tower(
    world: &mut World,
    tower: TowerId,
    path: UpgradePath,
    out_events: &mut Vec<Event>,
) -> Result<(), UpgradeError> {
    if world.is_terminal() {
        return Err(UpgradeError::GameOver);
    }
    let state = world
        .towers
        .get_mut(tower)
        .ok_or(UpgradeError::MissingTower)?;
    let step = state.next_upgrade(path)?;
    if !world.economy.try_spend(step.cost) {
        return Err(UpgradeError::InsufficientFunds);
    }
    state.commit_upgrade(path, step);

    let level = state.level;
    tracing::debug!(
        "Upgraded {} {} to {:?}{}: {}",
        state.kind.name(),
        tower.get(),
        path,
        level,
        step.summary
    );
    out_events.push(Event::TowerUpgraded { tower, path, level });
    Ok(())
}

/// Removes `tower`, refunding 70% of everything invested in it.
pub fn sell_tower(
    world: &mut World,
    tower: TowerId,
    out_events: &mut Vec<Event>,
) -> Result<u32, SellError> {
    if world.is_terminal() {
        return Err(SellError::GameOver);
    }
    let removed = world.towers.remove(tower).ok_or(SellError::MissingTower)?;
    let refund = removed.refund();
    world.economy.credit(refund);
    tracing::debug!("Sold {} {} for {}", removed.kind.name(), tower.get(), refund);
    out_events.push(Event::TowerSold { tower, refund });
    Ok(refund)
}

/// Starts spawning the next wave and re-arms both abilities.
pub fn start_next_wave(
    world: &mut World,
    out_events: &mut Vec<Event>,
) -> Result<u32, WaveStartError> {
    if world.is_terminal() {
        return Err(WaveStartError::GameOver);
    }
    if world.wave_active {
        return Err(WaveStartError::AlreadyActive);
    }
    if world.wave >= world.config.max_waves {
        return Err(WaveStartError::MaxWavesReached);
    }

    world.wave += 1;
    world.wave_active = true;
    world.schedule = WaveSchedule::for_wave(world.wave);
    world.freeze_used = false;
    world.freeze_remaining = 0.0;
    world.storm_used = false;
    tracing::info!(
        "Wave {} started with {} enemies",
        world.wave,
        world.schedule.remaining()
    );
    out_events.push(Event::WaveStarted { wave: world.wave });
    Ok(world.wave)
}

/// Slows every enemy for a few seconds; usable once per wave cycle.
pub fn activate_freeze(world: &mut World, out_events: &mut Vec<Event>) -> Result<(), AbilityError> {
    if world.is_terminal() {
        return Err(AbilityError::GameOver);
    }
    if world.freeze_used {
        return Err(AbilityError::AlreadyUsed);
    }
    world.freeze_used = true;
    world.freeze_remaining = FREEZE_DURATION_SECS;
    tracing::info!("Freeze activated for {}s", FREEZE_DURATION_SECS);
    out_events.push(Event::FreezeActivated);
    Ok(())
}

/// Damages every living enemy at once; usable once per wave cycle.
///
/// Returns the damage dealt to each enemy.
pub fn activate_storm(world: &mut World, out_events: &mut Vec<Event>) -> Result<f32, AbilityError> {
    if world.is_terminal() {
        return Err(AbilityError::GameOver);
    }
    if world.storm_used {
        return Err(AbilityError::AlreadyUsed);
    }
    world.storm_used = true;
    let damage = STORM_BASE_DAMAGE + STORM_DAMAGE_PER_WAVE * world.wave as f32;
    tracing::info!("Storm activated for {} damage", damage);
    out_events.push(Event::StormActivated { damage });

    let mut killed = Vec::new();
    for enemy in world.enemies.iter_mut().filter(|enemy| enemy.is_living()) {
        enemy.hp -= damage;
        enemy.hit_flash = 1.0;
        if enemy.hp <= 0.0 {
            killed.push(enemy.id);
        }
    }
    let xp = STORM_KILL_XP_BASE + world.wave;
    for enemy in killed {
        world.record_kill(enemy, xp, out_events);
    }
    Ok(damage)
}

/// Pauses or resumes the simulation clock.
pub fn set_paused(world: &mut World, paused: bool) {
    world.paused = paused;
}

/// Sets the simulation speed multiplier, clamped to `[MIN_SPEED, MAX_SPEED]`.
///
/// Non-finite requests leave the speed unchanged. Returns the speed in effect.
pub fn set_speed(world: &mut World, speed: f32) -> f32 {
    if speed.is_finite() {
        world.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }
    world.speed
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use neon_path_core::{
        CellCoord, EnemyView, GameConfig, GameStats, PathModel, ProjectileView, TowerId,
        TowerView,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created from.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the enemy path.
    #[must_use]
    pub fn path(world: &World) -> &PathModel {
        &world.path
    }

    /// Captures economy, progression and control flags.
    #[must_use]
    pub fn stats(world: &World) -> GameStats {
        GameStats {
            money: world.economy.money,
            lives: world.lives,
            wave: world.wave,
            max_waves: world.config.max_waves,
            score: world.economy.score,
            xp: world.economy.xp,
            level: world.economy.level,
            paused: world.paused,
            speed: world.speed,
            wave_active: world.wave_active,
            freeze_remaining: world.freeze_remaining,
            freeze_used: world.freeze_used,
            storm_used: world.storm_used,
            outcome: world.outcome,
            enemies_killed: world.economy.kills,
            enemies_leaked: world.enemies_leaked,
        }
    }

    /// Captures a read-only view of every tower on the map.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of every enemy on the path.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot(&world.path))
                .collect(),
        )
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .in_flight()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Identifier of the tower standing on `cell`, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.at_cell(cell)
    }

    /// Reports whether a tower could be built on `cell`, ignoring funds.
    #[must_use]
    pub fn is_buildable(world: &World, cell: CellCoord) -> bool {
        world.config.in_bounds(cell)
            && world.towers.at_cell(cell).is_none()
            && !world.path.contains_cell(cell)
    }
}
