#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestration for Neon Path.
//!
//! [`Simulation`] owns the authoritative world together with every pure
//! system and runs them in a fixed order on each tick:
//!
//! 1. spawning, enemy motion, status decay and cooldowns (`Command::Tick`);
//! 2. aura aggregation into effective tower stats;
//! 3. targeting and fire control;
//! 4. projectile flight and hit resolution;
//! 5. compaction of dead entities and wave completion.
//!
//! Player actions are forwarded to the world immediately and every change is
//! recorded as an [`Event`] that presentation layers collect through
//! [`Simulation::drain_events`].

use std::time::Duration;

use neon_path_core::{
    AbilityError, CellCoord, Command, EnemyView, Event, GameConfig, GameStats, PathError,
    PathModel, PlacementError, ProjectileView, SellError, TowerId, TowerKind, TowerModifiers,
    TowerTarget, TowerView, UpgradeError, UpgradePath, WaveStartError,
};
use neon_path_system_auras::Auras;
use neon_path_system_projectiles::ProjectileFlight;
use neon_path_system_tower_combat::TowerCombat;
use neon_path_system_tower_targeting::TowerTargeting;
use neon_path_world::{self as world, query, World};

/// Amount by which [`Simulation::speed_up`] and [`Simulation::speed_down`]
/// change the speed multiplier.
pub const SPEED_STEP: f32 = 0.5;

/// Simulation context owning the world and the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    auras: Auras,
    targeting: TowerTargeting,
    combat: TowerCombat,
    flight: ProjectileFlight,
    modifiers: Vec<TowerModifiers>,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    /// Creates a simulation for a fresh play-through described by `config`.
    pub fn new(config: GameConfig) -> Result<Self, PathError> {
        Ok(Self {
            world: World::new(config)?,
            auras: Auras::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            flight: ProjectileFlight::new(),
            modifiers: Vec::new(),
            targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Advances the simulation by `elapsed` wall-clock time.
    ///
    /// The elapsed time is scaled by the speed multiplier once, up front.
    /// Nothing happens while paused, after the game ended, or when the
    /// scaled time is zero. A loss during enemy motion ends the tick early.
    pub fn tick(&mut self, elapsed: Duration) {
        let stats = query::stats(&self.world);
        if stats.paused || stats.is_terminal() {
            return;
        }
        let scaled = elapsed.as_secs_f32() * stats.speed;
        if !scaled.is_finite() || scaled <= 0.0 {
            return;
        }
        let Ok(dt) = Duration::try_from_secs_f32(scaled) else {
            return;
        };

        self.apply(Command::Tick { dt });
        if query::stats(&self.world).is_terminal() {
            return;
        }

        self.auras
            .handle(&query::tower_view(&self.world), &mut self.modifiers);
        let modifiers = std::mem::take(&mut self.modifiers);
        self.apply(Command::ApplyModifiers { modifiers });

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(&towers, &enemies, &mut self.targets);
        self.combat.handle(&towers, &self.targets, &mut self.commands);
        self.flush_commands();

        let projectiles = query::projectile_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.flight
            .handle(&projectiles, &enemies, dt, &mut self.commands);
        self.flush_commands();

        self.apply(Command::ConcludeTick);
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Builds a tower of `kind` on `cell`.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<TowerId, PlacementError> {
        world::place_tower(&mut self.world, kind, cell, &mut self.events)
    }

    /// Buys the next upgrade tier of `path` for `tower`.
    pub fn upgrade_tower(&mut self, tower: TowerId, path: UpgradePath) -> Result<(), UpgradeError> {
        world::upgrade_tower(&mut self.world, tower, path, &mut self.events)
    }

    /// Sells `tower`, returning the refunded amount.
    pub fn sell_tower(&mut self, tower: TowerId) -> Result<u32, SellError> {
        world::sell_tower(&mut self.world, tower, &mut self.events)
    }

    /// Starts the next wave, returning its one-based index.
    pub fn start_next_wave(&mut self) -> Result<u32, WaveStartError> {
        world::start_next_wave(&mut self.world, &mut self.events)
    }

    /// Uses the freeze ability for the current wave cycle.
    pub fn activate_freeze(&mut self) -> Result<(), AbilityError> {
        world::activate_freeze(&mut self.world, &mut self.events)
    }

    /// Uses the storm ability, returning the damage dealt to each enemy.
    pub fn activate_storm(&mut self) -> Result<f32, AbilityError> {
        world::activate_storm(&mut self.world, &mut self.events)
    }

    /// Pauses or resumes the simulation.
    pub fn set_paused(&mut self, paused: bool) {
        world::set_paused(&mut self.world, paused);
    }

    /// Flips the paused flag, returning the new value.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = !query::stats(&self.world).paused;
        self.set_paused(paused);
        paused
    }

    /// Sets the speed multiplier, returning the clamped value in effect.
    pub fn set_speed(&mut self, speed: f32) -> f32 {
        world::set_speed(&mut self.world, speed)
    }

    /// Raises the speed multiplier by one step.
    pub fn speed_up(&mut self) -> f32 {
        let speed = query::stats(&self.world).speed;
        self.set_speed(speed + SPEED_STEP)
    }

    /// Lowers the speed multiplier by one step.
    pub fn speed_down(&mut self) -> f32 {
        let speed = query::stats(&self.world).speed;
        self.set_speed(speed - SPEED_STEP)
    }

    /// Economy, progression and control flags.
    #[must_use]
    pub fn stats(&self) -> GameStats {
        query::stats(&self.world)
    }

    /// Every tower with its current effective stats.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Every enemy on the path.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Every projectile in flight.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Target assignments computed during the latest tick.
    #[must_use]
    pub fn targets(&self) -> &[TowerTarget] {
        &self.targets
    }

    /// The enemy path.
    #[must_use]
    pub fn path(&self) -> &PathModel {
        query::path(&self.world)
    }

    /// Read-only access to the underlying world for additional queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Takes every event recorded since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
