#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Neon Path engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable views such as
//! [`TowerView`] and [`EnemyView`] and respond exclusively with [`Command`]
//! batches. The world executes those commands and broadcasts [`Event`] values
//! describing what changed. Player actions bypass the command queue and return
//! one of the rejection enums defined here when they cannot be honoured.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod path;

pub use catalog::{
    Aura, EnemyKind, EnemyStats, StatChange, TowerDefinition, TowerKind, TowerStats, UpgradeStep,
    MAX_UPGRADE_LEVEL,
};
pub use config::GameConfig;
pub use path::{PathError, PathModel, Segment};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Neon Path TD.";

/// Commands emitted by systems and executed by the world during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances wave spawning, enemy motion, status decay and tower cooldowns.
    Tick {
        /// Scaled simulation time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces every tower's transient modifiers for the current tick.
    ApplyModifiers {
        /// Aggregated modifiers, one entry per tower.
        modifiers: Vec<TowerModifiers>,
    },
    /// Requests that a ready tower launch a projectile at the provided enemy.
    FireProjectile {
        /// Tower whose cooldown elapsed.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Reports that a ready tower found nothing to shoot at.
    HoldFire {
        /// Tower that should retry shortly.
        tower: TowerId,
    },
    /// Moves an in-flight projectile to a new position.
    MoveProjectile {
        /// Projectile being advanced.
        projectile: ProjectileId,
        /// Position reached after this tick.
        to: Vec2,
    },
    /// Resolves a projectile hit against its target at the impact position.
    ResolveHit {
        /// Projectile that arrived.
        projectile: ProjectileId,
        /// Location of the target when the projectile arrived.
        impact: Vec2,
    },
    /// Removes a projectile whose target became invalid.
    DiscardProjectile {
        /// Projectile being discarded.
        projectile: ProjectileId,
    },
    /// Compacts dead entities and evaluates wave completion.
    ConcludeTick,
}

/// Events broadcast by the world after processing commands and actions.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Scaled duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Confirms that a tower advanced one upgrade level.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Path the tower is committed to.
        path: UpgradePath,
        /// Level reached after the upgrade.
        level: u8,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Tower that was removed.
        tower: TowerId,
        /// Amount credited back to the player.
        refund: u32,
    },
    /// Announces that a wave began spawning.
    WaveStarted {
        /// One-based index of the wave.
        wave: u32,
    },
    /// Announces that every enemy of the active wave was dealt with.
    WaveCleared {
        /// One-based index of the cleared wave.
        wave: u32,
        /// Money credited for clearing the wave.
        bonus: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
    },
    /// Reports that an enemy was destroyed and its reward credited.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Money credited for the kill.
        reward: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Lives left after the leak.
        lives_remaining: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy being tracked.
        target: EnemyId,
    },
    /// Announces that the player gained a level.
    LeveledUp {
        /// Level reached.
        level: u32,
    },
    /// Announces that the freeze ability was used.
    FreezeActivated,
    /// Announces that the storm ability was used.
    StormActivated {
        /// Damage dealt to every living enemy.
        damage: f32,
    },
    /// Announces that the base fell.
    GameLost,
    /// Announces that the final wave was cleared.
    GameWon,
}

/// Upgrade branch a tower commits to on its first upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradePath {
    /// First upgrade branch.
    A,
    /// Second upgrade branch.
    B,
}

/// Terminal state reached by a play-through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Lives were exhausted.
    Lost,
    /// The final wave was cleared.
    Won,
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space center of the cell for the provided tile size.
    #[must_use]
    pub fn center(self, tile_size: f32) -> Vec2 {
        Vec2::new(
            self.column as f32 * tile_size + tile_size / 2.0,
            self.row as f32 * tile_size + tile_size / 2.0,
        )
    }
}

/// Transient multipliers aggregated from auras and global buffs for one tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerModifiers {
    /// Tower receiving the modifiers.
    pub tower: TowerId,
    /// Multiplier applied to the tower's range.
    pub range: f32,
    /// Multiplier applied to the tower's damage.
    pub damage: f32,
    /// Multiplier applied to the tower's fire rate.
    pub fire_rate: f32,
    /// Additional slow carried by the tower's projectiles.
    pub slow_aura_bonus: f32,
}

impl TowerModifiers {
    /// Modifiers that leave every stat untouched.
    #[must_use]
    pub const fn neutral(tower: TowerId) -> Self {
        Self {
            tower,
            range: 1.0,
            damage: 1.0,
            fire_rate: 1.0,
            slow_aura_bonus: 0.0,
        }
    }
}

/// Target assignment produced for a tower that is ready to fire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that selected the target.
    pub tower: TowerId,
    /// Enemy chosen as the target.
    pub enemy: EnemyId,
    /// World-space center of the tower.
    pub tower_position: Vec2,
    /// World-space position of the enemy when it was selected.
    pub enemy_position: Vec2,
}

/// Tower stats after the current tick's modifiers were applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectiveStats {
    /// Targeting radius in world units.
    pub range: f32,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Additional slow carried by projectiles.
    pub slow_aura_bonus: f32,
}

impl EffectiveStats {
    /// Combines durable stats with the tick's modifiers.
    #[must_use]
    pub fn from_modifiers(stats: &TowerStats, modifiers: &TowerModifiers) -> Self {
        Self {
            range: stats.range * modifiers.range,
            damage: stats.damage * modifiers.damage,
            fire_rate: stats.fire_rate * modifiers.fire_rate,
            slow_aura_bonus: modifiers.slow_aura_bonus,
        }
    }

    /// Effective stats equal to the durable stats.
    #[must_use]
    pub fn unmodified(stats: &TowerStats) -> Self {
        Self {
            range: stats.range,
            damage: stats.damage,
            fire_rate: stats.fire_rate,
            slow_aura_bonus: 0.0,
        }
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// World-space center of the tower.
    pub position: Vec2,
    /// Number of upgrades purchased.
    pub level: u8,
    /// Upgrade path the tower committed to, if any.
    pub path: Option<UpgradePath>,
    /// Durable stats including every purchased upgrade.
    pub stats: TowerStats,
    /// Stats after the latest aura aggregation.
    pub effective: EffectiveStats,
    /// Seconds until the tower may fire again.
    pub cooldown: f32,
    /// Total money spent on the tower.
    pub invested: u32,
}

impl TowerSnapshot {
    /// Presentation tier derived from the upgrade level.
    #[must_use]
    pub const fn tier(&self) -> u8 {
        match self.level {
            0 => 1,
            1 | 2 => 2,
            _ => 3,
        }
    }

    /// Reports whether the tower ever fires projectiles.
    #[must_use]
    pub fn fires(&self) -> bool {
        self.stats.fire_rate > 0.0
    }

    /// Reports whether the tower fires and its cooldown has elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.fires() && self.effective.fire_rate > 0.0 && self.cooldown <= 0.0
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Distance travelled along the path.
    pub distance: f32,
    /// World-space position on the path.
    pub position: Vec2,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Remaining shield hit points.
    pub shield: f32,
    /// Speed multiplier applied while slowed.
    pub slow_factor: f32,
    /// Seconds of slow remaining.
    pub slow_remaining: f32,
    /// Money credited when the enemy is killed.
    pub reward: u32,
    /// Hit flash intensity in `[0, 1]`.
    pub hit_flash: f32,
    /// Whether the enemy is still in play.
    pub alive: bool,
}

impl EnemySnapshot {
    /// Reports whether towers may still engage the enemy.
    #[must_use]
    pub fn is_living(&self) -> bool {
        self.alive && self.hp > 0.0
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Kind of the firing tower.
    pub kind: TowerKind,
    /// Enemy the projectile tracks.
    pub target: EnemyId,
    /// Current world-space position.
    pub position: Vec2,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Base damage carried by the projectile.
    pub damage: f32,
    /// Additional hits the projectile may still resolve.
    pub pierce_remaining: u32,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Snapshot of the play-through's economy, progression and control flags.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Money available for building and upgrading.
    pub money: u32,
    /// Lives remaining before the base falls.
    pub lives: u32,
    /// Index of the latest wave started, zero before the first wave.
    pub wave: u32,
    /// Number of waves in the play-through.
    pub max_waves: u32,
    /// Accumulated score.
    pub score: u32,
    /// Experience accumulated toward the next level.
    pub xp: u32,
    /// Current player level.
    pub level: u32,
    /// Whether ticks are currently ignored.
    pub paused: bool,
    /// Multiplier applied to every tick's elapsed time.
    pub speed: f32,
    /// Whether a wave is still spawning or has enemies in play.
    pub wave_active: bool,
    /// Seconds of freeze remaining.
    pub freeze_remaining: f32,
    /// Whether the freeze ability was used this wave cycle.
    pub freeze_used: bool,
    /// Whether the storm ability was used this wave cycle.
    pub storm_used: bool,
    /// Terminal state, once reached.
    pub outcome: Option<Outcome>,
    /// Enemies killed with their reward credited.
    pub enemies_killed: u32,
    /// Enemies that reached the end of the path.
    pub enemies_leaked: u32,
}

impl GameStats {
    /// Reports whether the play-through has ended.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The play-through already ended.
    #[error("the game is over")]
    GameOver,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell already hosts a tower.
    #[error("there's already a tower here")]
    Occupied,
    /// The requested cell is part of the enemy path.
    #[error("you can't build on the path")]
    OnPath,
    /// The player cannot afford the tower.
    #[error("not enough money to build that tower")]
    InsufficientFunds,
}

/// Reasons an upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// The play-through already ended.
    #[error("the game is over")]
    GameOver,
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
    /// The tower is locked into the other path.
    #[error("this tower is locked into the other path")]
    WrongPath,
    /// The path is fully upgraded.
    #[error("this path is fully upgraded")]
    Maxed,
    /// The player cannot afford the upgrade.
    #[error("not enough money for upgrade")]
    InsufficientFunds,
}

/// Reasons a sell request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SellError {
    /// The play-through already ended.
    #[error("the game is over")]
    GameOver,
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
}

/// Reasons a wave cannot be started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum WaveStartError {
    /// The play-through already ended.
    #[error("the game is over")]
    GameOver,
    /// A wave is still in progress.
    #[error("a wave is already active")]
    AlreadyActive,
    /// Every wave was already started.
    #[error("no waves remain")]
    MaxWavesReached,
}

/// Reasons a one-shot ability cannot be activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum AbilityError {
    /// The play-through already ended.
    #[error("the game is over")]
    GameOver,
    /// The ability was already used this wave cycle.
    #[error("ability already used this wave")]
    AlreadyUsed,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, TowerKind, TowerSnapshot, TowerStats, UpgradePath};
    use super::{EffectiveStats, TowerId, TowerModifiers};
    use glam::Vec2;

    #[test]
    fn cell_center_sits_in_the_middle_of_the_tile() {
        assert_eq!(CellCoord::new(0, 5).center(40.0), Vec2::new(20.0, 220.0));
        assert_eq!(CellCoord::new(3, 3).center(40.0), Vec2::new(140.0, 140.0));
    }

    #[test]
    fn neutral_modifiers_preserve_stats() {
        let stats = TowerStats::base(TowerKind::Sniper);
        let effective =
            EffectiveStats::from_modifiers(&stats, &TowerModifiers::neutral(TowerId::new(1)));
        assert_eq!(effective, EffectiveStats::unmodified(&stats));
    }

    #[test]
    fn tier_tracks_upgrade_level() {
        let stats = TowerStats::base(TowerKind::Gunner);
        let mut snapshot = TowerSnapshot {
            id: TowerId::new(0),
            kind: TowerKind::Gunner,
            cell: CellCoord::new(1, 1),
            position: Vec2::ZERO,
            level: 0,
            path: None,
            stats,
            effective: EffectiveStats::unmodified(&stats),
            cooldown: 0.0,
            invested: 80,
        };
        assert_eq!(snapshot.tier(), 1);
        snapshot.level = 2;
        snapshot.path = Some(UpgradePath::A);
        assert_eq!(snapshot.tier(), 2);
        snapshot.level = 3;
        assert_eq!(snapshot.tier(), 3);
    }
}
