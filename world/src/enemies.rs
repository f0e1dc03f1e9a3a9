//! Enemy storage, motion and status decay.

use neon_path_core::{EnemyId, EnemyKind, EnemySnapshot, PathModel};

/// Seconds a slow lasts after the latest slowing hit.
pub(crate) const SLOW_DURATION_SECS: f32 = 1.2;
/// Speed multiplier applied to every enemy while freeze is active.
pub(crate) const FREEZE_SPEED_FACTOR: f32 = 0.35;
/// Seconds between two regeneration pulses.
const REGEN_INTERVAL_SECS: f32 = 1.2;
/// Hit points restored per regeneration pulse.
const REGEN_AMOUNT: f32 = 4.0;
/// Hit flash intensity lost per second.
const HIT_FLASH_DECAY_PER_SEC: f32 = 1.2;

/// Authoritative state of a single enemy.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) distance: f32,
    pub(crate) speed: f32,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) shield: f32,
    pub(crate) slow_factor: f32,
    pub(crate) slow_remaining: f32,
    pub(crate) regen_timer: f32,
    pub(crate) reward: u32,
    pub(crate) alive: bool,
    pub(crate) hit_flash: f32,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, wave: u32) -> Self {
        let stats = kind.stats_for_wave(wave);
        Self {
            id,
            kind,
            distance: 0.0,
            speed: stats.speed,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            shield: stats.shield,
            slow_factor: 1.0,
            slow_remaining: 0.0,
            regen_timer: 0.0,
            reward: stats.reward,
            alive: true,
            hit_flash: 0.0,
        }
    }

    /// Alive and above zero hit points; only such enemies can be engaged.
    pub(crate) fn is_living(&self) -> bool {
        self.alive && self.hp > 0.0
    }

    pub(crate) fn snapshot(&self, path: &PathModel) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            distance: self.distance,
            position: path.position(self.distance),
            hp: self.hp,
            max_hp: self.max_hp,
            shield: self.shield,
            slow_factor: self.slow_factor,
            slow_remaining: self.slow_remaining,
            reward: self.reward,
            hit_flash: self.hit_flash,
            alive: self.alive,
        }
    }

    fn advance(&mut self, dt: f32, freeze_active: bool) {
        let mut speed = self.speed;
        if self.slow_remaining > 0.0 {
            self.slow_remaining = (self.slow_remaining - dt).max(0.0);
            speed *= self.slow_factor;
        } else {
            self.slow_factor = 1.0;
        }
        if freeze_active {
            speed *= FREEZE_SPEED_FACTOR;
        }
        self.distance += speed.max(0.0) * dt;
        self.hit_flash = (self.hit_flash - HIT_FLASH_DECAY_PER_SEC * dt).max(0.0);
    }

    fn regenerate(&mut self, dt: f32) {
        if self.kind != EnemyKind::Regenerator || self.hp <= 0.0 {
            return;
        }
        self.regen_timer += dt;
        if self.regen_timer > REGEN_INTERVAL_SECS {
            self.regen_timer = 0.0;
            self.hp = (self.hp + REGEN_AMOUNT).min(self.max_hp);
        }
    }
}

/// Enemy that reached the end of the path during a motion step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Leak {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
}

/// Ordered collection of enemies; iteration follows spawn order.
#[derive(Debug)]
pub(crate) struct EnemyRoster {
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyRoster {
    pub(crate) fn new() -> Self {
        Self {
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn spawn(&mut self, kind: EnemyKind, wave: u32) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        self.enemies.push(Enemy::spawn(id, kind, wave));
        id
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.index(id).map(|index| &self.enemies[index])
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.index(id).map(move |index| &mut self.enemies[index])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Moves every alive enemy, decays its statuses and reports leaks.
    ///
    /// Leaked enemies are flagged dead but stay in the roster until
    /// [`EnemyRoster::compact`] runs at the end of the tick.
    pub(crate) fn advance(
        &mut self,
        dt: f32,
        freeze_active: bool,
        path_length: f32,
        leaks: &mut Vec<Leak>,
    ) {
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.alive) {
            enemy.advance(dt, freeze_active);
            if enemy.distance >= path_length {
                enemy.distance = path_length;
                enemy.alive = false;
                leaks.push(Leak {
                    id: enemy.id,
                    kind: enemy.kind,
                });
                continue;
            }
            enemy.regenerate(dt);
        }
    }

    /// Drops every enemy that died or dropped to zero hit points.
    pub(crate) fn compact(&mut self) {
        self.enemies.retain(Enemy::is_living);
    }

    fn index(&self, id: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&id, |enemy| enemy.id)
            .ok()
    }
}
