//! Projectiles in flight and the payload they deliver.

use glam::Vec2;
use neon_path_core::{EnemyId, ProjectileId, ProjectileSnapshot, TowerId, TowerKind};

use crate::towers::TowerState;

/// Travel speed of every projectile in world units per second.
pub(crate) const PROJECTILE_SPEED: f32 = 260.0;

/// Combat properties captured from the firing tower at launch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Payload {
    pub(crate) damage: f32,
    pub(crate) splash: f32,
    pub(crate) slow: f32,
    pub(crate) slow_aura_bonus: f32,
    pub(crate) burn: bool,
    pub(crate) boss_bonus: bool,
    pub(crate) frozen_bonus: f32,
    pub(crate) crit_chance: f32,
    pub(crate) crit_multiplier: f32,
}

impl Payload {
    pub(crate) fn from_tower(tower: &TowerState) -> Self {
        Self {
            damage: tower.effective.damage,
            splash: tower.stats.splash,
            slow: tower.stats.slow,
            slow_aura_bonus: tower.effective.slow_aura_bonus,
            burn: tower.stats.burn,
            boss_bonus: tower.stats.boss_bonus,
            frozen_bonus: tower.stats.frozen_bonus,
            crit_chance: tower.stats.crit_chance,
            crit_multiplier: tower.stats.crit_multiplier,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) target: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) payload: Payload,
    pub(crate) pierce_remaining: u32,
    /// Radius, measured from the latest impact, searched for a pierce follow-up.
    pub(crate) reach: f32,
    /// Enemies already hit, never re-targeted by a piercing shot.
    pub(crate) struck: Vec<EnemyId>,
    pub(crate) spent: bool,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            kind: self.kind,
            target: self.target,
            position: self.position,
            speed: PROJECTILE_SPEED,
            damage: self.payload.damage,
            pierce_remaining: self.pierce_remaining,
        }
    }
}

/// Projectiles in firing order; spent entries linger until compaction.
#[derive(Debug)]
pub(crate) struct ProjectileStore {
    projectiles: Vec<Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectileStore {
    pub(crate) fn new() -> Self {
        Self {
            projectiles: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    /// Launches a projectile from `tower` toward `target`.
    pub(crate) fn launch(&mut self, tower: &TowerState, target: EnemyId) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        self.projectiles.push(Projectile {
            id,
            tower: tower.id,
            kind: tower.kind,
            target,
            position: tower.position,
            payload: Payload::from_tower(tower),
            pierce_remaining: tower.stats.pierce,
            reach: tower.effective.range,
            struck: Vec::new(),
            spent: false,
        });
        id
    }

    /// Looks up a projectile that is still in flight.
    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.projectiles
            .binary_search_by_key(&id, |projectile| projectile.id)
            .ok()
            .map(move |index| &mut self.projectiles[index])
            .filter(|projectile| !projectile.spent)
    }

    pub(crate) fn in_flight(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles
            .iter()
            .filter(|projectile| !projectile.spent)
    }

    /// Flags the projectile for removal at the end of the tick.
    pub(crate) fn discard(&mut self, id: ProjectileId) {
        if let Some(projectile) = self.get_mut(id) {
            projectile.spent = true;
        }
    }

    pub(crate) fn compact(&mut self) {
        self.projectiles.retain(|projectile| !projectile.spent);
    }
}

#[cfg(test)]
mod tests {
    use neon_path_core::CellCoord;

    use super::*;
    use crate::towers::TowerRegistry;

    #[test]
    fn launched_projectiles_start_at_the_tower_with_its_payload() {
        let mut registry = TowerRegistry::new();
        let tower_id = registry.insert(
            TowerKind::Frost,
            CellCoord::new(4, 4),
            CellCoord::new(4, 4).center(40.0),
        );
        let tower = registry.get(tower_id).expect("tower exists");

        let mut store = ProjectileStore::new();
        let id = store.launch(tower, EnemyId::new(3));
        let projectile = store.get_mut(id).expect("in flight");
        assert_eq!(projectile.position, Vec2::new(180.0, 180.0));
        assert_eq!(projectile.payload.slow, 0.35);
        assert_eq!(projectile.payload.splash, 40.0);
        assert_eq!(projectile.reach, 150.0);
    }

    #[test]
    fn discarded_projectiles_leave_flight_then_the_store() {
        let mut registry = TowerRegistry::new();
        let tower_id = registry.insert(TowerKind::Gunner, CellCoord::new(0, 0), Vec2::ZERO);
        let tower = registry.get(tower_id).expect("tower exists");

        let mut store = ProjectileStore::new();
        let first = store.launch(tower, EnemyId::new(0));
        let second = store.launch(tower, EnemyId::new(1));
        store.discard(first);

        assert!(store.get_mut(first).is_none());
        assert_eq!(store.in_flight().count(), 1);
        store.compact();
        assert_eq!(store.projectiles.len(), 1);
        assert!(store.get_mut(second).is_some());
    }
}
