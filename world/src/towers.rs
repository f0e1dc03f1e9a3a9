//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::Vec2;
use neon_path_core::{
    CellCoord, EffectiveStats, TowerId, TowerKind, TowerModifiers, TowerSnapshot, TowerStats,
    UpgradeError, UpgradePath, UpgradeStep, MAX_UPGRADE_LEVEL,
};

/// Seconds a ready tower waits before searching for a target again.
pub(crate) const RETRY_COOLDOWN_SECS: f32 = 0.1;

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// World-space center of the occupied cell.
    pub(crate) position: Vec2,
    pub(crate) level: u8,
    pub(crate) path: Option<UpgradePath>,
    pub(crate) stats: TowerStats,
    pub(crate) effective: EffectiveStats,
    /// Aura modifiers received during the latest aggregation.
    modifiers: TowerModifiers,
    pub(crate) cooldown: f32,
    pub(crate) invested: u32,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, cell: CellCoord, position: Vec2) -> Self {
        let stats = TowerStats::base(kind);
        Self {
            id,
            kind,
            cell,
            position,
            level: 0,
            path: None,
            stats,
            effective: EffectiveStats::unmodified(&stats),
            modifiers: TowerModifiers::neutral(id),
            cooldown: 0.0,
            invested: kind.definition().cost,
        }
    }

    /// Resolves the next tier on `path`, honouring the path lock and the cap.
    pub(crate) fn next_upgrade(
        &self,
        path: UpgradePath,
    ) -> Result<&'static UpgradeStep, UpgradeError> {
        if self.path.is_some_and(|locked| locked != path) {
            return Err(UpgradeError::WrongPath);
        }
        if self.level >= MAX_UPGRADE_LEVEL {
            return Err(UpgradeError::Maxed);
        }
        self.kind
            .upgrade(path, self.level)
            .ok_or(UpgradeError::Maxed)
    }

    /// Commits a purchased tier, folding its changes into the durable stats.
    pub(crate) fn commit_upgrade(&mut self, path: UpgradePath, step: &UpgradeStep) {
        self.path = Some(path);
        self.level += 1;
        self.invested = self.invested.saturating_add(step.cost);
        for change in step.changes {
            self.stats.apply(change);
        }
        self.effective = EffectiveStats::from_modifiers(&self.stats, &self.modifiers);
    }

    /// Refund credited when the tower is sold: 70% of everything invested.
    pub(crate) fn refund(&self) -> u32 {
        self.invested * 7 / 10
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            level: self.level,
            path: self.path,
            stats: self.stats,
            effective: self.effective,
            cooldown: self.cooldown,
            invested: self.invested,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    by_cell: BTreeMap<CellCoord, TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_cell: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a freshly built tower and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self
            .entries
            .insert(id, TowerState::new(id, kind, cell, position));
        let _ = self.by_cell.insert(cell, id);
        id
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        let removed = self.entries.remove(&id)?;
        let _ = self.by_cell.remove(&removed.cell);
        Some(removed)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Identifier of the tower occupying `cell`, if any.
    pub(crate) fn at_cell(&self, cell: CellCoord) -> Option<TowerId> {
        self.by_cell.get(&cell).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Replaces every tower's effective stats with the provided modifiers.
    ///
    /// Towers missing from `modifiers` revert to their durable stats.
    pub(crate) fn apply_modifiers(&mut self, modifiers: &[TowerModifiers]) {
        for tower in self.entries.values_mut() {
            tower.modifiers = TowerModifiers::neutral(tower.id);
            tower.effective = EffectiveStats::unmodified(&tower.stats);
        }
        for entry in modifiers {
            if let Some(tower) = self.entries.get_mut(&entry.tower) {
                tower.modifiers = *entry;
                tower.effective = EffectiveStats::from_modifiers(&tower.stats, entry);
            }
        }
    }

    /// Counts down every firing tower's cooldown.
    pub(crate) fn cool_down(&mut self, dt: f32) {
        for tower in self.entries.values_mut() {
            if tower.stats.fire_rate > 0.0 {
                tower.cooldown -= dt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_gunner() -> (TowerRegistry, TowerId) {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(
            TowerKind::Gunner,
            CellCoord::new(2, 4),
            CellCoord::new(2, 4).center(40.0),
        );
        (registry, id)
    }

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn cell_index_tracks_insertions_and_removals() {
        let (mut registry, id) = registry_with_gunner();
        assert_eq!(registry.at_cell(CellCoord::new(2, 4)), Some(id));

        let removed = registry.remove(id).expect("tower exists");
        assert_eq!(removed.id, id);
        assert_eq!(registry.at_cell(CellCoord::new(2, 4)), None);
        assert!(registry.remove(id).is_none());
    }

    #[test]
    fn identifiers_are_never_reused() {
        let (mut registry, first) = registry_with_gunner();
        let _ = registry.remove(first);
        let second = registry.insert(TowerKind::Frost, CellCoord::new(2, 4), Vec2::ZERO);
        assert!(second > first);
    }

    #[test]
    fn first_upgrade_locks_the_path() {
        let (mut registry, id) = registry_with_gunner();
        let tower = registry.get_mut(id).expect("tower exists");
        let step = tower.next_upgrade(UpgradePath::A).expect("tier available");
        tower.commit_upgrade(UpgradePath::A, step);

        assert_eq!(tower.level, 1);
        assert_eq!(tower.invested, 140);
        assert_eq!(
            tower.next_upgrade(UpgradePath::B).unwrap_err(),
            UpgradeError::WrongPath
        );
    }

    #[test]
    fn upgrades_stop_at_the_maximum_level() {
        let (mut registry, id) = registry_with_gunner();
        let tower = registry.get_mut(id).expect("tower exists");
        for _ in 0..MAX_UPGRADE_LEVEL {
            let step = tower.next_upgrade(UpgradePath::B).expect("tier available");
            tower.commit_upgrade(UpgradePath::B, step);
        }
        assert_eq!(
            tower.next_upgrade(UpgradePath::B).unwrap_err(),
            UpgradeError::Maxed
        );
        assert_eq!(tower.invested, 80 + 60 + 90 + 120);
        assert_eq!(tower.refund(), 245);
    }

    #[test]
    fn missing_modifiers_revert_to_durable_stats() {
        let (mut registry, id) = registry_with_gunner();
        registry.apply_modifiers(&[TowerModifiers {
            damage: 1.5,
            ..TowerModifiers::neutral(id)
        }]);
        assert_eq!(registry.get(id).expect("tower").effective.damage, 15.0);

        registry.apply_modifiers(&[]);
        assert_eq!(registry.get(id).expect("tower").effective.damage, 10.0);
    }

    #[test]
    fn upgrades_refresh_effective_stats_under_current_auras() {
        let (mut registry, id) = registry_with_gunner();
        assert_eq!(registry.get(id).expect("tower").effective.range, 130.0);
        registry.apply_modifiers(&[TowerModifiers {
            range: 1.1,
            ..TowerModifiers::neutral(id)
        }]);

        let tower = registry.get_mut(id).expect("tower exists");
        let step = tower.next_upgrade(UpgradePath::B).expect("tier available");
        tower.commit_upgrade(UpgradePath::B, step);

        assert!((tower.effective.range - 130.0 * 1.3 * 1.1).abs() < 1e-3);
        assert_eq!(tower.snapshot().effective, tower.effective);
    }

    #[test]
    fn support_towers_never_count_down() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(TowerKind::Support, CellCoord::new(0, 0), Vec2::ZERO);
        registry.cool_down(5.0);
        assert_eq!(registry.get(id).expect("tower").cooldown, 0.0);
    }
}
