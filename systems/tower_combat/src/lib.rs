#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use neon_path_core::{Command, TowerId, TowerTarget, TowerView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a command for every tower that is ready to fire.
    ///
    /// Towers with a target receive `Command::FireProjectile`; ready towers
    /// without one receive `Command::HoldFire` so they retry shortly.
    /// Towers that never fire are skipped.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if towers.is_empty() {
            return;
        }

        self.scratch.clear();

        for tower in towers.iter().filter(|snapshot| snapshot.is_ready()) {
            match find_target(tower_targets, tower.id) {
                Some(target) => self.scratch.push(Command::FireProjectile {
                    tower: tower.id,
                    target: target.enemy,
                }),
                None => self.scratch.push(Command::HoldFire { tower: tower.id }),
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_target(targets: &[TowerTarget], tower: TowerId) -> Option<&TowerTarget> {
    targets.iter().find(|target| target.tower == tower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use neon_path_core::{
        CellCoord, EffectiveStats, EnemyId, TowerKind, TowerSnapshot, TowerStats,
    };

    #[test]
    fn ready_towers_fire_at_their_targets() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(2, TowerKind::Gunner, 0.0),
            snapshot(5, TowerKind::Sniper, -0.01),
        ]);
        let targets = vec![target(5, 1), target(2, 4)];
        let mut out = Vec::new();

        system.handle(&towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireProjectile {
                    tower: TowerId::new(2),
                    target: EnemyId::new(4),
                },
                Command::FireProjectile {
                    tower: TowerId::new(5),
                    target: EnemyId::new(1),
                },
            ],
        );
    }

    #[test]
    fn ready_towers_without_target_hold_fire() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(3, TowerKind::Frost, 0.0)]);
        let mut out = Vec::new();

        system.handle(&towers, &[], &mut out);

        assert_eq!(
            out,
            vec![Command::HoldFire {
                tower: TowerId::new(3)
            }]
        );
    }

    #[test]
    fn cooling_and_support_towers_are_skipped() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(3, TowerKind::Gunner, 0.25),
            snapshot(8, TowerKind::Support, 0.0),
        ]);
        let targets = vec![target(3, 9), target(8, 2)];
        let mut out = Vec::new();

        system.handle(&towers, &targets, &mut out);

        assert!(out.is_empty());
    }

    fn snapshot(tower: u32, kind: TowerKind, cooldown: f32) -> TowerSnapshot {
        let stats = TowerStats::base(kind);
        TowerSnapshot {
            id: TowerId::new(tower),
            kind,
            cell: CellCoord::new(tower, 0),
            position: Vec2::ZERO,
            level: 0,
            path: None,
            stats,
            effective: EffectiveStats::unmodified(&stats),
            cooldown,
            invested: kind.definition().cost,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }
    }
}
