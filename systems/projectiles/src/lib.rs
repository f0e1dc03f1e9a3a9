#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that steers projectiles toward their targets.

use std::time::Duration;

use glam::Vec2;
use neon_path_core::{Command, EnemyView, ProjectileView};

/// Distance under which a projectile counts as having reached its target.
pub const ARRIVAL_THRESHOLD: f32 = 6.0;

/// Projectile flight system emitting movement, hit and discard commands.
#[derive(Debug, Default)]
pub struct ProjectileFlight {
    scratch: Vec<Command>,
}

impl ProjectileFlight {
    /// Creates a new projectile flight system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one command per projectile in flight.
    ///
    /// Projectiles whose target is gone or dead are discarded, projectiles
    /// within [`ARRIVAL_THRESHOLD`] of their target resolve a hit at the
    /// target's position, and every other projectile homes in on the target
    /// by `speed * dt` without overshooting it.
    pub fn handle(
        &mut self,
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        if projectiles.is_empty() {
            return;
        }

        self.scratch.clear();
        let secs = dt.as_secs_f32();

        for projectile in projectiles.iter() {
            let Some(target) = enemies
                .get(projectile.target)
                .filter(|enemy| enemy.is_living())
            else {
                self.scratch.push(Command::DiscardProjectile {
                    projectile: projectile.id,
                });
                continue;
            };

            let offset = target.position - projectile.position;
            let distance = offset.length();
            if distance < ARRIVAL_THRESHOLD {
                self.scratch.push(Command::ResolveHit {
                    projectile: projectile.id,
                    impact: target.position,
                });
                continue;
            }

            let step = (projectile.speed * secs).min(distance);
            let to = projectile.position + offset / distance * step;
            self.scratch.push(Command::MoveProjectile {
                projectile: projectile.id,
                to: sanitize(to, projectile.position),
            });
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn sanitize(candidate: Vec2, fallback: Vec2) -> Vec2 {
    if candidate.is_finite() {
        candidate
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_path_core::{
        EnemyId, EnemyKind, EnemySnapshot, ProjectileId, ProjectileSnapshot, TowerId, TowerKind,
    };

    fn projectile(id: u32, target: u32, position: Vec2) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(id),
            tower: TowerId::new(0),
            kind: TowerKind::Gunner,
            target: EnemyId::new(target),
            position,
            speed: 260.0,
            damage: 10.0,
            pierce_remaining: 0,
        }
    }

    fn enemy(id: u32, position: Vec2) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Runner,
            distance: 0.0,
            position,
            hp: 40.0,
            max_hp: 40.0,
            shield: 0.0,
            slow_factor: 1.0,
            slow_remaining: 0.0,
            reward: 10,
            hit_flash: 0.0,
            alive: true,
        }
    }

    fn run(projectiles: Vec<ProjectileSnapshot>, enemies: Vec<EnemySnapshot>) -> Vec<Command> {
        let mut system = ProjectileFlight::new();
        let mut out = Vec::new();
        system.handle(
            &ProjectileView::from_snapshots(projectiles),
            &EnemyView::from_snapshots(enemies),
            Duration::from_millis(100),
            &mut out,
        );
        out
    }

    #[test]
    fn projectiles_home_in_at_their_speed() {
        let out = run(
            vec![projectile(0, 1, Vec2::ZERO)],
            vec![enemy(1, Vec2::new(100.0, 0.0))],
        );
        let [Command::MoveProjectile { projectile, to }] = out.as_slice() else {
            panic!("expected a single move, got {out:?}");
        };
        assert_eq!(*projectile, ProjectileId::new(0));
        assert!((to.x - 26.0).abs() < 1e-4);
        assert_eq!(to.y, 0.0);
    }

    #[test]
    fn close_projectiles_hit_at_the_target_position() {
        let out = run(
            vec![projectile(0, 1, Vec2::new(95.0, 0.0))],
            vec![enemy(1, Vec2::new(100.0, 0.0))],
        );
        assert_eq!(
            out,
            vec![Command::ResolveHit {
                projectile: ProjectileId::new(0),
                impact: Vec2::new(100.0, 0.0),
            }]
        );
    }

    #[test]
    fn coincident_projectiles_hit_without_dividing_by_zero() {
        let out = run(
            vec![projectile(0, 1, Vec2::new(5.0, 5.0))],
            vec![enemy(1, Vec2::new(5.0, 5.0))],
        );
        assert!(matches!(out.as_slice(), [Command::ResolveHit { .. }]));
    }

    #[test]
    fn moves_never_overshoot_the_target() {
        let out = run(
            vec![projectile(0, 1, Vec2::ZERO)],
            vec![enemy(1, Vec2::new(0.0, 10.0))],
        );
        assert_eq!(
            out,
            vec![Command::MoveProjectile {
                projectile: ProjectileId::new(0),
                to: Vec2::new(0.0, 10.0),
            }]
        );
    }

    #[test]
    fn projectiles_with_missing_or_dead_targets_are_discarded() {
        let mut dead = enemy(2, Vec2::ZERO);
        dead.hp = -3.0;
        let out = run(
            vec![
                projectile(0, 1, Vec2::ZERO),
                projectile(1, 2, Vec2::ZERO),
            ],
            vec![dead],
        );
        assert_eq!(
            out,
            vec![
                Command::DiscardProjectile {
                    projectile: ProjectileId::new(0),
                },
                Command::DiscardProjectile {
                    projectile: ProjectileId::new(1),
                },
            ]
        );
    }
}
