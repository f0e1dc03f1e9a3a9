#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that aggregates aura and global bonuses into tower modifiers.
//!
//! Modifiers are rebuilt from scratch on every call so the result depends
//! only on the towers currently standing on the map.

use glam::Vec2;
use neon_path_core::{Aura, TowerId, TowerModifiers, TowerView};

/// Damage and fire rate bonus granted to every tower per global buff source.
pub const GLOBAL_BUFF_BONUS: f32 = 0.05;
/// Slow bonus granted to every tower per global slow source.
pub const GLOBAL_SLOW_BONUS: f32 = 0.05;

/// Aura aggregation system reusing a scratch buffer of aura sources.
#[derive(Debug, Default)]
pub struct Auras {
    sources: Vec<AuraSource>,
}

impl Auras {
    /// Creates a new aura system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes one [`TowerModifiers`] entry per tower, in tower order.
    ///
    /// An aura source reaches every other tower within its own durable range;
    /// sources never buff themselves. Global buffs and global slows reach
    /// every tower on the map, their sources included.
    pub fn handle(&mut self, towers: &TowerView, out: &mut Vec<TowerModifiers>) {
        out.clear();
        if towers.is_empty() {
            return;
        }

        self.sources.clear();
        let mut global = Aura::NONE;
        for tower in towers.iter() {
            if tower.stats.global_buff {
                global.damage += GLOBAL_BUFF_BONUS;
                global.fire_rate += GLOBAL_BUFF_BONUS;
            }
            if tower.stats.global_slow {
                global.slow += GLOBAL_SLOW_BONUS;
            }
            if tower.stats.projects_aura(tower.kind) {
                self.sources.push(AuraSource {
                    tower: tower.id,
                    position: tower.position,
                    range: tower.stats.range,
                    aura: tower.stats.aura,
                });
            }
        }

        out.reserve(towers.len());
        for tower in towers.iter() {
            let mut modifiers = TowerModifiers::neutral(tower.id);
            for source in &self.sources {
                if source.tower == tower.id {
                    continue;
                }
                if source.position.distance(tower.position) <= source.range {
                    add(&mut modifiers, &source.aura);
                }
            }
            add(&mut modifiers, &global);
            out.push(modifiers);
        }
    }
}

fn add(modifiers: &mut TowerModifiers, aura: &Aura) {
    modifiers.damage += aura.damage;
    modifiers.fire_rate += aura.fire_rate;
    modifiers.range += aura.range;
    modifiers.slow_aura_bonus += aura.slow;
}

#[derive(Clone, Copy, Debug)]
struct AuraSource {
    tower: TowerId,
    position: Vec2,
    range: f32,
    aura: Aura,
}
