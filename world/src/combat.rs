//! Hit resolution: slow, damage multipliers, shields and splash.

use glam::Vec2;
use neon_path_core::{EnemyId, PathModel};
use rand::Rng;

use crate::enemies::{Enemy, EnemyRoster, SLOW_DURATION_SECS};
use crate::projectiles::Payload;

/// Fraction of each hit a shield soaks up while it lasts.
const SHIELD_ABSORPTION: f32 = 0.7;
const BOSS_BONUS_MULTIPLIER: f32 = 1.5;
/// Share of the payload damage dealt to enemies caught in a splash.
const SPLASH_RATIO: f32 = 0.6;
const BURN_SPLASH_DAMAGE: f32 = 3.0;

/// Resolves a direct hit on `enemy`.
///
/// The slow lands first so the frozen bonus sees it, then the damage is
/// computed, partially absorbed by the shield and subtracted from hit points.
pub(crate) fn strike<R: Rng>(enemy: &mut Enemy, payload: &Payload, rng: &mut R) {
    if payload.slow > 0.0 {
        apply_slow(enemy, payload.slow + payload.slow_aura_bonus);
    }
    let damage = computed_damage(enemy, payload, rng);
    let remainder = absorb_with_shield(enemy, damage);
    if remainder > 0.0 {
        enemy.hp -= remainder;
    }
    enemy.hit_flash = 1.0;
}

/// Damages every other living enemy within the payload's splash radius.
///
/// Splash skips slow, crits and shields entirely.
pub(crate) fn splash(
    roster: &mut EnemyRoster,
    path: &PathModel,
    primary: EnemyId,
    impact: Vec2,
    payload: &Payload,
) {
    if payload.splash <= 0.0 {
        return;
    }
    let mut damage = payload.damage * SPLASH_RATIO;
    if payload.burn {
        damage += BURN_SPLASH_DAMAGE;
    }
    for enemy in roster
        .iter_mut()
        .filter(|enemy| enemy.id != primary && enemy.is_living())
    {
        if path.position(enemy.distance).distance(impact) <= payload.splash {
            enemy.hp -= damage;
            enemy.hit_flash = 1.0;
        }
    }
}

fn apply_slow(enemy: &mut Enemy, amount: f32) {
    let factor = (1.0 - amount).clamp(0.0, 1.0);
    enemy.slow_factor = enemy.slow_factor.min(factor);
    enemy.slow_remaining = SLOW_DURATION_SECS;
}

fn computed_damage<R: Rng>(enemy: &Enemy, payload: &Payload, rng: &mut R) -> f32 {
    let mut damage = payload.damage;
    if payload.boss_bonus && enemy.kind.is_boss() {
        damage *= BOSS_BONUS_MULTIPLIER;
    }
    if payload.frozen_bonus > 0.0 && enemy.slow_remaining > 0.0 {
        damage *= 1.0 + payload.frozen_bonus;
    }
    // No draw without a crit chance keeps the stream aligned across towers.
    if payload.crit_chance > 0.0 && rng.gen::<f32>() < payload.crit_chance {
        damage *= payload.crit_multiplier;
    }
    damage
}

fn absorb_with_shield(enemy: &mut Enemy, damage: f32) -> f32 {
    if enemy.shield <= 0.0 {
        return damage;
    }
    let absorbed = (damage * SHIELD_ABSORPTION).min(enemy.shield);
    enemy.shield -= absorbed;
    damage - absorbed
}

#[cfg(test)]
mod tests {
    use neon_path_core::{CellCoord, EnemyKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn payload(damage: f32) -> Payload {
        Payload {
            damage,
            splash: 0.0,
            slow: 0.0,
            slow_aura_bonus: 0.0,
            burn: false,
            boss_bonus: false,
            frozen_bonus: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 1.5,
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn enemy(kind: EnemyKind) -> Enemy {
        Enemy::spawn(EnemyId::new(0), kind, 1)
    }

    #[test]
    fn shields_absorb_seventy_percent_until_depleted() {
        let mut target = enemy(EnemyKind::Shielded);
        target.shield = 10.0;
        let hp = target.hp;

        strike(&mut target, &payload(10.0), &mut rng());
        assert!((target.shield - 3.0).abs() < 1e-4);
        assert!((target.hp - (hp - 3.0)).abs() < 1e-4);

        strike(&mut target, &payload(10.0), &mut rng());
        assert_eq!(target.shield, 0.0);
        assert!((target.hp - (hp - 10.0)).abs() < 1e-4);
    }

    #[test]
    fn slows_keep_the_strongest_factor_and_refresh_duration() {
        let mut target = enemy(EnemyKind::Runner);
        let frost = Payload {
            slow: 0.35,
            slow_aura_bonus: 0.1,
            ..payload(0.0)
        };
        strike(&mut target, &frost, &mut rng());
        assert!((target.slow_factor - 0.55).abs() < 1e-6);
        assert_eq!(target.slow_remaining, SLOW_DURATION_SECS);

        target.slow_remaining = 0.2;
        let weak = Payload {
            slow: 0.15,
            ..payload(0.0)
        };
        strike(&mut target, &weak, &mut rng());
        assert!((target.slow_factor - 0.55).abs() < 1e-6);
        assert_eq!(target.slow_remaining, SLOW_DURATION_SECS);
    }

    #[test]
    fn bosses_take_bonus_damage_only_from_boss_hunters() {
        let hunter = Payload {
            boss_bonus: true,
            ..payload(20.0)
        };
        let mut boss = enemy(EnemyKind::Boss);
        let hp = boss.hp;
        strike(&mut boss, &hunter, &mut rng());
        assert_eq!(boss.hp, hp - 30.0);

        let mut runner = enemy(EnemyKind::Runner);
        let hp = runner.hp;
        strike(&mut runner, &hunter, &mut rng());
        assert_eq!(runner.hp, hp - 20.0);
    }

    #[test]
    fn frozen_bonus_applies_to_slowed_targets() {
        let frost = Payload {
            slow: 0.35,
            frozen_bonus: 0.3,
            ..payload(10.0)
        };
        let mut target = enemy(EnemyKind::Brute);
        let hp = target.hp;
        strike(&mut target, &frost, &mut rng());
        assert!((target.hp - (hp - 13.0)).abs() < 1e-4);
    }

    #[test]
    fn certain_crits_always_multiply() {
        let critical = Payload {
            crit_chance: 1.0,
            crit_multiplier: 2.0,
            ..payload(10.0)
        };
        let mut target = enemy(EnemyKind::Brute);
        let hp = target.hp;
        strike(&mut target, &critical, &mut rng());
        assert_eq!(target.hp, hp - 20.0);
        assert_eq!(target.hit_flash, 1.0);
    }

    #[test]
    fn splash_skips_the_primary_and_distant_enemies() {
        let waypoints = [CellCoord::new(0, 0), CellCoord::new(20, 0)];
        let path = PathModel::from_waypoints(&waypoints, 10.0).expect("valid path");
        let mut roster = EnemyRoster::new();
        let primary = roster.spawn(EnemyKind::Brute, 0);
        let near = roster.spawn(EnemyKind::Brute, 0);
        let far = roster.spawn(EnemyKind::Brute, 0);
        roster.get_mut(primary).expect("primary").distance = 100.0;
        roster.get_mut(near).expect("near").distance = 130.0;
        roster.get_mut(far).expect("far").distance = 190.0;

        let blast = Payload {
            splash: 60.0,
            burn: true,
            ..payload(10.0)
        };
        let impact = path.position(100.0);
        splash(&mut roster, &path, primary, impact, &blast);

        assert_eq!(roster.get(primary).expect("primary").hp, 85.0);
        assert!((roster.get(near).expect("near").hp - (85.0 - 9.0)).abs() < 1e-4);
        assert_eq!(roster.get(far).expect("far").hp, 85.0);
        assert_eq!(roster.get(near).expect("near").hit_flash, 1.0);
        assert_eq!(roster.get(far).expect("far").hit_flash, 0.0);
    }
}
