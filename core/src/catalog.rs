//! Tower and enemy definitions together with the upgrade effect table.
//!
//! Upgrades are data: every `(kind, path, tier)` triple maps to an
//! [`UpgradeStep`] whose [`StatChange`] list is folded into the tower's
//! [`TowerStats`] by [`TowerStats::apply`]. Multiplicative changes compound
//! across tiers.

use serde::{Deserialize, Serialize};

use crate::UpgradePath;

/// Highest upgrade level a tower can reach on either path.
pub const MAX_UPGRADE_LEVEL: u8 = 3;

/// Crit multiplier used when a tower never configured its own.
pub const DEFAULT_CRIT_MULTIPLIER: f32 = 1.5;

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Balanced, cheap single-target tower.
    Gunner,
    /// Long-range, high-damage single-target tower.
    Sniper,
    /// Area damage tower, presented as the "Blaster".
    Splash,
    /// Slowing area tower.
    Frost,
    /// Non-firing aura tower, presented as the "Relay".
    Support,
}

/// Every tower kind in menu order.
pub const ALL_TOWER_KINDS: [TowerKind; 5] = [
    TowerKind::Gunner,
    TowerKind::Sniper,
    TowerKind::Splash,
    TowerKind::Frost,
    TowerKind::Support,
];

/// Base stats and price of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerDefinition {
    /// Purchase price.
    pub cost: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Damage per projectile.
    pub damage: f32,
    /// Shots per second; zero for towers that never fire.
    pub fire_rate: f32,
    /// Splash radius in world units.
    pub splash: f32,
    /// Slow applied on hit, as a fraction of speed removed.
    pub slow: f32,
}

impl TowerKind {
    /// Display name shown to players.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gunner => "Gunner",
            Self::Sniper => "Sniper",
            Self::Splash => "Blaster",
            Self::Frost => "Frost",
            Self::Support => "Relay",
        }
    }

    /// Base stats and price of the kind.
    #[must_use]
    pub const fn definition(self) -> TowerDefinition {
        match self {
            Self::Gunner => TowerDefinition {
                cost: 80,
                range: 130.0,
                damage: 10.0,
                fire_rate: 1.8,
                splash: 0.0,
                slow: 0.0,
            },
            Self::Sniper => TowerDefinition {
                cost: 140,
                range: 240.0,
                damage: 28.0,
                fire_rate: 0.65,
                splash: 0.0,
                slow: 0.0,
            },
            Self::Splash => TowerDefinition {
                cost: 130,
                range: 150.0,
                damage: 14.0,
                fire_rate: 1.2,
                splash: 60.0,
                slow: 0.0,
            },
            Self::Frost => TowerDefinition {
                cost: 120,
                range: 150.0,
                damage: 6.0,
                fire_rate: 1.5,
                splash: 40.0,
                slow: 0.35,
            },
            Self::Support => TowerDefinition {
                cost: 160,
                range: 110.0,
                damage: 0.0,
                fire_rate: 0.0,
                splash: 0.0,
                slow: 0.0,
            },
        }
    }

    /// Upgrade purchased when a tower at `level` advances along `path`.
    ///
    /// Returns `None` once the level reaches [`MAX_UPGRADE_LEVEL`].
    #[must_use]
    pub fn upgrade(self, path: UpgradePath, level: u8) -> Option<&'static UpgradeStep> {
        let tiers = &UPGRADE_TABLE[self.table_index()][path_index(path)];
        tiers.get(usize::from(level))
    }

    const fn table_index(self) -> usize {
        match self {
            Self::Gunner => 0,
            Self::Sniper => 1,
            Self::Splash => 2,
            Self::Frost => 3,
            Self::Support => 4,
        }
    }
}

const fn path_index(path: UpgradePath) -> usize {
    match path {
        UpgradePath::A => 0,
        UpgradePath::B => 1,
    }
}

/// Stat bonuses a tower projects onto other towers within its range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aura {
    /// Additive damage multiplier bonus.
    pub damage: f32,
    /// Additive fire rate multiplier bonus.
    pub fire_rate: f32,
    /// Additive range multiplier bonus.
    pub range: f32,
    /// Additive slow carried by the buffed tower's projectiles.
    pub slow: f32,
}

impl Aura {
    /// Aura that contributes nothing.
    pub const NONE: Self = Self {
        damage: 0.0,
        fire_rate: 0.0,
        range: 0.0,
        slow: 0.0,
    };

    /// Reports whether the aura changes anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != Self::NONE
    }

    fn accumulate(&mut self, other: &Aura) {
        self.damage += other.damage;
        self.fire_rate += other.fire_rate;
        self.range += other.range;
        self.slow += other.slow;
    }
}

/// Single transformation applied to a tower's stats by an upgrade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatChange {
    /// Multiplies damage.
    ScaleDamage(f32),
    /// Multiplies fire rate.
    ScaleFireRate(f32),
    /// Multiplies range.
    ScaleRange(f32),
    /// Multiplies splash radius.
    ScaleSplash(f32),
    /// Adds to the slow amount.
    AddSlow(f32),
    /// Raises the slow amount to at least the given value.
    RaiseSlow(f32),
    /// Raises pierce to at least the given count.
    RaisePierce(u32),
    /// Grants critical hits.
    Crit {
        /// Probability of a crit per hit.
        chance: f32,
        /// Damage multiplier on a crit.
        multiplier: f32,
    },
    /// Adds flat burn damage to splash hits.
    Burn,
    /// Deals bonus damage to bosses.
    BossBonus,
    /// Deals bonus damage to slowed targets.
    FrozenBonus(f32),
    /// Adds to the aura projected onto nearby towers.
    AddAura(Aura),
    /// Grants a small buff to every tower on the map.
    GlobalBuff,
    /// Grants a small slow bonus to every tower on the map.
    GlobalSlow,
}

/// One purchasable tier on an upgrade path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeStep {
    /// Price of the tier.
    pub cost: u32,
    /// Changes applied to the tower, in order.
    pub changes: &'static [StatChange],
    /// Short description for presentation.
    pub summary: &'static str,
}

const fn step(cost: u32, changes: &'static [StatChange], summary: &'static str) -> UpgradeStep {
    UpgradeStep {
        cost,
        changes,
        summary,
    }
}

const fn aura(damage: f32, fire_rate: f32, range: f32, slow: f32) -> StatChange {
    StatChange::AddAura(Aura {
        damage,
        fire_rate,
        range,
        slow,
    })
}

use StatChange::{
    BossBonus, Burn, FrozenBonus, GlobalBuff, GlobalSlow, RaisePierce, RaiseSlow, ScaleDamage,
    ScaleFireRate, ScaleRange, ScaleSplash,
};

const UPGRADE_TABLE: [[[UpgradeStep; 3]; 2]; 5] = [
    // Gunner
    [
        [
            step(60, &[ScaleDamage(1.25), ScaleFireRate(1.1)], "+25% dmg, +10% fire rate"),
            step(90, &[ScaleDamage(1.25), ScaleFireRate(1.1)], "+25% dmg, +10% fire rate"),
            step(
                120,
                &[StatChange::Crit {
                    chance: 0.25,
                    multiplier: 2.0,
                }],
                "Big crit chance vs all enemies",
            ),
        ],
        [
            step(60, &[ScaleRange(1.3)], "+30% range"),
            step(90, &[ScaleRange(1.2), RaiseSlow(0.15)], "+20% range, +small slow"),
            step(120, &[aura(0.12, 0.0, 0.1, 0.0)], "Becomes mini support (range aura)"),
        ],
    ],
    // Sniper
    [
        [
            step(90, &[ScaleDamage(1.4)], "+40% dmg"),
            step(120, &[ScaleDamage(1.4), ScaleFireRate(1.1)], "+40% dmg, +10% fire rate"),
            step(160, &[BossBonus], "Bonus vs bosses & tanks"),
        ],
        [
            step(90, &[ScaleRange(1.25)], "+25% range"),
            step(120, &[ScaleRange(1.15), RaisePierce(1)], "+15% range, slight pierce"),
            step(160, &[RaisePierce(2)], "Shots pierce multiple enemies"),
        ],
    ],
    // Splash
    [
        [
            step(80, &[ScaleSplash(1.3)], "+30% splash radius"),
            step(110, &[ScaleSplash(1.3), ScaleDamage(1.3)], "+30% dmg, +radius"),
            step(150, &[ScaleSplash(1.4)], "Huge splash & hit flash"),
        ],
        [
            step(80, &[ScaleFireRate(1.15), ScaleDamage(1.15)], "+fire rate"),
            step(
                110,
                &[ScaleFireRate(1.15), ScaleDamage(1.15), Burn],
                "+fire rate, small burn dmg",
            ),
            step(150, &[Burn, ScaleDamage(1.3)], "Burn over time on hit"),
        ],
    ],
    // Frost
    [
        [
            step(80, &[StatChange::AddSlow(0.1)], "+slow amount"),
            step(110, &[StatChange::AddSlow(0.1), ScaleSplash(1.2)], "+slow & +radius"),
            step(150, &[GlobalSlow], "Massive slow aura"),
        ],
        [
            step(80, &[ScaleDamage(1.3)], "+damage"),
            step(110, &[ScaleDamage(1.2), ScaleFireRate(1.1)], "+damage & fire rate"),
            step(150, &[FrozenBonus(0.3)], "Frozen enemies take bonus dmg"),
        ],
    ],
    // Support
    [
        [
            step(90, &[aura(0.15, 0.0, 0.0, 0.0)], "+dmg aura strength"),
            step(130, &[aura(0.0, 0.15, 0.0, 0.0)], "+fire rate aura"),
            step(
                170,
                &[ScaleRange(1.3), aura(0.1, 0.1, 0.0, 0.0)],
                "Big range & strong aura",
            ),
        ],
        [
            step(90, &[aura(0.0, 0.0, 0.15, 0.0)], "+range aura"),
            step(130, &[aura(0.0, 0.0, 0.15, 0.1)], "More range & small slow aura"),
            step(170, &[GlobalBuff], "Global tiny buff"),
        ],
    ],
];

/// Durable tower stats: base values with every purchased upgrade folded in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Targeting radius in world units.
    pub range: f32,
    /// Damage per projectile.
    pub damage: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Splash radius in world units.
    pub splash: f32,
    /// Slow applied on hit.
    pub slow: f32,
    /// Additional hits each projectile may resolve.
    pub pierce: u32,
    /// Probability of a crit per hit.
    pub crit_chance: f32,
    /// Damage multiplier on a crit.
    pub crit_multiplier: f32,
    /// Whether splash hits deal flat burn damage.
    pub burn: bool,
    /// Whether hits deal bonus damage to bosses.
    pub boss_bonus: bool,
    /// Bonus damage fraction against slowed targets.
    pub frozen_bonus: f32,
    /// Aura projected onto nearby towers.
    pub aura: Aura,
    /// Whether the tower buffs every tower on the map.
    pub global_buff: bool,
    /// Whether the tower grants a map-wide slow bonus.
    pub global_slow: bool,
}

impl TowerStats {
    /// Stats of a freshly placed tower of the provided kind.
    #[must_use]
    pub const fn base(kind: TowerKind) -> Self {
        let definition = kind.definition();
        Self {
            range: definition.range,
            damage: definition.damage,
            fire_rate: definition.fire_rate,
            splash: definition.splash,
            slow: definition.slow,
            pierce: 0,
            crit_chance: 0.0,
            crit_multiplier: DEFAULT_CRIT_MULTIPLIER,
            burn: false,
            boss_bonus: false,
            frozen_bonus: 0.0,
            aura: Aura::NONE,
            global_buff: false,
            global_slow: false,
        }
    }

    /// Folds a single upgrade change into the stats.
    pub fn apply(&mut self, change: &StatChange) {
        match *change {
            StatChange::ScaleDamage(factor) => self.damage *= factor,
            StatChange::ScaleFireRate(factor) => self.fire_rate *= factor,
            StatChange::ScaleRange(factor) => self.range *= factor,
            StatChange::ScaleSplash(factor) => self.splash *= factor,
            StatChange::AddSlow(amount) => self.slow += amount,
            StatChange::RaiseSlow(amount) => self.slow = self.slow.max(amount),
            StatChange::RaisePierce(count) => self.pierce = self.pierce.max(count),
            StatChange::Crit { chance, multiplier } => {
                self.crit_chance = chance;
                self.crit_multiplier = multiplier;
            }
            StatChange::Burn => self.burn = true,
            StatChange::BossBonus => self.boss_bonus = true,
            StatChange::FrozenBonus(bonus) => self.frozen_bonus = bonus,
            StatChange::AddAura(ref aura) => self.aura.accumulate(aura),
            StatChange::GlobalBuff => self.global_buff = true,
            StatChange::GlobalSlow => self.global_slow = true,
        }
    }

    /// Reports whether the tower projects its aura onto neighbours.
    #[must_use]
    pub fn projects_aura(&self, kind: TowerKind) -> bool {
        kind == TowerKind::Support || self.aura.is_active()
    }
}

/// Types of enemies that travel the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Baseline enemy.
    Runner,
    /// Fast, fragile enemy.
    Sprinter,
    /// Slow, durable enemy.
    Brute,
    /// Weak enemy that arrives in numbers.
    Swarm,
    /// Enemy that heals over time.
    Regenerator,
    /// Enemy protected by a shield buffer.
    Shielded,
    /// Wave boss.
    Boss,
}

/// Per-spawn stats of an enemy after wave scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Shield hit points at spawn.
    pub shield: f32,
    /// Money credited on kill.
    pub reward: u32,
}

impl EnemyKind {
    /// Display name shown to players.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Runner => "Runner",
            Self::Sprinter => "Sprinter",
            Self::Brute => "Brute",
            Self::Swarm => "Swarm",
            Self::Regenerator => "Regenerator",
            Self::Shielded => "Shielded",
            Self::Boss => "Boss",
        }
    }

    /// Base speed, hit points and reward before wave scaling.
    #[must_use]
    pub const fn base(self) -> (f32, f32, f32) {
        match self {
            Self::Runner => (60.0, 40.0, 10.0),
            Self::Sprinter => (95.0, 25.0, 11.0),
            Self::Brute => (45.0, 85.0, 18.0),
            Self::Swarm => (70.0, 16.0, 5.0),
            Self::Regenerator => (60.0, 55.0, 16.0),
            Self::Shielded => (55.0, 70.0, 20.0),
            Self::Boss => (45.0, 260.0, 80.0),
        }
    }

    /// Reports whether the kind counts as a boss for bonus damage.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss)
    }

    /// Stats of an enemy of this kind spawned during `wave`.
    #[must_use]
    pub fn stats_for_wave(self, wave: u32) -> EnemyStats {
        let (speed, hp, reward) = self.base();
        let wave = wave as f32;
        let max_hp = (hp * (1.0 + wave * 0.4)).round();
        let shield = if matches!(self, Self::Shielded) {
            (max_hp * 0.4).round()
        } else {
            0.0
        };
        EnemyStats {
            speed,
            max_hp,
            shield,
            reward: (reward + wave * 1.2).round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upgraded(kind: TowerKind, path: UpgradePath, levels: u8) -> TowerStats {
        let mut stats = TowerStats::base(kind);
        for level in 0..levels {
            let step = kind.upgrade(path, level).expect("tier exists");
            for change in step.changes {
                stats.apply(change);
            }
        }
        stats
    }

    #[test]
    fn damage_multipliers_compound_across_tiers() {
        let stats = upgraded(TowerKind::Gunner, UpgradePath::A, 2);
        assert!((stats.damage - 10.0 * 1.25 * 1.25).abs() < 1e-4);
        assert!((stats.fire_rate - 1.8 * 1.1 * 1.1).abs() < 1e-4);
    }

    #[test]
    fn gunner_final_tier_grants_crits() {
        let stats = upgraded(TowerKind::Gunner, UpgradePath::A, 3);
        assert_eq!(stats.crit_chance, 0.25);
        assert_eq!(stats.crit_multiplier, 2.0);
    }

    #[test]
    fn sniper_pierce_rises_to_two() {
        assert_eq!(upgraded(TowerKind::Sniper, UpgradePath::B, 2).pierce, 1);
        assert_eq!(upgraded(TowerKind::Sniper, UpgradePath::B, 3).pierce, 2);
    }

    #[test]
    fn support_auras_accumulate() {
        let stats = upgraded(TowerKind::Support, UpgradePath::B, 2);
        assert!((stats.aura.range - 0.3).abs() < 1e-6);
        assert!((stats.aura.slow - 0.1).abs() < 1e-6);
        assert!(stats.projects_aura(TowerKind::Support));
        assert!(upgraded(TowerKind::Support, UpgradePath::B, 3).global_buff);
    }

    #[test]
    fn gunner_becomes_an_aura_source_on_its_last_b_tier() {
        assert!(!TowerStats::base(TowerKind::Gunner).projects_aura(TowerKind::Gunner));
        let stats = upgraded(TowerKind::Gunner, UpgradePath::B, 3);
        assert!(stats.projects_aura(TowerKind::Gunner));
        assert!((stats.slow - 0.15).abs() < 1e-6);
    }

    #[test]
    fn no_tier_beyond_the_maximum() {
        for kind in ALL_TOWER_KINDS {
            for path in [UpgradePath::A, UpgradePath::B] {
                assert!(kind.upgrade(path, MAX_UPGRADE_LEVEL - 1).is_some());
                assert!(kind.upgrade(path, MAX_UPGRADE_LEVEL).is_none());
            }
        }
    }

    #[test]
    fn enemy_stats_scale_with_wave() {
        let runner = EnemyKind::Runner.stats_for_wave(1);
        assert_eq!(runner.max_hp, 56.0);
        assert_eq!(runner.reward, 11);
        assert_eq!(runner.shield, 0.0);

        let shielded = EnemyKind::Shielded.stats_for_wave(15);
        assert_eq!(shielded.max_hp, 490.0);
        assert_eq!(shielded.shield, 196.0);
        assert_eq!(shielded.reward, 38);
    }
}
