//! Money, score and player progression.

/// Money granted for every level gained.
pub(crate) const LEVEL_UP_BONUS: u32 = 50;
/// Experience required per level, multiplied by the current level.
const XP_PER_LEVEL: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Economy {
    pub(crate) money: u32,
    pub(crate) score: u32,
    pub(crate) xp: u32,
    pub(crate) level: u32,
    pub(crate) kills: u32,
}

impl Economy {
    pub(crate) fn new(money: u32) -> Self {
        Self {
            money,
            score: 0,
            xp: 0,
            level: 1,
            kills: 0,
        }
    }

    /// Deducts `cost` when affordable, reporting whether it was.
    pub(crate) fn try_spend(&mut self, cost: u32) -> bool {
        match self.money.checked_sub(cost) {
            Some(remaining) => {
                self.money = remaining;
                true
            }
            None => false,
        }
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Credits a kill: the reward as money and twice the reward as score.
    pub(crate) fn credit_kill(&mut self, reward: u32) {
        self.credit(reward);
        self.score = self.score.saturating_add(reward.saturating_mul(2));
        self.kills = self.kills.saturating_add(1);
    }

    /// Adds experience and returns every level reached as a result.
    ///
    /// Large grants cascade through several thresholds in one call.
    pub(crate) fn grant_xp(&mut self, amount: u32) -> Vec<u32> {
        self.xp = self.xp.saturating_add(amount);
        let mut reached = Vec::new();
        while self.xp >= self.threshold() {
            self.xp -= self.threshold();
            self.level += 1;
            self.credit(LEVEL_UP_BONUS);
            reached.push(self.level);
        }
        reached
    }

    fn threshold(&self) -> u32 {
        self.level.saturating_mul(XP_PER_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spending_never_goes_negative() {
        let mut economy = Economy::new(100);
        assert!(economy.try_spend(80));
        assert!(!economy.try_spend(21));
        assert_eq!(economy.money, 20);
    }

    #[test]
    fn kills_credit_money_and_double_score() {
        let mut economy = Economy::new(0);
        economy.credit_kill(11);
        assert_eq!(economy.money, 11);
        assert_eq!(economy.score, 22);
        assert_eq!(economy.kills, 1);
    }

    #[test]
    fn small_grants_accumulate_without_levelling() {
        let mut economy = Economy::new(0);
        assert!(economy.grant_xp(99).is_empty());
        assert_eq!(economy.grant_xp(1), vec![2]);
        assert_eq!(economy.xp, 0);
        assert_eq!(economy.money, LEVEL_UP_BONUS);
    }

    #[test]
    fn large_grants_cascade_through_levels() {
        let mut economy = Economy::new(0);
        // 100 for level 1, 200 for level 2, 300 for level 3, 50 left over.
        assert_eq!(economy.grant_xp(650), vec![2, 3, 4]);
        assert_eq!(economy.level, 4);
        assert_eq!(economy.xp, 50);
        assert_eq!(economy.money, 3 * LEVEL_UP_BONUS);
    }
}
