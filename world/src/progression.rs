//! Level, economy and infestation meter bookkeeping.

use std::time::Duration;

use debugger_core::config::MeterConfig;

/// Rounds a money amount to whole cents.
pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Counters that describe how far the current run has progressed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Progression {
    level: u32,
    money: f64,
    bugs_killed: u32,
    score_total: u64,
    meter: f64,
    money_multiplier: f64,
    ability_cooldown_reduction: Duration,
}

impl Progression {
    pub(crate) fn new() -> Self {
        Self {
            level: 1,
            money: 0.0,
            bugs_killed: 0,
            score_total: 0,
            meter: 0.0,
            money_multiplier: 1.0,
            ability_cooldown_reduction: Duration::ZERO,
        }
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn money(&self) -> f64 {
        self.money
    }

    pub(crate) fn bugs_killed(&self) -> u32 {
        self.bugs_killed
    }

    pub(crate) fn score_total(&self) -> u64 {
        self.score_total
    }

    pub(crate) fn meter(&self) -> f64 {
        self.meter
    }

    /// Permanent money multiplier built up by upgrades.
    pub(crate) fn money_multiplier(&self) -> f64 {
        self.money_multiplier
    }

    pub(crate) fn ability_cooldown_reduction(&self) -> Duration {
        self.ability_cooldown_reduction
    }

    /// Adds a spawned bug's score to the meter.
    ///
    /// Returns `true` when the meter reached its capacity.
    pub(crate) fn record_spawn(&mut self, score: u32, meter: &MeterConfig) -> bool {
        let max = meter.max_for_level(self.level);
        self.meter = (self.meter + f64::from(score)).min(max);
        self.meter >= max
    }

    /// Credits a kill. `multiplier` combines permanent and temporary factors.
    pub(crate) fn record_kill(&mut self, reward: u32, score: u32, multiplier: f64) {
        self.money = round_cents(self.money + f64::from(reward) * multiplier);
        self.bugs_killed = self.bugs_killed.saturating_add(1);
        self.score_total = self.score_total.saturating_add(u64::from(score));
        self.meter = (self.meter - f64::from(score)).max(0.0);
    }

    /// Deducts a price if affordable.
    pub(crate) fn spend(&mut self, cost: u32) -> bool {
        let cost = f64::from(cost);
        if self.money < cost {
            return false;
        }
        self.money = round_cents(self.money - cost);
        true
    }

    pub(crate) fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    pub(crate) fn scale_money_multiplier(&mut self, factor: f64) {
        self.money_multiplier *= factor;
    }

    pub(crate) fn reduce_ability_cooldowns(&mut self, step: Duration) {
        self.ability_cooldown_reduction = self.ability_cooldown_reduction.saturating_add(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kills_round_money_to_cents() {
        let mut progression = Progression::new();
        progression.record_kill(1, 1, 1.1);
        progression.record_kill(1, 1, 1.1);
        progression.record_kill(1, 1, 1.1);
        assert_eq!(progression.money(), 3.3);
        assert_eq!(progression.bugs_killed(), 3);
        assert_eq!(progression.score_total(), 3);
    }

    #[test]
    fn meter_rises_on_spawn_and_falls_on_kill() {
        let meter = MeterConfig::default();
        let mut progression = Progression::new();

        assert!(!progression.record_spawn(5, &meter));
        assert_eq!(progression.meter(), 5.0);

        progression.record_kill(0, 2, 1.0);
        assert_eq!(progression.meter(), 3.0);

        progression.record_kill(0, 10, 1.0);
        assert_eq!(progression.meter(), 0.0);
    }

    #[test]
    fn meter_reports_overrun_at_capacity() {
        let meter = MeterConfig::default();
        let mut progression = Progression::new();
        for _ in 0..19 {
            assert!(!progression.record_spawn(5, &meter));
        }
        assert!(progression.record_spawn(5, &meter));
        assert_eq!(progression.meter(), 100.0);
    }

    #[test]
    fn spending_requires_sufficient_funds() {
        let mut progression = Progression::new();
        progression.record_kill(10, 0, 1.0);
        assert!(!progression.spend(11));
        assert!(progression.spend(10));
        assert_eq!(progression.money(), 0.0);
    }
}
