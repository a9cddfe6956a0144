use bevy::prelude::*;

use crate::settlement::ResourcePool;

use super::config::{NeedThresholds, NeedsConfig};
use super::snapshot::NeedsSnapshot;

pub const NEED_MIN: f32 = 0.0;
pub const NEED_MAX: f32 = 100.0;

/// Per-second decay for each need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayRates {
    pub hunger: f32,
    pub thirst: f32,
    pub rest: f32,
    pub energy: f32,
}

/// Result of the pool interaction for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FoodIntake {
    Fed { withdrawn: f32 },
    Starving,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeedsTickOutcome {
    /// Food withdrawn from the pool this step, if any.
    pub fed: Option<f32>,
    pub starving: bool,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct NeedsState {
    hunger: f32,
    thirst: f32,
    rest: f32,
    energy: f32,
}

impl NeedsState {
    pub fn new(config: &NeedsConfig) -> Self {
        Self::from_levels(
            config.start.hunger,
            config.start.thirst,
            config.start.rest,
            config.start.energy,
        )
    }

    pub fn from_levels(hunger: f32, thirst: f32, rest: f32, energy: f32) -> Self {
        Self {
            hunger: clamp_need(hunger),
            thirst: clamp_need(thirst),
            rest: clamp_need(rest),
            energy: clamp_need(energy),
        }
    }

    pub fn hunger(&self) -> f32 {
        self.hunger
    }

    pub fn thirst(&self) -> f32 {
        self.thirst
    }

    pub fn rest(&self) -> f32 {
        self.rest
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// The state after `delta_seconds` given how feeding went. Does not touch
    /// any pool.
    ///
    /// A fed step replaces that step's hunger decay with the food's hunger
    /// gain; only a starving step decays hunger.
    pub fn advanced(&self, config: &NeedsConfig, delta_seconds: f32, intake: FoodIntake) -> Self {
        if !is_valid_delta(delta_seconds) {
            return *self;
        }

        let rates = &config.decay;
        let mut next = Self {
            hunger: self.hunger,
            thirst: clamp_need(self.thirst - rates.thirst * delta_seconds),
            rest: clamp_need(self.rest - rates.rest * delta_seconds),
            energy: clamp_need(self.energy - rates.energy * delta_seconds),
        };
        match intake {
            FoodIntake::Fed { withdrawn } => {
                next.satisfy_hunger(withdrawn * config.feeding.hunger_per_food);
            }
            FoodIntake::Starving => {
                next.hunger = clamp_need(
                    self.hunger
                        - rates.hunger * delta_seconds * config.feeding.starvation_multiplier,
                );
            }
        }
        next
    }

    /// Draws food from `pool` when it has any, then applies decay.
    pub fn update_needs(
        &mut self,
        delta_seconds: f32,
        config: &NeedsConfig,
        pool: &mut impl ResourcePool,
    ) -> NeedsTickOutcome {
        if !is_valid_delta(delta_seconds) {
            return NeedsTickOutcome::default();
        }

        let mut intake = FoodIntake::Starving;
        if pool.current_food() > 0.0 {
            let request = pool.food_consumption_rate() * delta_seconds;
            if pool.consume_food(request) {
                intake = FoodIntake::Fed { withdrawn: request };
            }
        }

        *self = self.advanced(config, delta_seconds, intake);

        match intake {
            FoodIntake::Fed { withdrawn } => NeedsTickOutcome {
                fed: Some(withdrawn),
                starving: false,
            },
            FoodIntake::Starving => NeedsTickOutcome {
                fed: None,
                starving: true,
            },
        }
    }

    pub fn satisfy_hunger(&mut self, amount: f32) {
        self.hunger = add_need(self.hunger, amount);
    }

    pub fn satisfy_thirst(&mut self, amount: f32) {
        self.thirst = add_need(self.thirst, amount);
    }

    pub fn satisfy_rest(&mut self, amount: f32) {
        self.rest = add_need(self.rest, amount);
    }

    pub fn satisfy_energy(&mut self, amount: f32) {
        self.energy = add_need(self.energy, amount);
    }

    /// Rest is not part of this check.
    pub fn are_basic_needs_met(&self, thresholds: &NeedThresholds) -> bool {
        self.hunger > thresholds.hunger
            && self.thirst > thresholds.thirst
            && self.energy > thresholds.energy
    }

    pub fn snapshot(&self) -> NeedsSnapshot {
        NeedsSnapshot {
            hunger: self.hunger,
            thirst: self.thirst,
            rest: self.rest,
            energy: self.energy,
        }
    }

    pub fn restore(snapshot: &NeedsSnapshot) -> Self {
        Self::from_levels(
            snapshot.hunger,
            snapshot.thirst,
            snapshot.rest,
            snapshot.energy,
        )
    }
}

impl Default for NeedsState {
    fn default() -> Self {
        Self::from_levels(NEED_MAX, NEED_MAX, NEED_MAX, NEED_MAX)
    }
}

fn is_valid_delta(delta_seconds: f32) -> bool {
    delta_seconds.is_finite() && delta_seconds > 0.0
}

fn add_need(current: f32, amount: f32) -> f32 {
    if !amount.is_finite() || amount < 0.0 {
        return current;
    }
    clamp_need(current + amount)
}

fn clamp_need(value: f32) -> f32 {
    if value.is_nan() {
        NEED_MIN
    } else {
        value.clamp(NEED_MIN, NEED_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::SettlementStockpile;

    const EPSILON: f32 = 1e-4;

    fn approx(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_pool_applies_starvation_decay() {
        let config = NeedsConfig::default();
        let mut pool = SettlementStockpile::new(0.0, 1.0, 0.0);
        let mut needs = NeedsState::new(&config);

        let outcome = needs.update_needs(1.0, &config, &mut pool);

        assert!(outcome.starving);
        assert_eq!(outcome.fed, None);
        approx(needs.hunger(), 98.0);
        approx(needs.thirst(), 98.8);
        approx(needs.rest(), 99.5);
        approx(needs.energy(), 99.2);
    }

    #[test]
    fn successful_withdrawal_restores_hunger() {
        let config = NeedsConfig::default();
        let mut pool = SettlementStockpile::new(10.0, 0.5, 0.0);
        let mut needs = NeedsState::from_levels(50.0, 100.0, 100.0, 100.0);

        let outcome = needs.update_needs(2.0, &config, &mut pool);

        assert_eq!(outcome.fed, Some(1.0));
        assert!(!outcome.starving);
        approx(pool.current_food(), 9.0);
        approx(needs.hunger(), 60.0);
    }

    #[test]
    fn fed_step_skips_hunger_decay() {
        let config = NeedsConfig::default();
        let needs = NeedsState::from_levels(50.0, 100.0, 100.0, 100.0);

        let next = needs.advanced(&config, 1.0, FoodIntake::Fed { withdrawn: 0.0 });

        approx(next.hunger(), 50.0);
        approx(next.thirst(), 98.8);
    }

    #[test]
    fn failed_withdrawal_falls_through_to_decay() {
        let config = NeedsConfig::default();
        let mut pool = SettlementStockpile::new(0.5, 1.0, 0.0);
        let mut needs = NeedsState::from_levels(50.0, 100.0, 100.0, 100.0);

        let outcome = needs.update_needs(1.0, &config, &mut pool);

        assert!(outcome.starving);
        approx(pool.current_food(), 0.5);
        approx(needs.hunger(), 48.0);
    }

    #[test]
    fn needs_stay_within_bounds() {
        let config = NeedsConfig::default();
        let mut starving_pool = SettlementStockpile::new(0.0, 1.0, 0.0);
        let mut rich_pool = SettlementStockpile::new(1_000_000.0, 50.0, 0.0);
        let mut needs = NeedsState::from_levels(3.0, 1.0, 0.2, 99.0);

        for step in 0..200 {
            let delta = 0.05 * (step % 7 + 1) as f32;
            if step % 3 == 0 {
                needs.update_needs(delta, &config, &mut rich_pool);
            } else {
                needs.update_needs(delta, &config, &mut starving_pool);
            }
            for value in [needs.hunger(), needs.thirst(), needs.rest(), needs.energy()] {
                assert!((NEED_MIN..=NEED_MAX).contains(&value));
            }
        }
    }

    #[test]
    fn invalid_deltas_are_ignored() {
        let config = NeedsConfig::default();
        let mut pool = SettlementStockpile::new(10.0, 1.0, 0.0);
        let mut needs = NeedsState::new(&config);

        for delta in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let outcome = needs.update_needs(delta, &config, &mut pool);
            assert_eq!(outcome, NeedsTickOutcome::default());
        }
        assert_eq!(needs, NeedsState::new(&config));
        approx(pool.current_food(), 10.0);
    }

    #[test]
    fn satisfy_rejects_negative_amounts() {
        let mut needs = NeedsState::from_levels(40.0, 40.0, 40.0, 40.0);

        needs.satisfy_hunger(-10.0);
        needs.satisfy_thirst(f32::NAN);
        needs.satisfy_rest(80.0);
        needs.satisfy_energy(5.0);

        approx(needs.hunger(), 40.0);
        approx(needs.thirst(), 40.0);
        approx(needs.rest(), NEED_MAX);
        approx(needs.energy(), 45.0);
    }

    #[test]
    fn basic_needs_check_ignores_rest() {
        let thresholds = NeedsConfig::default().thresholds;
        let exhausted = NeedsState::from_levels(31.0, 31.0, 0.0, 21.0);

        assert!(exhausted.are_basic_needs_met(&thresholds));
        assert_eq!(
            exhausted.are_basic_needs_met(&thresholds),
            exhausted.are_basic_needs_met(&thresholds)
        );

        let at_threshold = NeedsState::from_levels(30.0, 80.0, 80.0, 80.0);
        assert!(!at_threshold.are_basic_needs_met(&thresholds));
    }

    #[test]
    fn restore_clamps_snapshot_values() {
        let snapshot = NeedsSnapshot {
            hunger: 140.0,
            thirst: -5.0,
            rest: 50.0,
            energy: f32::NAN,
        };

        let needs = NeedsState::restore(&snapshot);

        approx(needs.hunger(), NEED_MAX);
        approx(needs.thirst(), NEED_MIN);
        approx(needs.rest(), 50.0);
        approx(needs.energy(), NEED_MIN);
        assert_eq!(NeedsState::restore(&needs.snapshot()), needs);
    }
}
