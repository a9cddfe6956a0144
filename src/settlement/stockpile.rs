use bevy::prelude::*;

/// Shared consumables agents draw from.
pub trait ResourcePool {
    fn current_food(&self) -> f32;

    /// Food each agent wants per second.
    fn food_consumption_rate(&self) -> f32;

    /// Withdraws `amount` only if all of it is available.
    fn consume_food(&mut self, amount: f32) -> bool;
}

/// Settlement-wide food and faith, plus the upgrades faith has bought.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SettlementStockpile {
    food: f32,
    food_consumption_rate: f32,
    faith: f32,
    efficient_gathering: bool,
}

impl SettlementStockpile {
    pub fn new(food: f32, food_consumption_rate: f32, faith: f32) -> Self {
        Self {
            food: sanitise_amount(food),
            food_consumption_rate: sanitise_amount(food_consumption_rate),
            faith: sanitise_amount(faith),
            efficient_gathering: false,
        }
    }

    pub fn faith(&self) -> f32 {
        self.faith
    }

    pub fn add_food(&mut self, amount: f32) {
        if is_positive(amount) {
            self.food += amount;
        }
    }

    /// Replaces the food stock outright, e.g. when restoring a save.
    pub fn set_food(&mut self, amount: f32) {
        self.food = sanitise_amount(amount);
    }

    pub fn add_faith(&mut self, amount: f32) {
        if is_positive(amount) {
            self.faith += amount;
        }
    }

    pub fn set_faith(&mut self, amount: f32) {
        self.faith = sanitise_amount(amount);
    }

    /// Spends `amount` only if all of it is available.
    pub fn consume_faith(&mut self, amount: f32) -> bool {
        if !amount.is_finite() || amount < 0.0 || self.faith < amount {
            return false;
        }
        self.faith -= amount;
        true
    }

    pub fn has_efficient_gathering(&self) -> bool {
        self.efficient_gathering
    }

    pub fn grant_efficient_gathering(&mut self) {
        self.efficient_gathering = true;
    }
}

impl ResourcePool for SettlementStockpile {
    fn current_food(&self) -> f32 {
        self.food
    }

    fn food_consumption_rate(&self) -> f32 {
        self.food_consumption_rate
    }

    fn consume_food(&mut self, amount: f32) -> bool {
        if !amount.is_finite() || amount < 0.0 || self.food < amount {
            return false;
        }
        self.food -= amount;
        true
    }
}

fn is_positive(amount: f32) -> bool {
    amount.is_finite() && amount > 0.0
}

fn sanitise_amount(amount: f32) -> f32 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_withdrawal_is_all_or_nothing() {
        let mut stockpile = SettlementStockpile::new(5.0, 1.0, 0.0);

        assert!(stockpile.consume_food(2.0));
        assert_eq!(stockpile.current_food(), 3.0);
        assert!(!stockpile.consume_food(3.5));
        assert_eq!(stockpile.current_food(), 3.0);
        assert!(!stockpile.consume_food(-1.0));

        stockpile.add_food(-4.0);
        stockpile.add_food(1.5);
        assert_eq!(stockpile.current_food(), 4.5);
        stockpile.set_food(f32::NAN);
        assert_eq!(stockpile.current_food(), 0.0);
    }

    #[test]
    fn faith_accumulates_and_spends() {
        let mut stockpile = SettlementStockpile::new(0.0, 1.0, 2.0);

        stockpile.add_faith(3.0);
        assert!(stockpile.consume_faith(4.0));
        assert!(!stockpile.consume_faith(1.5));
        assert_eq!(stockpile.faith(), 1.0);

        stockpile.set_faith(-3.0);
        assert_eq!(stockpile.faith(), 0.0);
    }
}
