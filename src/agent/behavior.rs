use std::fmt;

use bevy::prelude::*;

use crate::needs::{NeedThresholds, NeedsState};

/// What an agent is currently doing.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BehaviorState {
    #[default]
    Idle,
    Gathering,
    Crafting,
    Resting,
    Drinking,
}

impl BehaviorState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Gathering => "gathering",
            Self::Crafting => "crafting",
            Self::Resting => "resting",
            Self::Drinking => "drinking",
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settlement-side facts behavior selection depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorContext {
    pub food_low: bool,
    pub can_craft: bool,
    /// Level a resting or drinking agent must reach before switching.
    pub recovered_level: f32,
}

/// Picks the next behavior. Resting and Drinking hold until the relevant
/// need has recovered to `recovered_level`.
pub fn choose_behavior(
    current: BehaviorState,
    needs: &NeedsState,
    thresholds: &NeedThresholds,
    context: &BehaviorContext,
) -> BehaviorState {
    let still_recovering = match current {
        BehaviorState::Resting => {
            needs.energy() < context.recovered_level || needs.rest() < context.recovered_level
        }
        BehaviorState::Drinking => needs.thirst() < context.recovered_level,
        _ => false,
    };
    if still_recovering {
        return current;
    }

    if needs.energy() <= thresholds.energy || needs.rest() <= thresholds.rest {
        BehaviorState::Resting
    } else if needs.thirst() <= thresholds.thirst {
        BehaviorState::Drinking
    } else if context.food_low {
        BehaviorState::Gathering
    } else if context.can_craft {
        BehaviorState::Crafting
    } else {
        BehaviorState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::needs::NeedsConfig;

    fn context(food_low: bool, can_craft: bool) -> BehaviorContext {
        BehaviorContext {
            food_low,
            can_craft,
            recovered_level: 80.0,
        }
    }

    #[test]
    fn priorities_follow_urgency() {
        let thresholds = NeedsConfig::default().thresholds;
        let tired = NeedsState::from_levels(90.0, 10.0, 90.0, 15.0);
        let thirsty = NeedsState::from_levels(90.0, 10.0, 90.0, 90.0);
        let healthy = NeedsState::from_levels(90.0, 90.0, 90.0, 90.0);
        let idle = BehaviorState::Idle;

        assert_eq!(
            choose_behavior(idle, &tired, &thresholds, &context(true, true)),
            BehaviorState::Resting
        );
        assert_eq!(
            choose_behavior(idle, &thirsty, &thresholds, &context(true, true)),
            BehaviorState::Drinking
        );
        assert_eq!(
            choose_behavior(idle, &healthy, &thresholds, &context(true, true)),
            BehaviorState::Gathering
        );
        assert_eq!(
            choose_behavior(idle, &healthy, &thresholds, &context(false, true)),
            BehaviorState::Crafting
        );
        assert_eq!(
            choose_behavior(idle, &healthy, &thresholds, &context(false, false)),
            BehaviorState::Idle
        );
    }

    #[test]
    fn recovery_holds_until_recovered_level() {
        let thresholds = NeedsConfig::default().thresholds;
        let partly_rested = NeedsState::from_levels(90.0, 90.0, 90.0, 50.0);
        let rested = NeedsState::from_levels(90.0, 90.0, 90.0, 85.0);

        assert_eq!(
            choose_behavior(
                BehaviorState::Resting,
                &partly_rested,
                &thresholds,
                &context(false, true)
            ),
            BehaviorState::Resting
        );
        assert_eq!(
            choose_behavior(BehaviorState::Resting, &rested, &thresholds, &context(false, true)),
            BehaviorState::Crafting
        );
    }
}
