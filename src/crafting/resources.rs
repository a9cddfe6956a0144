//! Rolling record of craft outcomes.
use std::collections::VecDeque;

use bevy::prelude::*;

use crate::agent::AgentId;

use super::engine::CraftingError;

const DEFAULT_CRAFTING_LEDGER_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum CraftOutcome {
    Completed { item_id: String, quantity: u32 },
    Rejected(CraftingError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CraftRecord {
    pub tick: u64,
    pub agent: AgentId,
    pub recipe_id: String,
    pub outcome: CraftOutcome,
}

/// Totals since start-up plus the most recent records.
#[derive(Resource, Debug)]
pub struct CraftingLedger {
    capacity: usize,
    completed: u64,
    rejected: u64,
    recent: VecDeque<CraftRecord>,
}

impl CraftingLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            completed: 0,
            rejected: 0,
            recent: VecDeque::new(),
        }
    }

    pub fn record(&mut self, record: CraftRecord) {
        match record.outcome {
            CraftOutcome::Completed { .. } => self.completed += 1,
            CraftOutcome::Rejected(_) => self.rejected += 1,
        }
        while self.recent.len() >= self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(record);
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn recent(&self) -> impl Iterator<Item = &CraftRecord> {
        self.recent.iter()
    }
}

impl Default for CraftingLedger {
    fn default() -> Self {
        Self::new(DEFAULT_CRAFTING_LEDGER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(tick: u64) -> CraftRecord {
        CraftRecord {
            tick,
            agent: AgentId::new(1),
            recipe_id: "recipe_plank".into(),
            outcome: CraftOutcome::Completed {
                item_id: "item_plank".into(),
                quantity: 1,
            },
        }
    }

    #[test]
    fn history_is_bounded_but_totals_are_not() {
        let mut ledger = CraftingLedger::new(2);
        ledger.record(completed(1));
        ledger.record(completed(2));
        ledger.record(CraftRecord {
            outcome: CraftOutcome::Rejected(CraftingError::UnknownRecipe {
                recipe_id: "recipe_ghost".into(),
            }),
            ..completed(3)
        });

        assert_eq!(ledger.completed(), 2);
        assert_eq!(ledger.rejected(), 1);
        let ticks: Vec<_> = ledger.recent().map(|record| record.tick).collect();
        assert_eq!(ticks, vec![2, 3]);
    }
}
