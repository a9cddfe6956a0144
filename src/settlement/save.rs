//! JSON save format for the settlement stockpile.
use serde::{Deserialize, Serialize};

use crate::core::JsonLinesLog;

use super::stockpile::{ResourcePool, SettlementStockpile};

pub const SETTLEMENT_SAVE_PATH: &str = "saves/settlement.jsonl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSaveRecord {
    pub tick: u64,
    pub elapsed_seconds: f64,
    pub food: f32,
    pub faith: f32,
    #[serde(default)]
    pub efficient_gathering: bool,
}

impl SettlementSaveRecord {
    pub fn capture(tick: u64, elapsed_seconds: f64, stockpile: &SettlementStockpile) -> Self {
        Self {
            tick,
            elapsed_seconds,
            food: stockpile.current_food(),
            faith: stockpile.faith(),
            efficient_gathering: stockpile.has_efficient_gathering(),
        }
    }

    /// Writes the saved amounts into `stockpile`. The consumption rate comes
    /// from configuration and is left alone.
    pub fn apply_to(&self, stockpile: &mut SettlementStockpile) {
        stockpile.set_food(self.food);
        stockpile.set_faith(self.faith);
        if self.efficient_gathering {
            stockpile.grant_efficient_gathering();
        }
    }
}

/// Buffered writer for `saves/settlement.jsonl`.
pub type SettlementSaveLog = JsonLinesLog<SettlementSaveRecord>;
