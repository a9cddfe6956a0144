use std::{collections::BTreeMap, fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use super::stockpile::SettlementStockpile;

const CONFIG_PATH: &str = "config/settlement.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawSettlementConfig {
    #[serde(default)]
    stockpile: RawStockpile,
    #[serde(default)]
    production: RawProduction,
    #[serde(default)]
    settlers: RawSettlers,
    #[serde(default)]
    miracles: RawMiracles,
    #[serde(default)]
    save: RawSave,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawStockpile {
    starting_food: f32,
    food_consumption_rate: f32,
    starting_faith: f32,
}

impl Default for RawStockpile {
    fn default() -> Self {
        Self {
            starting_food: 60.0,
            food_consumption_rate: 0.1,
            starting_faith: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawProduction {
    gather_rate: f32,
    faith_generation_rate: f32,
    food_reserve_per_agent: f32,
}

impl Default for RawProduction {
    fn default() -> Self {
        Self {
            gather_rate: 0.5,
            faith_generation_rate: 0.05,
            food_reserve_per_agent: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSettlers {
    per_definition: u32,
    starting_items: BTreeMap<String, u32>,
}

impl Default for RawSettlers {
    fn default() -> Self {
        Self {
            per_definition: 3,
            starting_items: BTreeMap::from([
                ("item_wood".to_string(), 6),
                ("item_flint".to_string(), 2),
            ]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawMiracles {
    auto_invoke: bool,
    gift_faith_cost: f32,
    gift_food: f32,
    efficient_gathering_faith_cost: f32,
    efficient_gathering_multiplier: f32,
}

impl Default for RawMiracles {
    fn default() -> Self {
        Self {
            auto_invoke: true,
            gift_faith_cost: 5.0,
            gift_food: 20.0,
            efficient_gathering_faith_cost: 15.0,
            efficient_gathering_multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSave {
    restore_on_start: bool,
}

/// Faith costs and effects of the settlement's miracles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiracleConfig {
    /// Let the settlement spend faith on its own when it can afford to.
    pub auto_invoke: bool,
    pub gift_faith_cost: f32,
    pub gift_food: f32,
    pub efficient_gathering_faith_cost: f32,
    pub efficient_gathering_multiplier: f32,
}

/// Runtime configuration derived from `config/settlement.toml`.
#[derive(Resource, Debug, Clone)]
pub struct SettlementConfig {
    pub starting_food: f32,
    pub food_consumption_rate: f32,
    pub starting_faith: f32,
    /// Food per second added by each gathering agent.
    pub gather_rate: f32,
    /// Faith per second from each agent whose basic needs are met.
    pub faith_generation_rate: f32,
    /// Agents gather while food is below `population * food_reserve_per_agent`.
    pub food_reserve_per_agent: f32,
    pub settlers_per_definition: u32,
    pub starting_items: BTreeMap<String, u32>,
    pub miracles: MiracleConfig,
    /// Seed the stockpile from the latest record in the settlement save.
    pub restore_on_start: bool,
}

impl SettlementConfig {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<RawSettlementConfig>(&raw) {
                Ok(parsed) => parsed.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    RawSettlementConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawSettlementConfig::default().into()
            }
        }
    }

    pub fn stockpile(&self) -> SettlementStockpile {
        SettlementStockpile::new(
            self.starting_food,
            self.food_consumption_rate,
            self.starting_faith,
        )
    }

    pub fn food_reserve_target(&self, population: usize) -> f32 {
        population as f32 * self.food_reserve_per_agent
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        RawSettlementConfig::default().into()
    }
}

impl From<RawSettlementConfig> for SettlementConfig {
    fn from(value: RawSettlementConfig) -> Self {
        let starting_items = value
            .settlers
            .starting_items
            .into_iter()
            .filter_map(|(item_id, quantity)| {
                let item_id = item_id.trim().to_string();
                (!item_id.is_empty() && quantity > 0).then_some((item_id, quantity))
            })
            .collect();

        Self {
            starting_food: non_negative(value.stockpile.starting_food),
            food_consumption_rate: non_negative(value.stockpile.food_consumption_rate),
            starting_faith: non_negative(value.stockpile.starting_faith),
            gather_rate: non_negative(value.production.gather_rate),
            faith_generation_rate: non_negative(value.production.faith_generation_rate),
            food_reserve_per_agent: non_negative(value.production.food_reserve_per_agent),
            settlers_per_definition: value.settlers.per_definition,
            starting_items,
            miracles: MiracleConfig {
                auto_invoke: value.miracles.auto_invoke,
                gift_faith_cost: non_negative(value.miracles.gift_faith_cost),
                gift_food: non_negative(value.miracles.gift_food),
                efficient_gathering_faith_cost: non_negative(
                    value.miracles.efficient_gathering_faith_cost,
                ),
                efficient_gathering_multiplier: non_negative(
                    value.miracles.efficient_gathering_multiplier,
                )
                .max(1.0),
            },
            restore_on_start: value.save.restore_on_start,
        }
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
