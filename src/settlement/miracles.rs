//! Miracles: the ways the settlement spends its faith.
use std::fmt;

use bevy::prelude::*;

use super::{config::MiracleConfig, stockpile::SettlementStockpile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Miracle {
    /// Turns faith into food.
    GiftOfSustenance,
    /// One-off upgrade multiplying food gathered from then on.
    EfficientGathering,
}

impl Miracle {
    pub fn label(self) -> &'static str {
        match self {
            Self::GiftOfSustenance => "Gift of Sustenance",
            Self::EfficientGathering => "Efficient Gathering",
        }
    }

    pub fn faith_cost(self, config: &MiracleConfig) -> f32 {
        match self {
            Self::GiftOfSustenance => config.gift_faith_cost,
            Self::EfficientGathering => config.efficient_gathering_faith_cost,
        }
    }
}

impl fmt::Display for Miracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiracleRequested {
    pub miracle: Miracle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MiracleError {
    NotEnoughFaith { required: f32, available: f32 },
    AlreadyGranted,
}

impl fmt::Display for MiracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEnoughFaith {
                required,
                available,
            } => write!(
                f,
                "needs {:.1} faith but only {:.1} available",
                required, available
            ),
            Self::AlreadyGranted => f.write_str("already granted"),
        }
    }
}

impl std::error::Error for MiracleError {}

/// Spends the miracle's faith and applies its effect. On error the
/// stockpile is untouched.
pub fn perform_miracle(
    miracle: Miracle,
    config: &MiracleConfig,
    stockpile: &mut SettlementStockpile,
) -> Result<(), MiracleError> {
    if miracle == Miracle::EfficientGathering && stockpile.has_efficient_gathering() {
        return Err(MiracleError::AlreadyGranted);
    }

    let cost = miracle.faith_cost(config);
    if !stockpile.consume_faith(cost) {
        return Err(MiracleError::NotEnoughFaith {
            required: cost,
            available: stockpile.faith(),
        });
    }

    match miracle {
        Miracle::GiftOfSustenance => stockpile.add_food(config.gift_food),
        Miracle::EfficientGathering => stockpile.grant_efficient_gathering(),
    }
    Ok(())
}
