//! Settlement-wide stockpile of food and faith.
pub mod config;
pub mod miracles;
pub mod plugin;
pub mod save;
pub mod stockpile;
pub mod systems;

pub use config::SettlementConfig;
pub use plugin::SettlementPlugin;
pub use stockpile::{ResourcePool, SettlementStockpile};
