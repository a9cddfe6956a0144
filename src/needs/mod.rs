//! Per-agent survival needs.
pub mod config;
pub mod plugin;
pub mod snapshot;
pub mod state;
pub mod systems;

pub use config::{NeedThresholds, NeedsConfig};
pub use plugin::NeedsPlugin;
pub use state::NeedsState;
pub use systems::NeedsStatus;
