//! Core module exposing the simulation clock, tick ordering and save files.
pub mod plugin;
pub mod save;

pub use plugin::{CorePlugin, SimulationClock, SimulationSet};
pub use save::{read_json_lines, JsonLinesLog, SaveRequested};
