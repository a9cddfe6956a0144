//! Needs plugin wiring configuration, decay, starvation and save snapshots.
use bevy::prelude::*;

use crate::{agent::systems::spawn_settlers, core::SimulationSet};

use super::{
    config::NeedsConfig,
    snapshot::{NeedsSaveLog, NEEDS_SAVE_PATH},
    systems::{
        flush_needs_save_log, queue_needs_snapshots, remove_starved_agents,
        request_needs_autosave, restore_needs_from_save, tick_agent_needs, NeedsAutosave,
    },
};

pub struct NeedsPlugin;

impl Plugin for NeedsPlugin {
    fn build(&self, app: &mut App) {
        let config = NeedsConfig::load_or_default();
        app.insert_resource(NeedsAutosave::new(config.autosave_interval_seconds))
            .insert_resource(config)
            .insert_resource(NeedsSaveLog::new(NEEDS_SAVE_PATH))
            .add_systems(Startup, restore_needs_from_save.after(spawn_settlers))
            .add_systems(
                Update,
                (
                    tick_agent_needs,
                    remove_starved_agents,
                    request_needs_autosave,
                    queue_needs_snapshots,
                    flush_needs_save_log,
                )
                    .chain()
                    .in_set(SimulationSet::Needs),
            );
    }
}
