//! Agent plugin wiring identity data, settler spawning and behavior selection.
use bevy::prelude::*;

use crate::{
    agent::{
        components::AgentIdGenerator,
        systems::{apply_behavior_recovery, spawn_settlers, update_agent_behavior},
    },
    core::SimulationSet,
};

pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AgentIdGenerator>()
            .add_systems(Startup, spawn_settlers)
            .add_systems(
                Update,
                (update_agent_behavior, apply_behavior_recovery)
                    .chain()
                    .in_set(SimulationSet::Behavior),
            );
    }
}
