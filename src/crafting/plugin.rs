//! Crafting plugin wiring jobs, request messages and the outcome ledger.
use bevy::prelude::*;

use crate::core::SimulationSet;

use super::{
    events::CraftRequested,
    resources::CraftingLedger,
    systems::{advance_crafting_jobs, process_craft_requests},
};

pub struct CraftingPlugin;

impl Plugin for CraftingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CraftingLedger>()
            .add_message::<CraftRequested>()
            .add_systems(
                Update,
                (advance_crafting_jobs, process_craft_requests)
                    .chain()
                    .in_set(SimulationSet::Crafting),
            );
    }
}
