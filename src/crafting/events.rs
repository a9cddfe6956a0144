//! Messages emitted by crafting jobs.
use bevy::prelude::*;

use crate::agent::AgentId;

/// A crafter finished its job and asks for the transaction to run.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct CraftRequested {
    pub entity: Entity,
    pub agent: AgentId,
    pub recipe_id: String,
}
