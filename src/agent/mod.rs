//! Settler identity, behavior selection and spawning.
pub mod behavior;
pub mod components;
pub mod plugin;
pub mod systems;

pub use behavior::BehaviorState;
pub use components::{AgentId, Identity};
pub use plugin::AgentPlugin;
