//! Agent identity components and supporting resources.
use std::fmt;

use bevy::prelude::*;

/// Unique identifier for an agent. Ordering follows spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Component)]
pub struct AgentId(u64);

impl AgentId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AGENT-{:04}", self.0)
    }
}

#[derive(Component, Debug, Clone)]
pub struct Identity {
    pub id: AgentId,
    pub display_name: String,
    /// Entity definition the agent was spawned from.
    pub definition_id: String,
}

impl Identity {
    pub fn new(
        id: AgentId,
        display_name: impl Into<String>,
        definition_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            definition_id: definition_id.into(),
        }
    }
}

/// Resource that issues monotonically increasing agent ids, starting at 1.
#[derive(Resource, Debug)]
pub struct AgentIdGenerator {
    next: u64,
}

impl AgentIdGenerator {
    pub fn next_id(&mut self) -> AgentId {
        let id = self.next;
        self.next += 1;
        AgentId::new(id)
    }
}

impl Default for AgentIdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_padded() {
        let mut generator = AgentIdGenerator::default();
        let first = generator.next_id();
        let second = generator.next_id();

        assert!(first < second);
        assert_eq!(first.to_string(), "AGENT-0001");
        assert_eq!(AgentId::new(12345).to_string(), "AGENT-12345");
    }
}
