use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// Display metadata for one known agent, supplied by static configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    pub display_name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub color: String,
}

/// The fixed set of agents known to the dashboard, read-only after startup.
/// Identifiers outside the roster never enter the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub agents: Vec<AgentProfile>,
}

impl Roster {
    pub fn contains(&self, id: &str) -> bool {
        self.agents.iter().any(|a| a.id == id)
    }

    pub fn profile(&self, id: &str) -> Option<&AgentProfile> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.iter().map(|a| &a.id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
