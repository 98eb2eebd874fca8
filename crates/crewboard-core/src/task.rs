use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// Lifecycle state of a task. The core only ever creates tasks as
/// `Assigned`; there is no completion or cancellation protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Assigned,
}

/// A task assignment record. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique, monotonically increasing, time-derived id.
    pub id: u64,
    pub agent: AgentId,
    pub description: String,
    pub timestamp: String,
    #[serde(default)]
    pub status: TaskStatus,
}
