use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, AgentStatus, StatusKind};
use crate::task::TaskRecord;

/// Full point-in-time view of agent id → status record.
pub type Snapshot = BTreeMap<AgentId, AgentStatus>;

/// Event pushed to connected dashboard clients.
///
/// Every variant carries the full snapshot so a client never has to stitch
/// partial views together; a reconnecting client resynchronizes from the
/// initial `state` event alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// Sent on subscribe and after any effective bulk merge.
    State { agents: Snapshot },
    /// Sent after a successful task log append.
    TaskAssigned { task: TaskRecord, agents: Snapshot },
    /// Sent after a direct single-agent status change.
    StatusUpdate {
        agent: AgentId,
        status: StatusKind,
        agents: Snapshot,
    },
}

impl DashboardEvent {
    /// Wire name of the variant, used as the SSE event name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::State { .. } => "state",
            Self::TaskAssigned { .. } => "task_assigned",
            Self::StatusUpdate { .. } => "status_update",
        }
    }
}
