use std::collections::HashMap;

use crewboard_core::agent::{
    AgentStatus, AgentUpdate, PRODUCTIVITY_LIMIT, StatusKind, TASK_COUNT_LIMIT,
};
use crewboard_core::events::Snapshot;
use crewboard_core::roster::Roster;

/// In-memory mapping of agent id → current status record. Single source of
/// truth; populated from the roster at startup and never grows beyond it.
pub struct AgentStore {
    agents: Snapshot,
}

impl AgentStore {
    /// Seed one default record (offline, zero counts) per roster agent.
    pub fn new(roster: &Roster) -> Self {
        let agents = roster
            .ids()
            .map(|id| (id.clone(), AgentStatus::default()))
            .collect();
        Self { agents }
    }

    /// Full consistent snapshot. Callers hold the dashboard lock, so no
    /// partial reads are observable.
    pub fn snapshot(&self) -> Snapshot {
        self.agents.clone()
    }

    pub fn get(&self, id: &str) -> Option<&AgentStatus> {
        self.agents.get(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Shallow-merge partial updates over existing records.
    ///
    /// Unknown agent ids are skipped silently; they never enter the store.
    /// Out-of-range fields are dropped individually, not the whole record.
    /// Returns true when at least one field effectively changed.
    pub fn merge(&mut self, updates: &HashMap<String, AgentUpdate>) -> bool {
        let mut changed = false;
        for (id, update) in updates {
            let Some(record) = self.agents.get_mut(id.as_str()) else {
                tracing::debug!(agent = %id, "skipping update for unknown agent");
                continue;
            };
            if let Some(status) = update.status
                && record.status != status
            {
                record.status = status;
                changed = true;
            }
            if let Some(count) = update.task_count
                && count <= TASK_COUNT_LIMIT
                && record.task_count != count
            {
                record.task_count = count;
                changed = true;
            }
            if let Some(productivity) = update.productivity
                && productivity <= PRODUCTIVITY_LIMIT
                && record.productivity != productivity
            {
                record.productivity = productivity;
                changed = true;
            }
        }
        changed
    }

    /// Overwrite just the status field of a known agent. The caller has
    /// already checked the id against the roster.
    pub fn set_status(&mut self, id: &str, status: StatusKind) {
        if let Some(record) = self.agents.get_mut(id) {
            record.status = status;
        }
    }

    /// Bump the task counter after a successful log append.
    pub fn record_assignment(&mut self, id: &str) {
        if let Some(record) = self.agents.get_mut(id) {
            record.task_count = record.task_count.saturating_add(1);
        }
    }
}
