use crewboard_core::task::{TaskRecord, TaskStatus};
use crewboard_core::time::unix_millis_now;

use crate::dashboard::DashboardError;

/// Append-only, in-memory task assignment log.
///
/// History and queue are two independently growing views over the same
/// appends. Nothing is ever pruned from either and the two are never
/// reconciled; the source system has no completion protocol, and inventing
/// one here would change observable behavior.
#[derive(Default)]
pub struct TaskLog {
    history: Vec<TaskRecord>,
    queue: Vec<TaskRecord>,
    last_id: u64,
}

impl TaskLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new assignment. Fails with `InvalidTask` when the
    /// description is empty. Returns the created record.
    pub fn append(&mut self, agent: &str, description: &str) -> Result<TaskRecord, DashboardError> {
        if description.trim().is_empty() {
            return Err(DashboardError::InvalidTask(
                "description must not be empty".to_string(),
            ));
        }
        let record = TaskRecord {
            id: self.next_id(),
            agent: agent.to_string(),
            description: description.to_string(),
            timestamp: crewboard_core::time::timestamp_now(),
            status: TaskStatus::Assigned,
        };
        self.history.push(record.clone());
        self.queue.push(record.clone());
        Ok(record)
    }

    /// Full history, insertion order.
    pub fn history(&self) -> &[TaskRecord] {
        &self.history
    }

    /// All tasks ever appended; nothing is removed on "completion" because
    /// no completion protocol exists.
    pub fn queue(&self) -> &[TaskRecord] {
        &self.queue
    }

    /// Time-derived id, bumped past the previous one so ids stay unique and
    /// strictly increasing even for appends within the same millisecond.
    fn next_id(&mut self) -> u64 {
        self.last_id = unix_millis_now().max(self.last_id + 1);
        self.last_id
    }
}
