use std::collections::HashMap;

use tokio::sync::broadcast;

use crewboard_core::agent::{AgentUpdate, StatusKind};
use crewboard_core::events::{DashboardEvent, Snapshot};
use crewboard_core::roster::Roster;
use crewboard_core::task::TaskRecord;

use crate::hub::BroadcastHub;
use crate::store::AgentStore;
use crate::task_log::TaskLog;

/// Validation failures for dashboard operations.
#[derive(Debug, PartialEq, Eq)]
pub enum DashboardError {
    UnknownAgent(String),
    InvalidStatus(String),
    InvalidTask(String),
    AssignmentDisabled,
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAgent(id) => write!(f, "unknown agent: {id}"),
            Self::InvalidStatus(s) => write!(f, "invalid status: {s}"),
            Self::InvalidTask(m) => write!(f, "invalid task: {m}"),
            Self::AssignmentDisabled => write!(f, "task assignment is disabled"),
        }
    }
}

/// Store, log, and hub behind one owner.
///
/// The dashboard lives inside `Arc<RwLock<_>>` in `AppState`. Every mutating
/// operation runs under the write lock and publishes before releasing it, so
/// events reach the broadcast channel in exactly the order mutations were
/// applied. Subscribers pair their receiver with a snapshot under the read
/// lock, so the initial `state` event always equals the snapshot at the
/// moment of subscribing.
pub struct Dashboard {
    store: AgentStore,
    log: TaskLog,
    hub: BroadcastHub,
    roster: Roster,
    allow_assignment: bool,
}

impl Dashboard {
    pub fn new(roster: Roster, allow_assignment: bool, broadcast_capacity: usize) -> Self {
        Self {
            store: AgentStore::new(&roster),
            log: TaskLog::new(),
            hub: BroadcastHub::new(broadcast_capacity),
            roster,
            allow_assignment,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn history(&self) -> &[TaskRecord] {
        self.log.history()
    }

    pub fn queue(&self) -> &[TaskRecord] {
        self.log.queue()
    }

    pub fn subscriber_count(&self) -> usize {
        self.hub.receiver_count()
    }

    /// Register a live-update subscriber. The returned snapshot is the view
    /// the subscriber must be sent as its initial `state` event.
    pub fn subscribe(&self) -> (Snapshot, broadcast::Receiver<DashboardEvent>) {
        (self.store.snapshot(), self.hub.subscribe())
    }

    /// Bulk merge from the sync process. Field-level failures were already
    /// dropped at the boundary; unknown agents are skipped by the store.
    /// Publishes one `state` event iff something effectively changed.
    pub fn apply_update(&mut self, updates: &HashMap<String, AgentUpdate>) -> bool {
        let changed = self.store.merge(updates);
        if changed {
            self.hub.publish(DashboardEvent::State {
                agents: self.store.snapshot(),
            });
        }
        changed
    }

    /// Direct single-agent status toggle. Publishes a `status_update` event,
    /// a distinct shape from the bulk `state` event so consumers can tell
    /// single-field changes from full resyncs.
    pub fn set_status(&mut self, agent: &str, status: StatusKind) -> Result<(), DashboardError> {
        if !self.roster.contains(agent) {
            return Err(DashboardError::UnknownAgent(agent.to_string()));
        }
        self.store.set_status(agent, status);
        self.hub.publish(DashboardEvent::StatusUpdate {
            agent: agent.to_string(),
            status,
            agents: self.store.snapshot(),
        });
        Ok(())
    }

    /// Record a task assignment: append to the log, bump the agent's task
    /// counter, publish `task_assigned`.
    ///
    /// Disabled by default. Task descriptions can originate from an agent's
    /// own transcript, and replaying those back into the system as commands
    /// is an injection vector, so deployments must opt in explicitly.
    pub fn assign_task(
        &mut self,
        agent: &str,
        description: &str,
    ) -> Result<TaskRecord, DashboardError> {
        if !self.allow_assignment {
            return Err(DashboardError::AssignmentDisabled);
        }
        if !self.roster.contains(agent) {
            return Err(DashboardError::UnknownAgent(agent.to_string()));
        }
        let record = self.log.append(agent, description)?;
        self.store.record_assignment(agent);
        self.hub.publish(DashboardEvent::TaskAssigned {
            task: record.clone(),
            agents: self.store.snapshot(),
        });
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewboard_core::test_helpers::{make_roster, status_update};

    fn dashboard() -> Dashboard {
        Dashboard::new(make_roster(&["alpha", "bravo"]), true, 64)
    }

    #[test]
    fn merge_mixing_known_and_unknown_agents() {
        let mut dash = dashboard();
        let mut updates = HashMap::new();
        updates.insert("alpha".to_string(), status_update(StatusKind::Busy));
        updates.insert("ghost".to_string(), status_update(StatusKind::Online));

        assert!(dash.apply_update(&updates));
        let snapshot = dash.snapshot();
        assert_eq!(snapshot["alpha"].status, StatusKind::Busy);
        assert!(!snapshot.contains_key("ghost"));
    }

    #[tokio::test]
    async fn effective_merge_publishes_one_state_event() {
        let mut dash = dashboard();
        let (_, mut rx) = dash.subscribe();

        let mut updates = HashMap::new();
        updates.insert("alpha".to_string(), status_update(StatusKind::Idle));
        dash.apply_update(&updates);

        let event = rx.recv().await.unwrap();
        match event {
            DashboardEvent::State { agents } => {
                assert_eq!(agents["alpha"].status, StatusKind::Idle);
            },
            other => panic!("expected state event, got: {other:?}"),
        }
        assert!(rx.try_recv().is_err(), "exactly one event expected");
    }

    #[tokio::test]
    async fn ineffective_merge_publishes_nothing() {
        let mut dash = dashboard();
        let (_, mut rx) = dash.subscribe();

        let mut updates = HashMap::new();
        updates.insert("alpha".to_string(), status_update(StatusKind::Offline));
        assert!(!dash.apply_update(&updates));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn subscribe_snapshot_matches_store_at_that_moment() {
        let mut dash = dashboard();
        let mut updates = HashMap::new();
        updates.insert("bravo".to_string(), status_update(StatusKind::Busy));
        dash.apply_update(&updates);

        let (snapshot, _rx) = dash.subscribe();
        assert_eq!(snapshot, dash.snapshot());
        assert_eq!(snapshot["bravo"].status, StatusKind::Busy);
    }

    #[tokio::test]
    async fn set_status_publishes_status_update_event() {
        let mut dash = dashboard();
        let (_, mut rx) = dash.subscribe();

        dash.set_status("alpha", StatusKind::Online).unwrap();

        match rx.recv().await.unwrap() {
            DashboardEvent::StatusUpdate {
                agent,
                status,
                agents,
            } => {
                assert_eq!(agent, "alpha");
                assert_eq!(status, StatusKind::Online);
                assert_eq!(agents["alpha"].status, StatusKind::Online);
            },
            other => panic!("expected status_update, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn set_status_unknown_agent_changes_nothing() {
        let mut dash = dashboard();
        let (before, mut rx) = dash.subscribe();

        let err = dash.set_status("charlie", StatusKind::Online).unwrap_err();
        assert_eq!(err, DashboardError::UnknownAgent("charlie".to_string()));
        assert_eq!(dash.snapshot(), before);
        assert!(rx.try_recv().is_err(), "no event may be published");
    }

    #[tokio::test]
    async fn assign_task_increments_count_and_publishes() {
        let mut dash = dashboard();
        let (_, mut rx) = dash.subscribe();

        let record = dash.assign_task("alpha", "write release notes").unwrap();
        assert_eq!(record.agent, "alpha");

        assert_eq!(dash.snapshot()["alpha"].task_count, 1);
        assert_eq!(dash.history().len(), 1);
        assert_eq!(dash.queue().len(), 1);

        match rx.recv().await.unwrap() {
            DashboardEvent::TaskAssigned { task, agents } => {
                assert_eq!(task.id, record.id);
                assert_eq!(agents["alpha"].task_count, 1);
            },
            other => panic!("expected task_assigned, got: {other:?}"),
        }
        assert!(rx.try_recv().is_err(), "exactly one event expected");
    }

    #[tokio::test]
    async fn assignment_disabled_rejects_and_publishes_nothing() {
        let mut dash = Dashboard::new(make_roster(&["alpha"]), false, 64);
        let (_, mut rx) = dash.subscribe();

        let err = dash.assign_task("alpha", "do X").unwrap_err();
        assert_eq!(err, DashboardError::AssignmentDisabled);
        assert!(dash.history().is_empty());
        assert_eq!(dash.snapshot()["alpha"].task_count, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn assign_task_validation_order() {
        let mut dash = dashboard();
        assert_eq!(
            dash.assign_task("ghost", "do X").unwrap_err(),
            DashboardError::UnknownAgent("ghost".to_string())
        );
        assert!(matches!(
            dash.assign_task("alpha", "  ").unwrap_err(),
            DashboardError::InvalidTask(_)
        ));
        // Failed appends must not bump the counter.
        assert_eq!(dash.snapshot()["alpha"].task_count, 0);
    }

    #[tokio::test]
    async fn events_are_delivered_in_mutation_order() {
        let mut dash = dashboard();
        let (_, mut rx) = dash.subscribe();

        dash.set_status("alpha", StatusKind::Busy).unwrap();
        dash.assign_task("alpha", "first").unwrap();
        let mut updates = HashMap::new();
        updates.insert("bravo".to_string(), status_update(StatusKind::Online));
        dash.apply_update(&updates);

        assert_eq!(rx.recv().await.unwrap().kind(), "status_update");
        assert_eq!(rx.recv().await.unwrap().kind(), "task_assigned");
        assert_eq!(rx.recv().await.unwrap().kind(), "state");
    }
}
