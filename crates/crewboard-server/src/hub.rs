use tokio::sync::broadcast;

use crewboard_core::events::DashboardEvent;

/// Fan-out point for live dashboard events.
///
/// Thin wrapper over a tokio broadcast channel: `subscribe` hands out a
/// receiver, dropping the receiver is the unsubscribe (inherently
/// idempotent), and `publish` is best-effort at-most-once per subscriber
/// with no replay. A subscriber that never signals disconnect (half-open
/// connection) keeps its slot until process restart; adding a heartbeat or
/// timeout for that case is an open backlog item.
pub struct BroadcastHub {
    tx: broadcast::Sender<DashboardEvent>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }

    /// Deliver an event to every current subscriber. A send with no
    /// receivers, or to receivers that have gone away, is swallowed; a dead
    /// subscriber must never fail an unrelated state mutation.
    pub fn publish(&self, event: DashboardEvent) {
        let _ = self.tx.send(event);
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
