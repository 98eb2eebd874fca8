use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::auth::AuthConfig;
use crate::config::ServerConfig;
use crate::dashboard::Dashboard;

pub type SharedDashboard = Arc<RwLock<Dashboard>>;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    pub auth: AuthConfig,
    pub sse_subscriber_count: Arc<AtomicUsize>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let auth = AuthConfig {
            bearer_token: config.auth.bearer_token.clone(),
        };
        let dashboard = Dashboard::new(
            config.roster.clone(),
            config.tasks.allow_assignment,
            config.limits.broadcast_capacity,
        );
        Self {
            dashboard: Arc::new(RwLock::new(dashboard)),
            auth,
            sse_subscriber_count: Arc::new(AtomicUsize::new(0)),
            config: Arc::new(config),
        }
    }
}

/// RAII counter for live SSE connections: increments on creation,
/// decrements when the subscriber's stream is dropped.
pub struct ConnectionGuard {
    counter: Arc<AtomicUsize>,
}

impl ConnectionGuard {
    pub fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self { counter }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
    }
}
