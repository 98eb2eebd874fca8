use std::sync::atomic::Ordering;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub connections: ConnectionInfo,
    pub agents: usize,
    pub tasks: TaskInfo,
}

#[derive(Serialize)]
pub struct ConnectionInfo {
    pub sse: usize,
}

#[derive(Serialize)]
pub struct TaskInfo {
    pub history: usize,
    pub queue: usize,
}

/// Structured health check endpoint. Returns server status, SSE subscriber
/// count, roster size, and task log totals as JSON.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let sse = state.sse_subscriber_count.load(Ordering::Relaxed);

    let (agents, history, queue) = {
        let dashboard = state.dashboard.read().await;
        (
            dashboard.roster().len(),
            dashboard.history().len(),
            dashboard.queue().len(),
        )
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        connections: ConnectionInfo { sse },
        agents,
        tasks: TaskInfo { history, queue },
    })
}

/// Readiness check — a dashboard with no roster has nothing to track.
pub async fn readiness_check(State(state): State<AppState>) -> &'static str {
    let dashboard = state.dashboard.read().await;
    if dashboard.roster().is_empty() {
        return "not ready: empty roster";
    }
    "ready"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crewboard_core::test_helpers::make_roster;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy",
            version: "0.1.0",
            connections: ConnectionInfo { sse: 2 },
            agents: 3,
            tasks: TaskInfo {
                history: 5,
                queue: 5,
            },
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"healthy\""));
        assert!(json.contains("\"sse\":2"));
        assert!(json.contains("\"agents\":3"));
    }

    #[tokio::test]
    async fn readiness_requires_roster() {
        let empty = AppState::new(ServerConfig::default());
        assert_eq!(
            readiness_check(State(empty)).await,
            "not ready: empty roster"
        );

        let ready = AppState::new(ServerConfig {
            roster: make_roster(&["alpha"]),
            ..ServerConfig::default()
        });
        assert_eq!(readiness_check(State(ready)).await, "ready");
    }
}
