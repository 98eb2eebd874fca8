pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod hub;
pub mod sse;
pub mod state;
pub mod store;
pub mod task_log;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::services::ServeDir;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let web_root = config.web_root.clone();
    let state = AppState::new(config);

    // Mutating ingress routes (behind bearer auth middleware)
    let ingress_routes = Router::new()
        .route("/update-state", post(api::update_state))
        .route("/agent-status", post(api::set_agent_status))
        .route("/assign-task", post(api::assign_task))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    // Read-only routes and the SSE stream stay open to dashboard browsers
    let read_routes = Router::new()
        .route("/agents", get(api::get_agents))
        .route("/task-history", get(api::task_history))
        .route("/task-queue", get(api::task_queue))
        .route("/events", get(sse::event_stream));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", read_routes.merge(ingress_routes))
        .fallback_service(ServeDir::new(&web_root))
        .with_state(state.clone());

    (app, state)
}

/// Middleware wrapper that injects AuthConfig into request extensions for the
/// bearer auth middleware.
async fn bearer_auth_layer(
    axum::extract::State(state): axum::extract::State<AppState>,
    mut request: axum::extract::Request,
    next: middleware::Next,
) -> Result<axum::response::Response, axum::http::StatusCode> {
    request.extensions_mut().insert(state.auth.clone());
    auth::bearer_auth_middleware(request.headers().clone(), request, next).await
}
