use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crewboard_core::events::DashboardEvent;

use crate::state::{AppState, ConnectionGuard};

/// GET /api/v1/events — SSE endpoint for live dashboard updates.
///
/// Sends one `state` event carrying the full snapshot before anything else,
/// so a newly joined subscriber is never left without an initial view, then
/// relays the live feed until the client disconnects. There is no replay; a
/// reconnecting client resynchronizes from its fresh initial event.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, StatusCode> {
    let max_sse = state.config.limits.max_sse_subscribers;
    let current = state.sse_subscriber_count.load(Ordering::Relaxed);
    if current >= max_sse {
        tracing::warn!(current, max = max_sse, "SSE subscriber limit reached");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let guard = ConnectionGuard::new(Arc::clone(&state.sse_subscriber_count));

    // Snapshot and receiver are paired under the same lock acquisition, so
    // the initial event matches the store at the moment of subscribing and
    // no published event can slip in between.
    let (snapshot, rx) = {
        let dashboard = state.dashboard.read().await;
        dashboard.subscribe()
    };

    let initial = tokio_stream::once(Ok(to_sse(&DashboardEvent::State { agents: snapshot })));

    let live = BroadcastStream::new(rx).filter_map(move |result| {
        let _guard = &guard;
        match result {
            Ok(event) => Some(Ok(to_sse(&event))),
            Err(e) => {
                tracing::warn!("SSE broadcast receive error: {e}");
                None
            },
        }
    });

    Ok(Sse::new(initial.chain(live)).keep_alive(KeepAlive::default()))
}

fn to_sse(event: &DashboardEvent) -> SseEvent {
    let json = serde_json::to_string(event).unwrap_or_default();
    SseEvent::default().event(event.kind()).data(json)
}
