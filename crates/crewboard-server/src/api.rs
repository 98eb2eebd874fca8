use std::collections::{BTreeMap, HashMap};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crewboard_core::agent::{AgentUpdate, StatusKind};
use crewboard_core::task::TaskRecord;

use crate::error::AppError;
use crate::state::AppState;

/// One agent as shown on the dashboard: live status merged with the static
/// roster metadata.
#[derive(Debug, Serialize)]
pub struct AgentView {
    pub display_name: String,
    pub emoji: String,
    pub color: String,
    pub status: StatusKind,
    pub task_count: u32,
    pub productivity: u32,
}

#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub agents: BTreeMap<String, AgentView>,
}

/// GET /api/v1/agents — full snapshot merged with roster display metadata.
pub async fn get_agents(State(state): State<AppState>) -> Json<AgentsResponse> {
    let dashboard = state.dashboard.read().await;
    let roster = dashboard.roster();
    let agents = dashboard
        .snapshot()
        .into_iter()
        .map(|(id, record)| {
            let profile = roster.profile(&id);
            let view = AgentView {
                display_name: profile.map(|p| p.display_name.clone()).unwrap_or_default(),
                emoji: profile.map(|p| p.emoji.clone()).unwrap_or_default(),
                color: profile.map(|p| p.color.clone()).unwrap_or_default(),
                status: record.status,
                task_count: record.task_count,
                productivity: record.productivity,
            };
            (id, view)
        })
        .collect();
    Json(AgentsResponse { agents })
}

#[derive(Debug, Serialize)]
pub struct UpdateStateResponse {
    pub success: bool,
}

/// POST /api/v1/update-state — bulk ingress for the external sync process.
///
/// The payload must be a JSON object mapping agent id → partial update.
/// Individual entries are applied best-effort: unknown agents and invalid
/// fields are dropped silently, and the response is success whenever the
/// payload shape is valid, even if nothing was applied.
pub async fn update_state(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<UpdateStateResponse>, AppError> {
    let Some(map) = payload.as_object() else {
        return Err(AppError::BadRequest(
            "payload must be an object mapping agent id to status fields".to_string(),
        ));
    };

    let limit = state.config.limits.bulk_update_agent_limit;
    if map.len() > limit {
        return Err(AppError::BadRequest(format!(
            "Bulk update too large: {} agents (max {limit})",
            map.len()
        )));
    }

    let mut updates: HashMap<String, AgentUpdate> = HashMap::with_capacity(map.len());
    for (id, value) in map {
        match AgentUpdate::deserialize(value) {
            Ok(update) => {
                updates.insert(id.clone(), update);
            },
            Err(_) => {
                tracing::debug!(agent = %id, "dropping non-object entry in bulk update");
            },
        }
    }

    let changed = state.dashboard.write().await.apply_update(&updates);
    tracing::debug!(entries = updates.len(), changed, "applied bulk update");

    Ok(Json(UpdateStateResponse { success: true }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetStatusBody {
    pub agent: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub success: bool,
    pub agent: String,
    pub status: StatusKind,
}

/// POST /api/v1/agent-status — direct single-agent status toggle.
pub async fn set_agent_status(
    State(state): State<AppState>,
    Json(body): Json<SetStatusBody>,
) -> Result<Json<SetStatusResponse>, AppError> {
    let agent = body
        .agent
        .ok_or_else(|| AppError::BadRequest("agent field is required".to_string()))?;
    let raw_status = body
        .status
        .ok_or_else(|| AppError::BadRequest("status field is required".to_string()))?;
    let status = StatusKind::parse(&raw_status)
        .ok_or_else(|| AppError::BadRequest(format!("invalid status: {raw_status}")))?;

    state.dashboard.write().await.set_status(&agent, status)?;

    Ok(Json(SetStatusResponse {
        success: true,
        agent,
        status,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssignTaskBody {
    pub agent: Option<String>,
    pub task: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignTaskResponse {
    pub success: bool,
    pub task: TaskRecord,
}

/// POST /api/v1/assign-task — create a task assignment, when the capability
/// is enabled (403 otherwise; see `TasksConfig::allow_assignment`).
pub async fn assign_task(
    State(state): State<AppState>,
    Json(body): Json<AssignTaskBody>,
) -> Result<(StatusCode, Json<AssignTaskResponse>), AppError> {
    let agent = body
        .agent
        .ok_or_else(|| AppError::BadRequest("agent field is required".to_string()))?;
    let description = body
        .task
        .ok_or_else(|| AppError::BadRequest("task field is required".to_string()))?;

    let limit = state.config.limits.task_description_limit;
    if description.len() > limit {
        return Err(AppError::BadRequest(format!(
            "task description exceeds {limit} bytes"
        )));
    }

    let task = state
        .dashboard
        .write()
        .await
        .assign_task(&agent, &description)?;

    Ok((
        StatusCode::CREATED,
        Json(AssignTaskResponse {
            success: true,
            task,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskRecord>,
}

/// GET /api/v1/task-history — full task history, insertion order.
pub async fn task_history(State(state): State<AppState>) -> Json<TaskListResponse> {
    let dashboard = state.dashboard.read().await;
    Json(TaskListResponse {
        tasks: dashboard.history().to_vec(),
    })
}

/// GET /api/v1/task-queue — every task ever appended; the queue view is
/// never pruned because no completion protocol exists.
pub async fn task_queue(State(state): State<AppState>) -> Json<TaskListResponse> {
    let dashboard = state.dashboard.read().await;
    Json(TaskListResponse {
        tasks: dashboard.queue().to_vec(),
    })
}
