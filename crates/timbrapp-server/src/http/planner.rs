//! Resource planner: assignment listing with filters and shift creation
//! directly from a task.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use timbrapp_planner::types::{Assignment, AssignmentDetail, AssignmentFilter, NewAssignment};
use timbrapp_tracking::types::{NewShift, ShiftDetail};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

/// GET /api/resourcePlanner/assignments — optional task/commessa/dipendente
/// filters, each row decorated with its task, commessa and dipendente.
pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(filter): Query<AssignmentFilter>,
) -> Result<Json<Vec<AssignmentDetail>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.planner.list_assignments(&filter)?))
}

/// POST /api/resourcePlanner/assignments — duplicate (task, dipendente)
/// pairs are rejected.
pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewAssignment>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    auth::require(&state, &headers)?;
    let assignment = state.planner.create_assignment(&req)?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub ruolo: Option<String>,
    pub note: Option<String>,
}

/// PUT /api/resourcePlanner/assignments/{id}
pub async fn update_assignment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<Json<Assignment>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .planner
        .update_assignment(id, req.ruolo.as_deref(), req.note.as_deref())?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Assegnazione non trovata"))
}

/// DELETE /api/resourcePlanner/assignments/{id}
pub async fn delete_assignment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    if !state.planner.delete_assignment(id)? {
        return Err(ApiError::not_found("Assegnazione non trovata"));
    }
    Ok(Json(json!({ "message": "Assegnazione eliminata con successo" })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskShiftRequest {
    pub user_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// POST /api/resourcePlanner/tasks/{task_id}/shifts — creates a shift bound
/// to the task, deriving the commessa from it.
pub async fn create_task_shift(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(task_id): Path<i64>,
    Json(req): Json<TaskShiftRequest>,
) -> Result<(StatusCode, Json<ShiftDetail>), ApiError> {
    auth::require(&state, &headers)?;
    let task = state
        .planner
        .get_task(task_id)?
        .ok_or_else(|| ApiError::not_found("Task non trovato"))?;

    let shift = state.tracking.create_shift(&NewShift {
        user_id: req.user_id,
        resource_id: None,
        start_time: req.start_time,
        end_time: req.end_time,
        date: req.date,
        role: None,
        location: None,
        notes: req.note,
        commessa_id: Some(task.commessa_id),
        task_id: Some(task_id),
    })?;
    state.dashboard_cache.clear();
    Ok((StatusCode::CREATED, Json(shift)))
}
