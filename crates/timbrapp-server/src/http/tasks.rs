//! Task CRUD and the per-task assignment set.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use timbrapp_planner::types::{AssignedDipendente, NewTask, Task, UpdateTask};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

/// GET /api/tasks
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Task>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.planner.list_tasks()?))
}

/// GET /api/tasks/{id}
pub async fn detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .planner
        .get_task(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task non trovato"))
}

/// POST /api/tasks — the commessa and funzione must exist.
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    auth::require(&state, &headers)?;
    if req.nome.trim().is_empty() {
        return Err(ApiError::bad_request("Il nome del task è obbligatorio"));
    }
    let task = state.planner.create_task(&req)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTask>,
) -> Result<Json<Task>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .planner
        .update_task(id, &req)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task non trovato"))
}

/// DELETE /api/tasks/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    if !state.planner.delete_task(id)? {
        return Err(ApiError::not_found("Task non trovato"));
    }
    Ok(Json(json!({ "message": "Task eliminato con successo" })))
}

/// GET /api/tasks/{id}/personale — employees assigned to the task.
pub async fn personale(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Vec<AssignedDipendente>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.planner.personale_for_task(id)?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPersonaleRequest {
    pub personale_ids: Vec<i64>,
}

/// POST /api/tasks/{id}/personale — replace the assignment set; 400 when
/// any id is unknown.
pub async fn set_personale(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<SetPersonaleRequest>,
) -> Result<Json<Vec<AssignedDipendente>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.planner.set_task_personale(id, &req.personale_ids)?))
}
