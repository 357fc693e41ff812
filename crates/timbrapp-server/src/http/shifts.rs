//! Shift CRUD and the web dashboard's "today by commessa" aggregation.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use timbrapp_tracking::types::{NewShift, ShiftDetail, ShiftFilter, UpdateShift};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

const DASHBOARD_CACHE_KEY: &str = "shifts-today-by-commessa";

/// GET /api/shifts — userId/date/dateFrom/dateTo filters, ordered by date
/// then start time, rows decorated with user/commessa/task.
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(filter): Query<ShiftFilter>,
) -> Result<Json<Vec<ShiftDetail>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.tracking.list_shifts(&filter)?))
}

/// GET /api/shifts/{id}
pub async fn detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ShiftDetail>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .tracking
        .get_shift(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Turno non trovato"))
}

/// POST /api/shifts
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewShift>,
) -> Result<(StatusCode, Json<ShiftDetail>), ApiError> {
    auth::require(&state, &headers)?;
    let shift = state.tracking.create_shift(&req)?;
    state.dashboard_cache.clear();
    Ok((StatusCode::CREATED, Json(shift)))
}

/// PUT /api/shifts/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateShift>,
) -> Result<Json<ShiftDetail>, ApiError> {
    auth::require(&state, &headers)?;
    let updated = state
        .tracking
        .update_shift(id, &req)?
        .ok_or_else(|| ApiError::not_found("Turno non trovato"))?;
    state.dashboard_cache.clear();
    Ok(Json(updated))
}

/// DELETE /api/shifts/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    if !state.tracking.delete_shift(id)? {
        return Err(ApiError::not_found("Turno non trovato"));
    }
    state.dashboard_cache.clear();
    Ok(Json(json!({ "message": "Turno eliminato" })))
}

/// GET /api/shifts/today/group-by-commessa — today's shifts grouped per
/// commessa, served through the short-TTL dashboard cache.
pub async fn today_by_commessa(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    if let Some(cached) = state.dashboard_cache.get(DASHBOARD_CACHE_KEY) {
        return Ok(Json(cached));
    }

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let groups = state.tracking.shifts_today_by_commessa(&today)?;
    let body = json!(groups);
    state.dashboard_cache.put(DASHBOARD_CACHE_KEY, body.clone());
    Ok(Json(body))
}
