//! Clock punches, the offline sync batch import and leave requests. All
//! three are scoped to the authenticated user.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use timbrapp_tracking::types::{NewRequest, NewTimbratura, PendingEntry, Request, Timbratura};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

/// GET /api/timbrature — the caller's punches, oldest first.
pub async fn list_timbrature(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Timbratura>>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    Ok(Json(state.tracking.list_timbrature(claims.id)?))
}

/// POST /api/timbrature — the punch type is validated at the type level,
/// the timestamp is the server clock.
pub async fn create_timbratura(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewTimbratura>,
) -> Result<(StatusCode, Json<Timbratura>), ApiError> {
    let claims = auth::require(&state, &headers)?;
    let punch = state.tracking.create_timbratura(claims.id, &req)?;
    Ok((StatusCode::CREATED, Json(punch)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub pending_entries: Vec<PendingEntry>,
}

/// POST /api/sync — batch import of offline-queued punches. Malformed
/// entries get a per-entry error; valid ones still commit.
pub async fn sync_offline(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SyncRequest>,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    let results = state.tracking.sync_offline(claims.id, &req.pending_entries);
    Ok(Json(json!({ "results": results })))
}

/// GET /api/requests — the caller's leave/permit requests, newest first.
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Request>>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    Ok(Json(state.tracking.list_requests(claims.id)?))
}

/// POST /api/requests
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewRequest>,
) -> Result<(StatusCode, Json<Request>), ApiError> {
    let claims = auth::require(&state, &headers)?;
    let created = state.tracking.create_request(claims.id, &req)?;
    Ok((StatusCode::CREATED, Json(created)))
}
