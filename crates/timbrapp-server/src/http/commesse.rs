//! Commesse and their nested locations.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use timbrapp_planner::types::{
    CommessaDetail, Location, NewCommessa, NewLocation, UpdateCommessa, UpdateLocation,
};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

/// GET /api/commesse — active commesse with tasks and locations attached.
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<CommessaDetail>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.planner.list_commesse_attive()?))
}

/// GET /api/commesse/{id}
pub async fn detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<CommessaDetail>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .planner
        .get_commessa(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Commessa non trovata"))
}

/// POST /api/commesse
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewCommessa>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth::require(&state, &headers)?;
    let commessa = state.planner.create_commessa(&req)?;
    Ok((StatusCode::CREATED, Json(json!(commessa))))
}

/// PUT /api/commesse/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCommessa>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .planner
        .update_commessa(id, &req)?
        .map(|c| Json(json!(c)))
        .ok_or_else(|| ApiError::not_found("Commessa non trovata"))
}

/// DELETE /api/commesse/{id} — tasks and locations cascade.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    if !state.planner.delete_commessa(id)? {
        return Err(ApiError::not_found("Commessa non trovata"));
    }
    Ok(Json(json!({ "message": "Commessa eliminata con successo" })))
}

/// GET /api/commesse/{id}/locations
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Location>>, ApiError> {
    auth::require(&state, &headers)?;
    if !state.planner.commessa_exists(id)? {
        return Err(ApiError::not_found("Commessa non trovata"));
    }
    Ok(Json(state.planner.locations_for_commessa(id)?))
}

/// POST /api/commesse/{id}/locations
pub async fn create_location(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<NewLocation>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    auth::require(&state, &headers)?;
    let location = state.planner.create_location(id, &req)?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// PUT /api/commesse/{id}/locations/{location_id} — 404 unless the location
/// belongs to the commessa.
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, location_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateLocation>,
) -> Result<Json<Location>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .planner
        .update_location(id, location_id, &req)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Location non trovata"))
}

/// DELETE /api/commesse/{id}/locations/{location_id}
pub async fn remove_location(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, location_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    if !state.planner.delete_location(id, location_id)? {
        return Err(ApiError::not_found("Location non trovata"));
    }
    Ok(Json(json!({ "message": "Location eliminata con successo" })))
}
