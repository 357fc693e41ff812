//! Tipologie documento and per-user document endpoints.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use timbrapp_documents::types::{
    Documento, DocumentoDetail, NewDocumento, NewTipologia, StatoLettura, Tipologia,
};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

/// GET /api/tipologie-documento, ordered by nome.
pub async fn list_tipologie(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Tipologia>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.documents.list_tipologie()?))
}

/// GET /api/tipologie-documento/{id}
pub async fn get_tipologia(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Tipologia>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .documents
        .get_tipologia(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tipologia documento non trovata"))
}

/// POST /api/tipologie-documento
pub async fn create_tipologia(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewTipologia>,
) -> Result<(StatusCode, Json<Tipologia>), ApiError> {
    auth::require(&state, &headers)?;
    let tipologia = state.documents.create_tipologia(&req)?;
    Ok((StatusCode::CREATED, Json(tipologia)))
}

/// PUT /api/tipologie-documento/{id}
pub async fn update_tipologia(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<NewTipologia>,
) -> Result<Json<Tipologia>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .documents
        .update_tipologia(id, &req.nome)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tipologia documento non trovata"))
}

/// DELETE /api/tipologie-documento/{id}
pub async fn delete_tipologia(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    if !state.documents.delete_tipologia(id)? {
        return Err(ApiError::not_found("Tipologia documento non trovata"));
    }
    Ok(Json(json!({ "message": "Tipologia eliminata con successo" })))
}

/// GET /api/documenti, every document with tipologia and owner.
pub async fn list_documenti(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<DocumentoDetail>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.documents.list_documenti()?))
}

/// GET /api/documenti/user/{user_id}
pub async fn documenti_for_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<DocumentoDetail>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.documents.documenti_for_user(user_id)?))
}

/// GET /api/documenti/{id}
pub async fn get_documento(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<DocumentoDetail>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .documents
        .get_documento(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Documento non trovato"))
}

/// POST /api/documenti. The user and tipologia must exist.
pub async fn create_documento(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewDocumento>,
) -> Result<(StatusCode, Json<DocumentoDetail>), ApiError> {
    auth::require(&state, &headers)?;
    let documento = state.documents.create_documento(&req)?;
    Ok((StatusCode::CREATED, Json(documento)))
}

#[derive(Deserialize)]
pub struct StatoLetturaRequest {
    pub stato_lettura: StatoLettura,
}

/// PUT /api/documenti/{id}/stato-lettura. Only "letto"/"non letto" pass
/// the enum, anything else is rejected at deserialization.
pub async fn set_stato_lettura(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<StatoLetturaRequest>,
) -> Result<Json<Documento>, ApiError> {
    auth::require(&state, &headers)?;
    state
        .documents
        .set_stato_lettura(id, req.stato_lettura)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Documento non trovato"))
}

/// DELETE /api/documenti/{id}
pub async fn delete_documento(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    if !state.documents.delete_documento(id)? {
        return Err(ApiError::not_found("Documento non trovato"));
    }
    Ok(Json(json!({ "message": "Documento eliminato con successo" })))
}
