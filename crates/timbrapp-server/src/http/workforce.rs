//! Dipendenti, funzioni and skill endpoints.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use timbrapp_workforce::types::{Dipendente, Funzione, NewDipendente, Skill};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

/// GET /api/dipendenti
pub async fn list_dipendenti(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Dipendente>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.workforce.list_dipendenti()?))
}

/// POST /api/dipendenti
pub async fn create_dipendente(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewDipendente>,
) -> Result<(StatusCode, Json<Dipendente>), ApiError> {
    auth::require(&state, &headers)?;
    let dipendente = state.workforce.create_dipendente(&req)?;
    Ok((StatusCode::CREATED, Json(dipendente)))
}

/// GET /api/funzioni
pub async fn list_funzioni(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Funzione>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.workforce.list_funzioni()?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFunzioneRequest {
    pub nome: String,
    #[serde(default)]
    pub descrizione: Option<String>,
    #[serde(default)]
    pub skill_ids: Vec<i64>,
}

/// POST /api/funzioni — links the given skills through funzioneskill.
pub async fn create_funzione(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateFunzioneRequest>,
) -> Result<(StatusCode, Json<Funzione>), ApiError> {
    auth::require(&state, &headers)?;
    let funzione =
        state
            .workforce
            .create_funzione(&req.nome, req.descrizione.as_deref(), &req.skill_ids)?;
    Ok((StatusCode::CREATED, Json(funzione)))
}

/// GET /api/skill
pub async fn list_skill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Skill>>, ApiError> {
    auth::require(&state, &headers)?;
    Ok(Json(state.workforce.list_skills()?))
}

#[derive(Deserialize)]
pub struct CreateSkillRequest {
    pub nome: String,
}

/// POST /api/skill
pub async fn create_skill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateSkillRequest>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    auth::require(&state, &headers)?;
    let skill = state.workforce.create_skill(&req.nome)?;
    Ok((StatusCode::CREATED, Json(skill)))
}
