//! Registration, login and the authenticated-user endpoints.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use timbrapp_core::types::UserRole;
use timbrapp_users::token::{mint_token, Claims};
use timbrapp_users::types::UserInfo;

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register — open endpoint, 409 on duplicate email.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = state
        .users
        .register(&req.nome, &req.email, &req.password, req.role)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": user.id, "email": user.email, "role": user.role })),
    ))
}

/// POST /api/auth/login — verifies the password, returns a signed token plus
/// the user shape the clients expect (isAdmin / isWebDashboard flags).
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state.users.verify_login(&req.email, &req.password)?;
    let claims = Claims {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: chrono::Utc::now().timestamp() + state.config.auth.token_ttl_hours * 3600,
    };
    let token = mint_token(&state.config.auth.secret, &claims);
    Ok(Json(json!({ "token": token, "user": UserInfo::from(&user) })))
}

/// GET /api/auth/status — echoes the authenticated claims.
pub async fn status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    Ok(Json(json!({
        "authenticated": true,
        "user": { "id": claims.id, "email": claims.email, "role": claims.role },
    })))
}

/// GET /api/user — display name of the authenticated user.
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    let user = state
        .users
        .get(claims.id)?
        .ok_or_else(|| ApiError::not_found("Utente non trovato"))?;
    Ok(Json(json!({ "name": user.nome })))
}

/// GET /api/admin/users — admin role required.
pub async fn admin_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    auth::require_admin(&state, &headers)?;
    let users: Vec<Value> = state
        .users
        .list_all()?
        .iter()
        .map(|u| {
            json!({
                "id": u.id,
                "email": u.email,
                "nome": u.nome,
                "role": u.role,
                "createdAt": u.created_at,
            })
        })
        .collect();
    Ok(Json(Value::Array(users)))
}
