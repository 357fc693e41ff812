use axum::http::HeaderMap;
use timbrapp_users::token::{self, Claims};

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticate a request from its `Authorization: Bearer <token>` header.
/// A missing token is 401; an invalid or expired one is 403, matching the
/// API contract the clients rely on.
pub fn require(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let Some(bearer) = extract_bearer(headers) else {
        return Err(ApiError::unauthorized("Token mancante"));
    };
    token::verify_token(&state.config.auth.secret, bearer)
        .map_err(|_| ApiError::forbidden("Token non valido"))
}

/// Same as [`require`], but the token must carry the admin role.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let claims = require(state, headers)?;
    if !claims.is_admin() {
        return Err(ApiError::forbidden(
            "Solo gli admin possono accedere a questa risorsa",
        ));
    }
    Ok(claims)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
