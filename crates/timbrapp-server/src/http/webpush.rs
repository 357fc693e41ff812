//! Web-push subscriptions, test delivery and in-app notifications.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use timbrapp_push::types::{NewNotification, NewSubscription, Notification, PushPayload};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

/// GET /api/webpush/vapid-public-key. Open, the browser needs it before
/// it can subscribe.
pub async fn vapid_public_key(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "key": state.config.webpush.vapid_public_key }))
}

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub subscription: NewSubscription,
}

/// POST /api/webpush/subscribe, upsert by endpoint.
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let claims = auth::require(&state, &headers)?;
    let saved = state.push_store.save_subscription(claims.id, &req.subscription)?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": saved.id }))))
}

/// POST /api/webpush/test sends a test notification to every subscription
/// of the caller.
pub async fn send_test(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    let payload = PushPayload::new(
        "Notifica di Test",
        "Questa è una notifica di test dal server!",
        "/",
        "test",
    );
    let results = state.push.send_to_user(claims.id, &payload).await?;
    Ok(Json(json!({ "success": true, "results": results })))
}

/// GET /api/webpush/subscriptions, the caller's subscriptions sanitized
/// to id/endpoint/createdAt.
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    let subs: Vec<Value> = state
        .push_store
        .subscriptions_for_user(claims.id)?
        .iter()
        .map(|s| json!({ "id": s.id, "endpoint": s.endpoint, "createdAt": s.created_at }))
        .collect();
    Ok(Json(Value::Array(subs)))
}

/// DELETE /api/webpush/subscriptions/{id}, 404 unless it belongs to the
/// caller.
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    if !state.push_store.delete_subscription(claims.id, id)? {
        return Err(ApiError::not_found("Sottoscrizione non trovata"));
    }
    Ok(Json(json!({ "success": true })))
}

/// GET /api/notifications, the caller's notifications newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    Ok(Json(state.push_store.notifications_for_user(claims.id)?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// POST /api/notifications stores a notification for the target user and
/// pushes it to their subscriptions. 400 when they have none.
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<Json<Value>, ApiError> {
    auth::require(&state, &headers)?;
    state.push_store.create_notification(&NewNotification {
        user_id: req.user_id,
        message: format!("{}: {}", req.title, req.body),
        kind: "push".to_string(),
    })?;
    let payload = PushPayload::new(
        &req.title,
        &req.body,
        req.url.as_deref().unwrap_or("/"),
        "notifica",
    );
    state.push.send_to_user(req.user_id, &payload).await?;
    Ok(Json(json!({ "success": true })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    let count = state.push_store.mark_all_read(claims.id)?;
    Ok(Json(json!({ "success": true, "count": count })))
}

/// PUT /api/notifications/{id}/read, 404 unless it belongs to the caller.
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let claims = auth::require(&state, &headers)?;
    if !state.push_store.mark_read(claims.id, id)? {
        return Err(ApiError::not_found("Notifica non trovata"));
    }
    Ok(Json(json!({ "success": true })))
}
