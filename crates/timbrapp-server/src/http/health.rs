use axum::Json;
use serde_json::{json, Value};

/// GET /api/health — liveness probe, returns server metadata.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "time": timbrapp_core::types::now_rfc3339(),
    }))
}
