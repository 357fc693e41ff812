use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use tower_http::services::{ServeDir, ServeFile};

use crate::app::AppState;

/// Static SPA serving: files from the assets dir, unknown paths fall back to
/// `index.html` so client-side routing works on hard reloads.
pub fn spa_service(static_dir: &str) -> ServeDir<ServeFile> {
    let index = Path::new(static_dir).join("index.html");
    ServeDir::new(static_dir).fallback(ServeFile::new(index))
}

/// The service worker needs root scope and must never be cached, or clients
/// keep running a stale worker after a deploy.
pub async fn service_worker_handler(State(state): State<Arc<AppState>>) -> Response {
    let path = Path::new(&state.config.server.static_dir).join("service-worker.js");
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE.clone(), "application/javascript"),
                (HeaderName::from_static("service-worker-allowed"), "/"),
                (header::CACHE_CONTROL.clone(), "no-cache"),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
