use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// HTTP error envelope. Store errors convert into the status the original
/// API contract expects; the body is always `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<timbrapp_users::error::UserError> for ApiError {
    fn from(e: timbrapp_users::error::UserError) -> Self {
        use timbrapp_users::error::UserError;
        match e {
            UserError::EmailTaken(_) => Self::new(StatusCode::CONFLICT, e.to_string()),
            UserError::NotFound(_) => Self::not_found(e.to_string()),
            UserError::InvalidCredentials => Self::unauthorized(e.to_string()),
            UserError::PasswordHash(_) | UserError::Database(_) => Self::internal(e.to_string()),
        }
    }
}

impl From<timbrapp_workforce::error::WorkforceError> for ApiError {
    fn from(e: timbrapp_workforce::error::WorkforceError) -> Self {
        use timbrapp_workforce::error::WorkforceError;
        match e {
            WorkforceError::NotFound { .. } => Self::not_found(e.to_string()),
            WorkforceError::Database(_) => Self::internal(e.to_string()),
        }
    }
}

impl From<timbrapp_planner::error::PlannerError> for ApiError {
    fn from(e: timbrapp_planner::error::PlannerError) -> Self {
        use timbrapp_planner::error::PlannerError;
        match e {
            PlannerError::NotFound { .. } => Self::not_found(e.to_string()),
            PlannerError::DuplicateAssignment { .. } | PlannerError::UnknownDipendenti => {
                Self::bad_request(e.to_string())
            }
            PlannerError::Database(_) => Self::internal(e.to_string()),
        }
    }
}

impl From<timbrapp_tracking::error::TrackingError> for ApiError {
    fn from(e: timbrapp_tracking::error::TrackingError) -> Self {
        use timbrapp_tracking::error::TrackingError;
        match e {
            TrackingError::NotFound { .. } => Self::not_found(e.to_string()),
            TrackingError::TaskCommessaMismatch { .. } => Self::bad_request(e.to_string()),
            TrackingError::Database(_) => Self::internal(e.to_string()),
        }
    }
}

impl From<timbrapp_documents::error::DocumentError> for ApiError {
    fn from(e: timbrapp_documents::error::DocumentError) -> Self {
        use timbrapp_documents::error::DocumentError;
        match e {
            DocumentError::NotFound { .. } => Self::not_found(e.to_string()),
            DocumentError::NomeTaken(_) => Self::new(StatusCode::CONFLICT, e.to_string()),
            DocumentError::Database(_) => Self::internal(e.to_string()),
        }
    }
}

impl From<timbrapp_push::error::PushError> for ApiError {
    fn from(e: timbrapp_push::error::PushError) -> Self {
        use timbrapp_push::error::PushError;
        match e {
            PushError::NotFound { .. } => Self::not_found(e.to_string()),
            PushError::NoSubscriptions(_) => Self::bad_request(e.to_string()),
            PushError::Delivery(_) | PushError::Database(_) => Self::internal(e.to_string()),
        }
    }
}
