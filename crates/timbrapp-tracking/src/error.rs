use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("task {task_id} does not belong to commessa {commessa_id}")]
    TaskCommessaMismatch { task_id: i64, commessa_id: i64 },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, TrackingError>;
