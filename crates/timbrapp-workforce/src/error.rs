use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkforceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, WorkforceError>;
