use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("tipologia name already in use: {0}")]
    NomeTaken(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, DocumentError>;
