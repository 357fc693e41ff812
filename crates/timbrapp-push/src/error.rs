use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("no subscriptions for user {0}")]
    NoSubscriptions(i64),

    #[error("push endpoint error: {0}")]
    Delivery(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, PushError>;
