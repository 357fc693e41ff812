use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("user not found: {0}")]
    NotFound(i64),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, UserError>;
