use thiserror::Error;

/// Workspace-level error for concerns that don't belong to a single
/// subsystem crate (each of those carries its own error enum).
#[derive(Debug, Error)]
pub enum TimbrappError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, TimbrappError>;
