use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("assignment already exists for task {task_id} and dipendente {dipendente_id}")]
    DuplicateAssignment { task_id: i64, dipendente_id: i64 },

    #[error("unknown dipendente ids in request")]
    UnknownDipendenti,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
