//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Well-formed identifier with no matching record.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Identifier that does not parse for the backend's key space.
    /// Distinct from `TaskNotFound` so it can surface as a client error
    /// instead of a server fault.
    #[error("Invalid task id: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}
