//! Error types for worker sessions.

use thiserror::Error;

/// Errors raised while connecting to the store or executing DML.
#[derive(Error, Debug)]
pub enum SessionError {
    /// PostgreSQL connection or statement error.
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Malformed credential string.
    #[error("invalid credentials: {0}")]
    Credentials(String),

    /// Owner id has no row in the users table.
    #[error("no users row for userid {0}")]
    UnknownUser(i32),
}
