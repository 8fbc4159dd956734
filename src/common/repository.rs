// src/common/repository.rs
//! Shared repository result type
//!
//! Repositories distinguish "no such row" from a storage failure instead of
//! folding both into an empty result.

use thiserror::Error;
use tracing::error;

use super::query_builder::EntryError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Record not found")]
    NotFound,

    #[error("{0}")]
    Entries(#[from] EntryError),

    #[error("{0}")]
    Input(String),

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound)
    }

    /// Postgres `unique_violation` (SQLSTATE 23505)
    pub fn is_unique_violation(&self) -> bool {
        match self {
            RepoError::Storage(sqlx::Error::Database(db)) => db.code().as_deref() == Some("23505"),
            _ => false,
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Log a storage failure at the repository boundary and wrap it
pub fn storage_error(context: String) -> impl FnOnce(sqlx::Error) -> RepoError {
    move |e| {
        error!(error = %e, "{}", context);
        RepoError::Storage(e)
    }
}

/// Reject blank identifiers before any I/O
pub fn require_id(value: &str, message: &str) -> RepoResult<()> {
    if value.trim().is_empty() {
        return Err(RepoError::Input(message.to_string()));
    }
    Ok(())
}
