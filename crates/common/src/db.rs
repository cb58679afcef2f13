//! Shared database types
//!
//! Repository-level failures, converted into [`Error`] at the service boundary.

use crate::error::Error;
use thiserror::Error;

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The key is already taken by a row owned by someone else
    #[error("Record is owned by another member")]
    OwnedByAnotherMember,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::OwnedByAnotherMember => {
                Error::Conflict("Record is owned by another member".to_string())
            }
            RepositoryError::Connection(e) => Error::Database(e),
        }
    }
}
