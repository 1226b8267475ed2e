//! Owner authentication error types.

use thiserror::Error;

use storeadmin_core::TextError;

use crate::db::RepositoryError;

/// Errors that can occur during owner authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(TextError),

    /// Display name missing or too long.
    #[error("invalid name: {0}")]
    InvalidName(TextError),

    /// Wrong password or unknown email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An owner with this email already exists.
    #[error("owner already exists")]
    OwnerAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
