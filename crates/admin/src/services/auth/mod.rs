//! Owner authentication service.
//!
//! Email + password with Argon2id hashes. The session layer stores the
//! resulting [`CurrentOwner`](crate::models::CurrentOwner); this service
//! never touches the session itself.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use storeadmin_core::{Email, RequiredText};

use crate::db::{CatalogStore, RepositoryError};
use crate::models::Owner;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Owner authentication service.
pub struct AuthService<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    /// Register a new owner.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `InvalidName` for malformed input.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::OwnerAlreadyExists` if the email is taken.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Owner, AuthError> {
        let email = Email::parse(email).map_err(AuthError::InvalidEmail)?;
        let name = RequiredText::parse(name).map_err(AuthError::InvalidName)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let owner = self
            .store
            .create_owner(&email, name.as_str(), &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::OwnerAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(owner_id = %owner.id, "owner registered");
        Ok(owner)
    }

    /// Check an email and password.
    ///
    /// Unknown emails and wrong passwords are indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Owner, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let credentials = self
            .store
            .owner_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        Ok(credentials.owner)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
