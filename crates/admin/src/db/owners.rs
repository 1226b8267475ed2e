//! Owner repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storeadmin_core::{Email, OwnerId};

use super::RepositoryError;
use crate::models::{Owner, OwnerCredentials};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OwnerRow {
    id: OwnerId,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OwnerRow> for OwnerCredentials {
    type Error = RepositoryError;

    fn try_from(row: OwnerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            owner: Owner {
                id: row.id,
                email,
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for owner database operations.
pub struct OwnerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OwnerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<Owner, RepositoryError> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r"
            INSERT INTO admin.owner (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, created_at, updated_at
            ",
        )
        .bind(OwnerId::generate())
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        OwnerCredentials::try_from(row).map(|c| c.owner)
    }

    /// Look up an owner and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<OwnerCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM admin.owner
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an owner by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM admin.owner
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row
            .map(OwnerCredentials::try_from)
            .transpose()?
            .map(|c| c.owner))
    }
}
