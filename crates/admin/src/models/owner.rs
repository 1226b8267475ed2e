//! Store owner domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storeadmin_core::{Email, OwnerId};

/// A store owner (domain type).
///
/// The password hash is kept out of this type so it can be serialized
/// freely; see [`OwnerCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Unique owner ID.
    pub id: OwnerId,
    /// Login email, lowercased.
    pub email: Email,
    /// Display name.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An owner together with their stored Argon2 hash, for login only.
#[derive(Debug, Clone)]
pub struct OwnerCredentials {
    pub owner: Owner,
    pub password_hash: String,
}
