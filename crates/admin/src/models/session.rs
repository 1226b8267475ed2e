//! Session-related types for owner authentication.

use serde::{Deserialize, Serialize};

use storeadmin_core::{Email, OwnerId};

use super::owner::Owner;

/// Session-stored owner identity.
///
/// Minimal data stored in the session to identify the principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentOwner {
    /// Owner's database ID.
    pub id: OwnerId,
    /// Owner's email address.
    pub email: Email,
    /// Owner's display name.
    pub name: String,
}

impl From<&Owner> for CurrentOwner {
    fn from(owner: &Owner) -> Self {
        Self {
            id: owner.id,
            email: owner.email.clone(),
            name: owner.name.clone(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in owner.
    pub const CURRENT_OWNER: &str = "current_owner";

    /// Key for the one-shot notice shown after a redirect.
    pub const FLASH: &str = "flash";
}
