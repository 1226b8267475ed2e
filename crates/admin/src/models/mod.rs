//! Domain models for admin.
//!
//! Catalog entities live in `storeadmin_core`; this module holds the types
//! only the admin needs: owners and the session-stored identity.

pub mod owner;
pub mod session;

pub use owner::{Owner, OwnerCredentials};
pub use session::{CurrentOwner, keys as session_keys};
