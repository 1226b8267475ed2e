//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Owner registration and password login
//! - `ownership` - The per-request ownership guard
//! - `resources` - Per-kind storage bindings for store-scoped resources
//! - `catalog` - Validated, guarded catalog operations and the store overview

pub mod auth;
pub mod catalog;
pub mod ownership;
pub mod resources;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService, MonthlyRevenue, StoreOverview};
pub use ownership::authorize;
pub use resources::{
    Billboards, Categories, Colors, DraftOf, NoFilter, Orders, Products, ResourceKind, Sizes,
};
