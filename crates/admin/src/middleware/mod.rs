//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (span field, Sentry tag, response header)
//! 4. Session layer (tower-sessions, `sa_admin_session` cookie)
//!
//! Authentication is enforced per handler through the extractors in
//! [`auth`], and store ownership through the catalog service.

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod session;

pub use auth::{OptionalOwner, RequireOwner, clear_current_owner, set_current_owner};
pub use flash::{set_flash, take_flash};
pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, postgres_session_store};
