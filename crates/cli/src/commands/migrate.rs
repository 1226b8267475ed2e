//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! sa-cli migrate
//! ```
//!
//! Migrations live in `crates/admin/migrations/` and are embedded at
//! compile time.

use super::{CliError, connect};

/// Run admin database migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running admin migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Admin migrations complete!");
    Ok(())
}
