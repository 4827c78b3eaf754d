//! Database migration command.
//!
//! Applies the migrations embedded from `crates/api/migrations/`. Safe to
//! re-run; already-applied migrations are skipped.

use super::{CliError, connect};

/// Run database migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}
