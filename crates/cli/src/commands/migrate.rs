//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Run ops migrations
//! restock-cli migrate ops
//! ```
//!
//! # Environment Variables
//!
//! - `OPS_DATABASE_URL` - `PostgreSQL` connection string for the ops
//!   database (falls back to `DATABASE_URL`, set by Fly.io postgres attach)
//!
//! # Migration Files
//!
//! Ops migrations: `crates/ops/migrations/`

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run ops database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn ops() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url("OPS_DATABASE_URL")?;

    tracing::info!("Connecting to ops database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running ops migrations...");
    sqlx::migrate!("../ops/migrations").run(&pool).await?;

    tracing::info!("Ops migrations complete!");
    Ok(())
}

/// Resolve a database URL, falling back to generic `DATABASE_URL`.
fn database_url(primary_key: &'static str) -> Result<SecretString, MigrationError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(MigrationError::MissingEnvVar(primary_key))
}
