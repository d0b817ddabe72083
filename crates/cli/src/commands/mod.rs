//! CLI subcommands.
//!
//! # Environment Variables
//!
//! - `WEBHOOKS_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

pub mod migrate;
pub mod replay;
pub mod stats;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use shopsync_webhooks::db::{self, StoreError};
use shopsync_webhooks::services::ApplyError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Replay failed: {0}")]
    Apply(#[from] ApplyError),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Connect to the webhooks database.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("WEBHOOKS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("WEBHOOKS_DATABASE_URL"))?;

    tracing::info!("Connecting to webhooks database...");
    Ok(db::create_pool(&SecretString::from(database_url)).await?)
}
