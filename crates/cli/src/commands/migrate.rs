//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! shopsync migrate
//! ```
//!
//! # Migration Files
//!
//! `crates/webhooks/migrations/`, embedded at compile time:
//! ```text
//! migrations/
//! ├── 20260301000001_create_customer.sql
//! ├── 20260301000002_create_tag.sql
//! └── 20260301000003_create_shop.sql
//! ```

use super::{CommandError, connect};

/// Apply pending webhook database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running webhooks migrations...");
    sqlx::migrate!("../webhooks/migrations").run(&pool).await?;

    tracing::info!("Webhooks migrations complete!");
    Ok(())
}
