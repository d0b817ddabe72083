//! Replay a saved webhook body.
//!
//! Applies the payload exactly as the HTTP handler would, minus signature
//! verification. Useful for backfilling deliveries Shopify gave up on.
//!
//! ```bash
//! shopsync replay customers/update ./customer-553412611.json
//! ```

use std::path::Path;

use shopsync_webhooks::db::PostgresStore;
use shopsync_webhooks::services::sync;
use shopsync_webhooks::shopify::Topic;

use super::{CommandError, connect};

/// Apply the JSON body in `file` as a `topic` delivery.
pub async fn run(topic: Topic, file: &Path) -> Result<(), CommandError> {
    let body = tokio::fs::read(file).await.map_err(|source| CommandError::Io {
        path: file.display().to_string(),
        source,
    })?;

    let store = PostgresStore::new(connect().await?);
    let outcome = sync::apply(&store, topic, &body).await?;

    tracing::info!(%topic, %outcome, file = %file.display(), "Replay complete");
    Ok(())
}
