//! Row count summary.

use shopsync_webhooks::db::{PostgresStore, WebhookStore};

use super::{CommandError, connect};

/// Print how many records have been synced.
pub async fn run() -> Result<(), CommandError> {
    let store = PostgresStore::new(connect().await?);
    let counts = store.counts().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("customers:     {}", counts.customers);
        println!("shops:         {}", counts.shops);
        println!("tags:          {}", counts.tags);
        println!("customer tags: {}", counts.customer_tags);
    }

    Ok(())
}
