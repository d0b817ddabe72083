//! Shopsync CLI - Database migrations and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply webhook database migrations
//! shopsync migrate
//!
//! # Show row counts
//! shopsync stats
//!
//! # Re-apply a saved webhook body
//! shopsync replay customers/update ./payload.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `stats` - Print synced record counts
//! - `replay` - Apply a saved webhook payload through the sync services

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopsync_webhooks::shopify::Topic;

mod commands;

#[derive(Parser)]
#[command(name = "shopsync")]
#[command(author, version, about = "Shopsync CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Print customer, shop and tag counts
    Stats,
    /// Apply a saved webhook JSON body to the database
    Replay {
        /// Webhook topic (`customer_update` or `customers/update` form)
        topic: Topic,

        /// File containing the raw JSON body
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Stats => commands::stats::run().await?,
        Commands::Replay { topic, file } => commands::replay::run(topic, &file).await?,
    }
    Ok(())
}
