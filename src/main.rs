mod config;
mod platform;
mod post;
mod server;
mod store;
mod webhook;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::store::{PostStore, SupabaseStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment (RUST_LOG included)
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,telegram_ingest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional TOML config file; environment variables override it
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    if let Some(path) = &config_path {
        info!("Loading configuration from: {}", path.display());
    }
    let config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;

    info!("Configuration loaded successfully");
    info!("  Supabase: {}", config.supabase.url);
    info!("  Table: {}", config.supabase.table);
    match config.telegram.channel_id {
        Some(id) => info!("  Allowed channel: {}", id),
        None => info!("  Allowed channel: any"),
    }
    info!(
        "  Accept direct messages: {}",
        config.telegram.accept_direct_messages
    );
    if config.debug.test_insert_route {
        info!("  Debug route enabled: GET /test-insert");
    }

    let store: Arc<dyn PostStore> = Arc::new(SupabaseStore::new(config.supabase.clone()));

    server::run(&config, store).await
}
