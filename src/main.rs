use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tgmessage::config::Config;
use tgmessage::platform::{self, InspectorState};
use tgmessage::HttpBot;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tgmessage=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  API URL: {}", config.telegram.api_url);
    info!("  Allowed users: {:?}", config.telegram.allowed_user_ids);
    info!("  Entity types: {}", config.inspector.entity_types.len());
    info!("  Forward to: {:?}", config.inspector.forward_chat_id);

    let api = HttpBot::with_api_url(&config.telegram.api_url, &config.telegram.bot_token);

    // Create shared state
    let state = Arc::new(InspectorState {
        api: Arc::new(api),
        allowed_user_ids: config.telegram.allowed_user_ids.clone(),
        inspector: config.inspector.clone(),
    });

    info!("Inspector is starting...");
    platform::telegram::run(&config.telegram.bot_token, state).await?;

    Ok(())
}
