use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use toktrack_api::config;
use toktrack_api::notion::NotionClient;
use toktrack_api::services::AccountService;
use toktrack_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up NOTION_API_KEY, NOTION_DATABASE_ID, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting TokTrack API in {:?} mode", config.environment);

    if config.notion.api_key.is_none() {
        tracing::warn!("NOTION_API_KEY is not set; store calls will be rejected");
    }
    match &config.notion.database_id {
        Some(id) => tracing::info!(database_id = %id, "using Notion database"),
        None => tracing::warn!("NOTION_DATABASE_ID is not set; account endpoints will fail"),
    }

    let client = NotionClient::from_config(&config.notion)?;
    let accounts = AccountService::new(
        Arc::new(client),
        config.notion.database_id.clone(),
        config.notion.timeout(),
    );
    let app = app(AppState::new(accounts), config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("TokTrack API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
