#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use toktrack_api::config::AppConfig;
use toktrack_api::notion::DocumentStore;
use toktrack_api::services::AccountService;
use toktrack_api::testing::InMemoryStore;
use toktrack_api::{app, AppState};

pub const DATABASE_ID: &str = "test-accounts-db";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Pick a free port and bind it on localhost
pub async fn bind_local() -> Result<(u16, TcpListener)> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    Ok((port, listener))
}

/// Serve the full application backed by `store`
pub async fn spawn_server(store: Arc<dyn DocumentStore>, database_id: Option<&str>) -> Result<TestServer> {
    init_tracing();

    let service = AccountService::new(store, database_id.map(str::to_string), Duration::from_secs(5));
    let router = app(AppState::new(service), &AppConfig::default());

    let (port, listener) = bind_local().await?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
    })
}

/// Server over a fresh in-memory store, with the store handle for assertions
pub async fn spawn_in_memory() -> Result<(TestServer, Arc<InMemoryStore>)> {
    let store = Arc::new(InMemoryStore::new());
    let server = spawn_server(store.clone(), Some(DATABASE_ID)).await?;
    Ok((server, store))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
