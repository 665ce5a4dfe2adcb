use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers;
use crate::services::AccountService;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(accounts: AccountService) -> Self {
        Self {
            accounts: Arc::new(accounts),
        }
    }
}

/// Full application: API routes, static front-end fallback and global middleware
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .merge(account_routes())
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .with_state(state);

    // Global middleware
    let router = match cors_layer(&config.security) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

fn account_routes() -> Router<AppState> {
    use handlers::accounts;

    Router::new()
        .route("/api/accounts", get(accounts::list).post(accounts::create))
        .route("/api/accounts/:id", put(accounts::update).delete(accounts::delete))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_disabled_yields_no_layer() {
        let security = SecurityConfig { enable_cors: false, cors_origins: vec![] };
        assert!(cors_layer(&security).is_none());
    }

    #[test]
    fn cors_with_origins_builds_layer() {
        let security = SecurityConfig {
            enable_cors: true,
            cors_origins: vec!["http://localhost:5173".into(), "bad\norigin".into()],
        };
        assert!(cors_layer(&security).is_some());
    }
}
