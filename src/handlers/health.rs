use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET /health - Liveness plus whether the accounts database is configured.
/// Never calls the document store.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let now = chrono::Utc::now();

    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": now,
            "version": env!("CARGO_PKG_VERSION"),
            "database_configured": state.accounts.is_configured(),
        }
    }))
}
