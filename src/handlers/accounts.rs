use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use serde_json::Value;

use crate::accounts::{Account, AccountFields};
use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{AccountError, Deleted};

/// Parse a JSON body into account fields, keeping the `{error}` response shape on failure
fn fields_from_body(body: Result<Json<Value>, JsonRejection>) -> Result<AccountFields, ApiError> {
    let Json(payload) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    Ok(AccountFields::from_json(payload).map_err(AccountError::from)?)
}

/// GET /api/accounts - List all accounts
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Account>>, ApiError> {
    let accounts = state.accounts.list().await?;
    Ok(Json(accounts))
}

/// POST /api/accounts - Create an account
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    let fields = fields_from_body(body)?;
    let account = state.accounts.create(&fields).await?;
    Ok(Json(account))
}

/// PUT /api/accounts/:id - Replace an account's fields. A missing lastPost clears it.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    let fields = fields_from_body(body)?;
    let account = state.accounts.update(&id, &fields).await?;
    Ok(Json(account))
}

/// DELETE /api/accounts/:id - Archive an account
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let deleted = state.accounts.delete(&id).await?;
    Ok(Json(deleted))
}
