// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::services::AccountError;

/// HTTP API error. Every variant renders as `{ "error": <message> }`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 500 Internal Server Error, required settings missing
    Configuration(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Configuration(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ApiError::Configuration(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Configuration => {
                let message = AccountError::Configuration.to_string();
                tracing::error!("{}", message);
                ApiError::configuration(message)
            }
            AccountError::InvalidInput(e) => ApiError::bad_request(format!("invalid account: {}", e)),
            AccountError::Store { operation, source } => {
                // Log the real cause, return the generic message
                tracing::error!(operation = %operation, error = %source, "store call failed");
                ApiError::internal_server_error(operation.failure_message())
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::MapperError;
    use crate::notion::StoreError;
    use crate::types::Operation;

    #[test]
    fn configuration_error_is_500_with_message() {
        let err = ApiError::from(AccountError::Configuration);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_json(),
            json!({ "error": "configuration error: NOTION_DATABASE_ID is not set" })
        );
    }

    #[test]
    fn store_errors_hide_the_cause() {
        let err = ApiError::from(AccountError::Store {
            operation: Operation::Delete,
            source: StoreError::not_found("Could not find page with ID: abc"),
        });
        assert_eq!(err, ApiError::internal_server_error("failed to delete account"));
        assert_eq!(err.to_json(), json!({ "error": "failed to delete account" }));
    }

    #[test]
    fn invalid_input_is_400() {
        let err = ApiError::from(AccountError::InvalidInput(MapperError::NotAnObject));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "invalid account: account payload must be a JSON object");
    }

    #[test]
    fn into_response_keeps_status() {
        let response = ApiError::internal_server_error("failed to fetch accounts").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
