//! Mapping of subsystem errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;
use vb_01_ledger_sync::{LedgerError, SyncError};
use vb_02_wallet_auth::AuthError;

/// Error body `{"error": message}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        let status = match &err {
            SyncError::Ledger(LedgerError::ElectionNotFound { .. }) => StatusCode::NOT_FOUND,
            SyncError::Ledger(_) => StatusCode::BAD_GATEWAY,
            SyncError::Store(_)
            | SyncError::InvalidTimestamp { .. }
            | SyncError::CorruptOptions { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::InvalidSignature | AuthError::EmptyField(_) => StatusCode::BAD_REQUEST,
            AuthError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, error = %self.message, "Request failed");
        }
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}
