//! Ledger synchronization controllers.

use super::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;
use vb_01_ledger_sync::{
    ElectionId, LedgerStatus, ResultRow, ResultSyncOutcome, SyncReport, SyncStatus,
};

/// Report plus a one-line summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: SyncReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSyncResponse {
    pub election_id: ElectionId,
    pub status: SyncStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(flatten)]
    pub ledger: LedgerStatus,
    pub timestamp: DateTime<Utc>,
}

/// `POST /api/blockchain/sync`
///
/// A ledger that cannot report its election count is a `502` carrying an
/// empty report.
pub async fn sync(State(state): State<AppState>) -> Response {
    match state.sync.synchronize_all().await {
        Ok(report) => Json(SyncResponse {
            message: format!(
                "Synced {} of {} elections",
                report.synced_count, report.total_count
            ),
            report,
            error: None,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Synchronization with the ledger failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(SyncResponse {
                    message: "Synchronization with the ledger failed".into(),
                    report: SyncReport::default(),
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// `POST /api/blockchain/sync-results/:id`
pub async fn sync_results(
    State(state): State<AppState>,
    Path(id): Path<ElectionId>,
) -> Result<Json<ResultSyncResponse>, ApiError> {
    let outcome: ResultSyncOutcome = state.sync.synchronize_results(id).await?;
    Ok(Json(ResultSyncResponse {
        election_id: id,
        status: outcome.status(),
        message: outcome.message(id),
    }))
}

/// `POST /api/blockchain/sync-all-results`
pub async fn sync_all_results(
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, ApiError> {
    let report = state.sync.synchronize_finalized_results().await?;
    Ok(Json(SyncResponse {
        message: format!(
            "Synced results: {} of {}",
            report.synced_count, report.total_count
        ),
        report,
        error: None,
    }))
}

/// `GET /api/blockchain/status`
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let ledger = state.sync.ledger_status().await?;
    Ok(Json(StatusResponse {
        ledger,
        timestamp: Utc::now(),
    }))
}

/// `GET /api/results/:election_id`
pub async fn results(
    State(state): State<AppState>,
    Path(election_id): Path<ElectionId>,
) -> Result<Json<Vec<ResultRow>>, ApiError> {
    Ok(Json(state.sync.cached_results(election_id).await?))
}
