//! # HTTP Controllers
//!
//! Thin axum handlers over `LedgerSyncApi` and `WalletAuthApi`.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/api/blockchain/sync` | reconciliation pass |
//! | POST | `/api/blockchain/sync-results/:id` | result sync for one election |
//! | POST | `/api/blockchain/sync-all-results` | result sync for finalized elections |
//! | GET | `/api/blockchain/status` | ledger status |
//! | GET | `/api/results/:election_id` | cached result rows |
//! | GET | `/api/wallet/challenge` | issue challenge |
//! | POST | `/api/wallet/verify` | authenticate wallet |
//! | GET | `/health` | liveness |

pub mod blockchain;
pub mod cors;
pub mod error;
pub mod wallet;

use crate::config::CorsConfig;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use vb_01_ledger_sync::LedgerSyncApi;
use vb_02_wallet_auth::WalletAuthApi;

pub use cors::create_cors_layer;
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<dyn LedgerSyncApi>,
    pub auth: Arc<dyn WalletAuthApi>,
}

/// Build the router with tracing and CORS layers.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(cors));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/blockchain/sync", post(blockchain::sync))
        .route(
            "/api/blockchain/sync-results/:id",
            post(blockchain::sync_results),
        )
        .route(
            "/api/blockchain/sync-all-results",
            post(blockchain::sync_all_results),
        )
        .route("/api/blockchain/status", get(blockchain::status))
        .route("/api/results/:election_id", get(blockchain::results))
        .route("/api/wallet/challenge", get(wallet::challenge))
        .route("/api/wallet/verify", post(wallet::verify))
        .layer(middleware)
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bridge-runtime",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
