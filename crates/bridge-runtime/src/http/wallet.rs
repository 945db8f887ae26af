//! Wallet challenge-response controllers.

use super::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use vb_02_wallet_auth::AuthenticatedWallet;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeQuery {
    #[serde(default)]
    pub wallet_address: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

/// Signed challenge presented for verification.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyRequest {
    pub wallet_address: String,
    pub challenge: String,
    pub signature: String,
}

/// `GET /api/wallet/challenge?walletAddress=..`
pub async fn challenge(
    State(state): State<AppState>,
    Query(query): Query<ChallengeQuery>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let challenge = state.auth.request_challenge(&query.wallet_address).await?;
    Ok(Json(ChallengeResponse { challenge }))
}

/// `POST /api/wallet/verify`
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<AuthenticatedWallet>, ApiError> {
    let wallet = state
        .auth
        .authenticate(
            &request.wallet_address,
            &request.challenge,
            &request.signature,
        )
        .await?;
    Ok(Json(wallet))
}
