//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::AuthenticatedWallet;
use crate::domain::errors::AuthError;
use async_trait::async_trait;

/// Challenge registry surface.
///
/// `verify` answers with a bare boolean: callers cannot tell a missing,
/// expired, locked-out, mismatched, or unrecoverable challenge apart.
pub trait ChallengeAuthApi: Send + Sync {
    /// Issue a fresh challenge for `identity`, replacing any pending one.
    fn issue(&self, identity: &str) -> String;

    /// Check `signature` over `challenge` against the pending record.
    fn verify(&self, identity: &str, challenge: &str, signature: &str) -> bool;
}

/// Authentication flow exposed to controllers.
#[async_trait]
pub trait WalletAuthApi: Send + Sync {
    /// Challenge text the wallet must sign.
    async fn request_challenge(&self, wallet_address: &str) -> Result<String, AuthError>;

    /// Verify the signed challenge and register the wallet on success.
    async fn authenticate(
        &self,
        wallet_address: &str,
        challenge: &str,
        signature: &str,
    ) -> Result<AuthenticatedWallet, AuthError>;
}
