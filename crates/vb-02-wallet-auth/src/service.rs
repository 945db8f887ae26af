//! # Wallet Authentication Service
//!
//! Application service implementing `WalletAuthApi`.
//!
//! Wraps the challenge registry with request validation and wallet
//! registration. Failures from the registry all become
//! `AuthError::InvalidSignature`.

use crate::domain::entities::{AuthenticatedWallet, IdentityKey};
use crate::domain::errors::AuthError;
use crate::ports::inbound::{ChallengeAuthApi, WalletAuthApi};
use crate::ports::outbound::WalletRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Authentication flow.
pub struct WalletAuthService {
    challenges: Arc<dyn ChallengeAuthApi>,
    wallets: Arc<dyn WalletRegistry>,
}

impl WalletAuthService {
    pub fn new(challenges: Arc<dyn ChallengeAuthApi>, wallets: Arc<dyn WalletRegistry>) -> Self {
        Self {
            challenges,
            wallets,
        }
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::EmptyField(field));
    }
    Ok(trimmed)
}

#[async_trait]
impl WalletAuthApi for WalletAuthService {
    async fn request_challenge(&self, wallet_address: &str) -> Result<String, AuthError> {
        let wallet = required(wallet_address, "walletAddress")?;
        Ok(self.challenges.issue(wallet))
    }

    async fn authenticate(
        &self,
        wallet_address: &str,
        challenge: &str,
        signature: &str,
    ) -> Result<AuthenticatedWallet, AuthError> {
        let wallet = required(wallet_address, "walletAddress")?;
        required(challenge, "challenge")?;
        required(signature, "signature")?;

        if !self.challenges.verify(wallet, challenge, signature) {
            debug!("Wallet authentication rejected");
            return Err(AuthError::InvalidSignature);
        }

        let key = IdentityKey::new(wallet);
        let is_new_user = self.wallets.register(&key).await?;
        info!(identity = %key, is_new_user, "Wallet authenticated");

        Ok(AuthenticatedWallet {
            wallet_address: key.to_string(),
            is_new_user,
        })
    }
}
