//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::entities::{IdentityKey, RegisteredWallet};
use crate::domain::errors::{AuthError, SignatureError};
use async_trait::async_trait;

/// Recovers the identity that signed a message.
///
/// Pure and deterministic: no stored state, no side effects. Malformed input
/// is an error, never a panic.
pub trait SignatureVerifier: Send + Sync {
    /// Identity (`0x` + 40 lowercase hex) that produced `signature` over `message`.
    fn recover_identity(&self, message: &str, signature: &str) -> Result<String, SignatureError>;
}

/// Wallets that have authenticated at least once.
#[async_trait]
pub trait WalletRegistry: Send + Sync {
    /// Register `wallet`. Returns `true` if it was not known before.
    async fn register(&self, wallet: &IdentityKey) -> Result<bool, AuthError>;

    async fn is_registered(&self, wallet: &IdentityKey) -> Result<bool, AuthError>;

    /// All wallets ordered by address.
    async fn list(&self) -> Result<Vec<RegisteredWallet>, AuthError>;

    /// Remove `wallet`. Returns `true` if it was known.
    async fn unregister(&self, wallet: &IdentityKey) -> Result<bool, AuthError>;
}
