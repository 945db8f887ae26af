//! # Wallet Authentication Subsystem (VB-02)
//!
//! Proves control of a wallet key without passwords: the caller asks for a
//! challenge, signs it with `personal_sign`, and presents the signature.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): identity keys, challenge records, challenge
//!   text, EIP-191 signature recovery
//! - **Ports Layer** (`ports/`): `ChallengeAuthApi` and `WalletAuthApi`
//!   (inbound), `SignatureVerifier` and `WalletRegistry` (outbound)
//! - **Registry** (`registry`): per-identity challenge lifecycle
//! - **Service Layer** (`service`): authentication flow
//! - **Adapters** (`adapters/`): secp256k1 verifier, in-memory wallet registry
//!
//! ## Security Properties
//!
//! - Challenges are single-use and expire after a TTL.
//! - Repeated failures lock the challenge out; a new one must be issued.
//! - Every failure collapses to the same outcome for the caller.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod service;
pub mod sweeper;

// Re-export public API
pub use adapters::eth_verifier::EthereumSignatureVerifier;
pub use adapters::memory_wallets::InMemoryWalletRegistry;
pub use config::ChallengeConfig;
pub use domain::entities::{AuthenticatedWallet, ChallengeRecord, IdentityKey, RegisteredWallet};
pub use domain::errors::{AuthError, SignatureError};
pub use ports::inbound::{ChallengeAuthApi, WalletAuthApi};
pub use ports::outbound::{SignatureVerifier, WalletRegistry};
pub use registry::ChallengeRegistry;
pub use service::WalletAuthService;
pub use sweeper::{ChallengeSweeper, ChallengeSweeperHandle};

#[cfg(any(test, feature = "test-helpers"))]
pub use domain::ecdsa::test_helpers;
