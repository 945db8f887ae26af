//! # Authentication Errors

use thiserror::Error;

/// Errors from parsing a signature or recovering its signer.
///
/// The challenge registry treats every variant as a failed attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature is not valid hex.
    #[error("Signature is not valid hex")]
    InvalidEncoding,

    /// The signature is not 65 bytes `r || s || v`.
    #[error("Signature must be 65 bytes, got {0}")]
    InvalidLength(usize),

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,
}

/// Errors surfaced by the authentication flow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Verification failed. Deliberately carries no reason.
    #[error("Invalid signature")]
    InvalidSignature,

    /// A required request field was empty.
    #[error("{0} is required")]
    EmptyField(&'static str),

    /// The wallet registry failed.
    #[error("Wallet registry error: {0}")]
    Registry(String),
}
