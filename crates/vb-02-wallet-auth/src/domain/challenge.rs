//! Challenge text.
//!
//! `Verify your identity for <realm>. Wallet: <identity>. Timestamp: <unix>. Nonce: <hex>`
//!
//! The nonce is 32 bytes from the OS RNG, so two challenges issued in the same
//! second for the same identity still differ.

use rand::rngs::OsRng;
use rand::RngCore;
use shared_types::Timestamp;

/// Random bytes per nonce.
pub const NONCE_LEN: usize = 32;

/// Fresh hex nonce.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Challenge text bound to `identity` and `issued_at`.
pub fn challenge_text(realm: &str, identity: &str, issued_at: Timestamp, nonce: &str) -> String {
    format!(
        "Verify your identity for {realm}. Wallet: {identity}. Timestamp: {}. Nonce: {nonce}",
        issued_at.timestamp()
    )
}
