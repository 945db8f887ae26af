//! # Personal-Sign Recovery (secp256k1)
//!
//! Recovers the wallet address that produced an Ethereum `personal_sign`
//! signature.
//!
//! ## Scheme
//!
//! - Message hash: `keccak256("\x19Ethereum Signed Message:\n" + len + message)` (EIP-191)
//! - Signature: 65 bytes `r || s || v`, hex encoded, optional `0x` prefix
//! - `v` in {0, 1, 27, 28}
//! - Address: last 20 bytes of `keccak256(uncompressed pubkey without 0x04)`
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be strictly below half the curve order
//! - **Scalar Range Validation**: R and S must be in [1, n-1] (enforced by `Signature::from_slice`)
//! - **Constant-Time Operations**: the low-S check uses `subtle`

use super::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use subtle::Choice;

/// 32-byte Keccak digest.
pub type Hash = [u8; 32];

/// 20-byte account address.
pub type Address = [u8; 20];

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Half of the secp256k1 curve order (for malleability check).
/// n/2 where n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Parsed `r || s || v` signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl RecoverableSignature {
    /// Hex form, `0x`-prefixed.
    pub fn to_hex(&self) -> String {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        format!("0x{}", hex::encode(bytes))
    }
}

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// EIP-191 hash of a `personal_sign` message.
pub fn personal_message_hash(message: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    hash
}

/// Parse a hex `r || s || v` signature.
pub fn parse_signature(signature: &str) -> Result<RecoverableSignature, SignatureError> {
    let trimmed = signature.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidEncoding)?;
    if bytes.len() != SIGNATURE_LEN {
        return Err(SignatureError::InvalidLength(bytes.len()));
    }

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..64]);
    Ok(RecoverableSignature { r, s, v: bytes[64] })
}

/// Recover the signer's address from a prehashed message.
pub fn recover_address(
    message_hash: &Hash,
    signature: &RecoverableSignature,
) -> Result<Address, SignatureError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalleableSignature);
    }

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| SignatureError::RecoveryFailed)?;

    let recovered_key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered_key))
}

/// Recover the signer of a `personal_sign` signature over `message`.
pub fn recover_personal_signer(message: &str, signature: &str) -> Result<Address, SignatureError> {
    let parsed = parse_signature(signature)?;
    recover_address(&personal_message_hash(message.as_bytes()), &parsed)
}

/// Derive Ethereum address from public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point tag.
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// `0x` + 40 lowercase hex digits.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Check if S value is strictly below half the curve order, in constant time.
fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for (s_byte, h_byte) in s.iter().zip(SECP256K1_HALF_ORDER.iter()) {
        let not_decided = !(less | greater);
        less |= not_decided & Choice::from((s_byte < h_byte) as u8);
        greater |= not_decided & Choice::from((s_byte > h_byte) as u8);
    }

    less.into()
}

/// Parse recovery ID from v value.
///
/// Accepts both raw (0, 1) and Ethereum-offset (27, 28) forms.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    //! Wallet-side signing, for tests.

    use super::*;
    use k256::ecdsa::SigningKey;

    /// Fresh random wallet key.
    pub fn generate_key() -> SigningKey {
        SigningKey::random(&mut rand::thread_rng())
    }

    /// Address of a wallet key, formatted.
    pub fn wallet_address(key: &SigningKey) -> String {
        format_address(&address_from_pubkey(key.verifying_key()))
    }

    /// Sign a message hash, normalized to low S with an Ethereum-offset `v`.
    pub fn sign_prehash(message_hash: &Hash, key: &SigningKey) -> RecoverableSignature {
        let (mut sig, mut recid) = key
            .sign_prehash_recoverable(message_hash)
            .expect("signing failed");

        if let Some(normalized) = sig.normalize_s() {
            sig = normalized;
            recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
        }

        let sig_bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        RecoverableSignature {
            r,
            s,
            v: recid.to_byte() + 27,
        }
    }

    /// `personal_sign` of `message`, hex encoded.
    pub fn personal_sign(message: &str, key: &SigningKey) -> String {
        sign_prehash(&personal_message_hash(message.as_bytes()), key).to_hex()
    }
}
