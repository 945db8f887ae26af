//! `SignatureVerifier` for Ethereum `personal_sign` signatures.

use crate::domain::ecdsa;
use crate::domain::errors::SignatureError;
use crate::ports::outbound::SignatureVerifier;

/// secp256k1 / EIP-191 verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthereumSignatureVerifier;

impl EthereumSignatureVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerifier for EthereumSignatureVerifier {
    fn recover_identity(&self, message: &str, signature: &str) -> Result<String, SignatureError> {
        let address = ecdsa::recover_personal_signer(message, signature)?;
        Ok(ecdsa::format_address(&address))
    }
}
