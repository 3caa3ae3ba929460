//! Interaction webhook signature verification.
//!
//! Discord signs every interaction request with the application's Ed25519 key.
//! The signed message is the `X-Signature-Timestamp` header followed by the
//! raw request body.
//! Reference: https://discord.com/developers/docs/interactions/overview#setting-up-an-endpoint-validating-security-request-headers

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;
use tracing::warn;

/// Errors raised when the verification inputs are unusable.
///
/// A well-formed signature that simply does not match is not an error, the
/// verifier returns `Ok(false)` for it.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("public key is not valid hex: {0}")]
    PublicKeyEncoding(hex::FromHexError),

    #[error("public key must be 32 bytes, got {0}")]
    PublicKeyLength(usize),

    #[error("public key is not a valid Ed25519 point")]
    PublicKeyInvalid(#[source] ed25519_dalek::SignatureError),

    #[error("signature is not valid hex: {0}")]
    SignatureEncoding(hex::FromHexError),

    #[error("signature must be 64 bytes, got {0}")]
    SignatureLength(usize),
}

/// Capability to check an interaction request signature.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `timestamp || body` against `public_key`.
    fn verify(
        &self,
        body: &[u8],
        signature: &str,
        timestamp: &str,
        public_key: &str,
    ) -> Result<bool, VerificationError>;
}

/// Ed25519 verifier for hex-encoded keys and signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(
        &self,
        body: &[u8],
        signature: &str,
        timestamp: &str,
        public_key: &str,
    ) -> Result<bool, VerificationError> {
        let key_bytes = hex::decode(public_key.trim()).map_err(VerificationError::PublicKeyEncoding)?;
        let key_array: [u8; 32] = key_bytes
            .as_slice()
            .try_into()
            .map_err(|_| VerificationError::PublicKeyLength(key_bytes.len()))?;
        let key = VerifyingKey::from_bytes(&key_array).map_err(VerificationError::PublicKeyInvalid)?;

        let sig_bytes = hex::decode(signature).map_err(VerificationError::SignatureEncoding)?;
        let sig_array: [u8; 64] = sig_bytes
            .as_slice()
            .try_into()
            .map_err(|_| VerificationError::SignatureLength(sig_bytes.len()))?;
        let signature = Signature::from_bytes(&sig_array);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        let valid = key.verify(&message, &signature).is_ok();

        if !valid {
            warn!(
                timestamp = %timestamp,
                body_length = body.len(),
                "interaction_signature_mismatch"
            );
        }

        Ok(valid)
    }
}
