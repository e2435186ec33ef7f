//! Per-conversation key derivation.
//!
//! key = hex(SHA-256(min(a, b) || "-" || max(a, b) || "-" || SERVER_SECRET))
//!
//! The pair is sorted so both participants derive the same key. Keys are
//! recomputed on every call and never cached.

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::cipher;
use crate::config::{CryptoConfig, ServerSecret};
use crate::error::CryptoError;

pub const CONVERSATION_KEY_HEX_LEN: usize = 64;

/// Hex-encoded 256-bit conversation key. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ConversationKey(String);

impl ConversationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ConversationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConversationKey(<redacted>)")
    }
}

/// Stateless crypto service; holds only the injected server secret.
#[derive(Debug, Clone)]
pub struct ConversationCrypto {
    secret: Arc<ServerSecret>,
}

impl ConversationCrypto {
    pub fn new(secret: ServerSecret) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }

    pub fn from_config(config: &CryptoConfig) -> Self {
        Self::new(config.server_secret.clone())
    }

    pub fn derive_conversation_key(
        &self,
        patient_id: &str,
        counselor_id: &str,
    ) -> Result<ConversationKey, CryptoError> {
        let patient = require_id(patient_id, "patientId")?;
        let counselor = require_id(counselor_id, "counselorId")?;

        let (first, second) = if patient <= counselor {
            (patient, counselor)
        } else {
            (counselor, patient)
        };

        let material = Zeroizing::new(format!(
            "{first}-{second}-{}",
            self.secret.expose()
        ));
        let digest = Sha256::digest(material.as_bytes());
        debug!("derived conversation key");
        Ok(ConversationKey(hex::encode(digest)))
    }

    /// Derive the conversation key and encrypt `plaintext` with it.
    pub fn encrypt_for(
        &self,
        patient_id: &str,
        counselor_id: &str,
        plaintext: &str,
    ) -> Result<String, CryptoError> {
        let key = self.derive_conversation_key(patient_id, counselor_id)?;
        cipher::encrypt(plaintext, key.as_str())
    }

    /// Derive the conversation key and decrypt `ciphertext` with it.
    pub fn decrypt_for(
        &self,
        patient_id: &str,
        counselor_id: &str,
        ciphertext: &str,
    ) -> Result<String, CryptoError> {
        let key = self.derive_conversation_key(patient_id, counselor_id)?;
        cipher::decrypt(ciphertext, key.as_str())
    }
}

fn require_id<'a>(id: &'a str, name: &str) -> Result<&'a str, CryptoError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CryptoError::InvalidArgument(format!(
            "{name} must be a non-empty string"
        )));
    }
    Ok(trimmed)
}
