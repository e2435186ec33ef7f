//! Chat send/read path.
//!
//! On send the handler seals the plaintext into a [`StoredMessage`]: content
//! encrypted under the conversation key, `is_encrypted` set, and an
//! integrity hash over the plaintext. On read it opens the stored message for
//! either participant. Older rows written before encryption was enabled
//! carry plaintext content with `is_encrypted == false` and pass through.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::conversation::ConversationCrypto;
use crate::error::CryptoError;
use crate::integrity::{compute_integrity_hash, verify_integrity_hash};

/// The two parties of a counseling conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participants {
    pub patient_id: String,
    pub counselor_id: String,
}

impl Participants {
    pub fn new(patient_id: impl Into<String>, counselor_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            counselor_id: counselor_id.into(),
        }
    }
}

/// The message fields this layer writes; the rest of the chat document is
/// owned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub sender_id: String,
    pub content: String,
    pub is_encrypted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_hash: Option<String>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityStatus {
    Verified,
    Mismatch,
    Unhashed,
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn timestamp_iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl StoredMessage {
    /// A message stored without encryption.
    pub fn unencrypted(
        sender_id: impl Into<String>,
        content: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            content: content.into(),
            is_encrypted: false,
            message_hash: None,
            sent_at,
        }
    }

    /// Check the stored hash against a plaintext recovered from this message.
    pub fn verify(&self, plaintext: &str) -> IntegrityStatus {
        match &self.message_hash {
            None => IntegrityStatus::Unhashed,
            Some(hash) => {
                let ts = timestamp_iso(&self.sent_at);
                if verify_integrity_hash(hash, plaintext, &self.sender_id, &ts) {
                    IntegrityStatus::Verified
                } else {
                    IntegrityStatus::Mismatch
                }
            }
        }
    }
}

impl ConversationCrypto {
    pub fn seal_message(
        &self,
        participants: &Participants,
        sender_id: &str,
        plaintext: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<StoredMessage, CryptoError> {
        if sender_id.trim().is_empty() {
            return Err(CryptoError::InvalidArgument(
                "senderId must be a non-empty string".into(),
            ));
        }
        let content =
            self.encrypt_for(&participants.patient_id, &participants.counselor_id, plaintext)?;
        let message_hash = compute_integrity_hash(plaintext, sender_id, &timestamp_iso(&sent_at));
        Ok(StoredMessage {
            sender_id: sender_id.to_string(),
            content,
            is_encrypted: true,
            message_hash: Some(message_hash),
            sent_at,
        })
    }

    pub fn open_message(
        &self,
        participants: &Participants,
        message: &StoredMessage,
    ) -> Result<String, CryptoError> {
        if !message.is_encrypted {
            return Ok(message.content.clone());
        }
        self.decrypt_for(
            &participants.patient_id,
            &participants.counselor_id,
            &message.content,
        )
    }

    /// [`Self::open_message`] for render paths: `None` means "message unavailable".
    pub fn open_message_safe(
        &self,
        participants: &Participants,
        message: &StoredMessage,
    ) -> Option<String> {
        match self.open_message(participants, message) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(
                    kind = %e.kind(),
                    error = %e,
                    sender_id = %message.sender_id,
                    "stored message could not be opened"
                );
                None
            }
        }
    }
}
