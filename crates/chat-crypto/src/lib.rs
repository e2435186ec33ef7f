//! Message encryption and integrity hashing for counseling chat.
//!
//! Every operation is a pure function of its inputs plus the server secret
//! injected at startup. Nothing is cached or persisted; keys are re-derived
//! on every call.
//!
//! # Module layout
//! - `config`: `SERVER_SECRET` loading (env or JSON file), no fallback
//! - `conversation`: `ConversationCrypto`, order-independent key derivation
//! - `envelope`: AES-256-GCM byte sealing, base64 wire format
//! - `cipher`: string encrypt / decrypt / can_decrypt
//! - `integrity`: SHA-256 message hash for audits
//! - `safe`: `Option`-returning wrappers for render paths
//! - `message`: send/read path over stored chat messages
//! - `error`: error taxonomy

pub mod cipher;
pub mod config;
pub mod conversation;
pub mod envelope;
pub mod error;
pub mod integrity;
pub mod message;
pub mod safe;

#[cfg(test)]
mod proptests;

pub use cipher::{can_decrypt, decrypt, encrypt};
pub use config::{CryptoConfig, ServerSecret};
pub use conversation::{ConversationCrypto, ConversationKey};
pub use error::{ConfigError, CryptoError, ErrorKind};
pub use integrity::{compute_integrity_hash, verify_integrity_hash};
pub use message::{IntegrityStatus, Participants, StoredMessage};
pub use safe::{safe_decrypt, safe_encrypt};
