//! Message envelope: AES-256-GCM over arbitrary bytes.
//!
//! The textual key is stretched per message with HKDF-SHA256 and a random
//! salt, so any non-empty string works as a key.
//!
//! Wire format (standard base64 of):
//!   [ version (1) | salt (16) | nonce (12) | ciphertext + tag (16) ]
//!
//! `version | salt` is bound as associated data.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng as AeadOsRng, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CryptoError;

pub const ENVELOPE_VERSION: u8 = 1;
pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const HEADER_LEN: usize = 1 + SALT_LEN;
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + NONCE_LEN + TAG_LEN;

const KDF_INFO: &[u8] = b"chat-envelope-v1";

fn message_key(key: &str, salt: &[u8]) -> Option<Zeroizing<[u8; 32]>> {
    let hk = Hkdf::<Sha256>::new(Some(salt), key.as_bytes());
    let mut out = Zeroizing::new([0u8; 32]);
    hk.expand(KDF_INFO, &mut out[..]).ok()?;
    Some(out)
}

/// Encrypt `payload` under `key` and return the base64 envelope.
///
/// No emptiness checks here; `cipher::encrypt` owns input validation.
pub fn seal(key: &str, payload: &[u8]) -> Result<String, CryptoError> {
    let mut header = [0u8; HEADER_LEN];
    header[0] = ENVELOPE_VERSION;
    rand::rngs::OsRng.fill_bytes(&mut header[1..]);

    let mk = message_key(key, &header[1..])
        .ok_or_else(|| CryptoError::EncryptionFailed("key derivation failed".into()))?;
    let cipher = Aes256Gcm::new_from_slice(&mk[..])
        .map_err(|e| CryptoError::EncryptionFailed(format!("cipher init: {e}")))?;
    let nonce = Aes256Gcm::generate_nonce(&mut AeadOsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: payload,
                aad: &header,
            },
        )
        .map_err(|e| CryptoError::EncryptionFailed(format!("cipher: {e}")))?;

    let mut out = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(out))
}

/// Decode and authenticate an envelope, returning the raw payload bytes.
///
/// Every failure here is a [`CryptoError::DecryptionFailed`]; callers run
/// the charset pre-check first.
pub fn open(key: &str, envelope: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let data = BASE64
        .decode(envelope)
        .map_err(|e| CryptoError::DecryptionFailed(format!("malformed ciphertext structure: {e}")))?;

    if data.len() < MIN_ENVELOPE_LEN {
        return Err(CryptoError::DecryptionFailed(format!(
            "ciphertext too short: {} bytes, need at least {MIN_ENVELOPE_LEN}",
            data.len()
        )));
    }
    if data[0] != ENVELOPE_VERSION {
        return Err(CryptoError::DecryptionFailed(format!(
            "unsupported envelope version {}",
            data[0]
        )));
    }

    let (header, rest) = data.split_at(HEADER_LEN);
    let (nonce_bytes, ct) = rest.split_at(NONCE_LEN);

    let mk = message_key(key, &header[1..])
        .ok_or_else(|| CryptoError::DecryptionFailed("key derivation failed".into()))?;
    let cipher = Aes256Gcm::new_from_slice(&mk[..])
        .map_err(|e| CryptoError::DecryptionFailed(format!("cipher init: {e}")))?;

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ct,
                aad: header,
            },
        )
        .map_err(|_| {
            CryptoError::DecryptionFailed(
                "authentication failed (wrong key or tampered ciphertext)".into(),
            )
        })?;

    Ok(Zeroizing::new(plaintext))
}
