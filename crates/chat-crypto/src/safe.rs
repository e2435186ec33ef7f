//! Non-failing wrappers for render paths: a bad message becomes `None`
//! ("message unavailable") plus a warning, never an error.

use tracing::warn;

use crate::cipher;

pub fn safe_encrypt(plaintext: &str, key: &str) -> Option<String> {
    match cipher::encrypt(plaintext, key) {
        Ok(ciphertext) => Some(ciphertext),
        Err(e) => {
            warn!(kind = %e.kind(), error = %e, "safe_encrypt failed");
            None
        }
    }
}

pub fn safe_decrypt(ciphertext: &str, key: &str) -> Option<String> {
    match cipher::decrypt(ciphertext, key) {
        Ok(plaintext) => Some(plaintext),
        Err(e) => {
            warn!(
                kind = %e.kind(),
                error = %e,
                ciphertext_len = ciphertext.len(),
                "safe_decrypt failed"
            );
            None
        }
    }
}
