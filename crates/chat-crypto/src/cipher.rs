//! String-level encrypt/decrypt used by the chat handlers.
//!
//! Decrypt runs a fixed sequence of stages; the first failure wins and no
//! partial plaintext ever leaves this module:
//!
//! 1. argument check            → `InvalidArgument`
//! 2. base64 charset pre-check  → `InvalidFormat`
//! 3. decode + authenticate     → `DecryptionFailed`
//! 4. non-empty payload         → `EmptyResult`
//! 5. UTF-8 decode              → `InvalidEncoding`
//! 6. non-empty text            → `EmptyDecryptedText`

use tracing::debug;

use crate::envelope;
use crate::error::CryptoError;

pub fn encrypt(plaintext: &str, key: &str) -> Result<String, CryptoError> {
    if plaintext.is_empty() {
        return Err(CryptoError::EncryptionFailed(
            "plaintext must be a non-empty string".into(),
        ));
    }
    if key.is_empty() {
        return Err(CryptoError::EncryptionFailed(
            "encryption key must be a non-empty string".into(),
        ));
    }

    let ciphertext = envelope::seal(key, plaintext.as_bytes())?;
    debug!(
        plaintext_len = plaintext.len(),
        envelope_len = ciphertext.len(),
        "encrypted message"
    );
    Ok(ciphertext)
}

pub fn decrypt(ciphertext: &str, key: &str) -> Result<String, CryptoError> {
    if ciphertext.is_empty() {
        return Err(CryptoError::InvalidArgument(
            "ciphertext must be a non-empty string".into(),
        ));
    }
    if key.is_empty() {
        return Err(CryptoError::InvalidArgument(
            "decryption key must be a non-empty string".into(),
        ));
    }
    check_charset(ciphertext)?;

    let payload = envelope::open(key, ciphertext)?;
    if payload.is_empty() {
        return Err(CryptoError::EmptyResult);
    }

    let text = std::str::from_utf8(&payload).map_err(|_| CryptoError::InvalidEncoding)?;
    // Cannot trigger for a non-empty UTF-8 payload.
    if text.is_empty() {
        return Err(CryptoError::EmptyDecryptedText);
    }
    Ok(text.to_owned())
}

/// True iff [`decrypt`] would succeed. Never fails.
pub fn can_decrypt(ciphertext: &str, key: &str) -> bool {
    decrypt(ciphertext, key).is_ok()
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}

/// Standard base64 alphabet, with at most two trailing `=`.
fn check_charset(ciphertext: &str) -> Result<(), CryptoError> {
    let body = ciphertext.trim_end_matches('=');
    let padding = ciphertext.len() - body.len();
    if padding > 2 {
        return Err(CryptoError::InvalidFormat(format!(
            "too much padding ({padding} '=' characters)"
        )));
    }
    if body.is_empty() {
        return Err(CryptoError::InvalidFormat(
            "ciphertext contains only padding".into(),
        ));
    }
    if let Some((pos, ch)) = body.char_indices().find(|(_, c)| !is_base64_char(*c)) {
        return Err(CryptoError::InvalidFormat(format!(
            "unexpected character {ch:?} at position {pos}; expected base64"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";

    #[test]
    fn round_trip() {
        let msg = "Hello, how are you feeling today?";
        let ct = encrypt(msg, KEY).unwrap();
        assert_eq!(decrypt(&ct, KEY).unwrap(), msg);
    }

    #[test]
    fn round_trip_unicode() {
        let msg = "Ça va? 今日はどう? 🙂";
        let ct = encrypt(msg, "any key at all").unwrap();
        assert_eq!(decrypt(&ct, "any key at all").unwrap(), msg);
    }

    #[test]
    fn ciphertext_is_base64() {
        let ct = encrypt("x", KEY).unwrap();
        assert!(check_charset(&ct).is_ok());
    }

    #[test]
    fn encrypt_rejects_empty_inputs() {
        assert_eq!(
            encrypt("", KEY).unwrap_err(),
            CryptoError::EncryptionFailed("plaintext must be a non-empty string".into())
        );
        assert_eq!(
            encrypt("hi", "").unwrap_err(),
            CryptoError::EncryptionFailed("encryption key must be a non-empty string".into())
        );
    }

    #[test]
    fn decrypt_rejects_empty_inputs() {
        assert!(matches!(decrypt("", KEY), Err(CryptoError::InvalidArgument(_))));
        let ct = encrypt("hi", KEY).unwrap();
        assert!(matches!(decrypt(&ct, ""), Err(CryptoError::InvalidArgument(_))));
    }

    #[test]
    fn format_check_short_circuits() {
        let err = decrypt("not-valid-base64!!!", KEY).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidFormat(_)));
        assert!(!err.to_string().contains("authentication"));
    }

    #[test]
    fn charset_rules() {
        assert!(check_charset("QUJD").is_ok());
        assert!(check_charset("QUI=").is_ok());
        assert!(check_charset("QQ==").is_ok());
        assert!(check_charset("QQ===").is_err());
        assert!(check_charset("==").is_err());
        assert!(check_charset("QU=I").is_err());
        assert!(check_charset("QU I").is_err());
        assert!(check_charset("QU-_").is_err());
    }

    #[test]
    fn wrong_key_is_an_error() {
        let ct = encrypt("private note", KEY).unwrap();
        let err = decrypt(&ct, "some-other-key").unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionFailed(_)));
    }

    #[test]
    fn bad_base64_length_is_decryption_failure() {
        // Valid alphabet, invalid length.
        let err = decrypt("QUJDR", KEY).unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionFailed(_)));
    }

    #[test]
    fn empty_payload_is_empty_result() {
        let ct = envelope::seal(KEY, b"").unwrap();
        assert_eq!(decrypt(&ct, KEY).unwrap_err(), CryptoError::EmptyResult);
    }

    #[test]
    fn non_utf8_payload_is_invalid_encoding() {
        let ct = envelope::seal(KEY, &[0xff, 0xfe, 0x80]).unwrap();
        let err = decrypt(&ct, KEY).unwrap_err();
        assert_eq!(err, CryptoError::InvalidEncoding);
        assert_eq!(
            err.to_string(),
            "Invalid encryption key or corrupted message data"
        );
    }

    #[test]
    fn leading_bom_is_preserved() {
        let msg = "\u{feff}hello";
        let ct = encrypt(msg, KEY).unwrap();
        assert_eq!(decrypt(&ct, KEY).unwrap(), msg);
    }

    #[test]
    fn can_decrypt_matches_decrypt() {
        let ct = encrypt("probe me", KEY).unwrap();
        assert!(can_decrypt(&ct, KEY));
        assert!(!can_decrypt(&ct, "nope"));
        assert!(!can_decrypt("", KEY));
        assert!(!can_decrypt(&ct, ""));
        assert!(!can_decrypt("not-valid-base64!!!", KEY));
    }
}
