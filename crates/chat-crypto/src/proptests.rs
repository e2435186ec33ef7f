//! Property-based tests for the crypto laws.
//!
//! - decrypt(encrypt(p, k), k) == p
//! - wrong keys never yield text
//! - key derivation is symmetric, deterministic and fixed-format
//! - can_decrypt agrees with decrypt
//! - the integrity hash is fixed-format and input-sensitive

use proptest::prelude::*;

use crate::cipher::{can_decrypt, decrypt, encrypt};
use crate::config::ServerSecret;
use crate::conversation::ConversationCrypto;
use crate::integrity::compute_integrity_hash;

fn crypto() -> ConversationCrypto {
    ConversationCrypto::new(ServerSecret::new("proptest-secret-0123456789abcdefgh").unwrap())
}

fn is_lower_hex_64(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

proptest! {
    #[test]
    fn round_trip(plaintext in ".{1,200}", key in ".{1,80}") {
        let ct = encrypt(&plaintext, &key).unwrap();
        prop_assert_eq!(decrypt(&ct, &key).unwrap(), plaintext);
    }

    #[test]
    fn wrong_key_fails(plaintext in ".{1,100}", k1 in "[a-z0-9]{1,40}", k2 in "[a-z0-9]{1,40}") {
        prop_assume!(k1 != k2);
        let ct = encrypt(&plaintext, &k1).unwrap();
        prop_assert!(decrypt(&ct, &k2).is_err());
    }

    #[test]
    fn can_decrypt_agrees_with_decrypt(ciphertext in "[A-Za-z0-9+/=!-]{0,120}", key in ".{0,20}") {
        prop_assert_eq!(can_decrypt(&ciphertext, &key), decrypt(&ciphertext, &key).is_ok());
    }

    #[test]
    fn key_derivation_is_symmetric(a in "[ -~]{1,40}", b in "[ -~]{1,40}") {
        prop_assume!(!a.trim().is_empty() && !b.trim().is_empty());
        let c = crypto();
        let ab = c.derive_conversation_key(&a, &b).unwrap();
        let ba = c.derive_conversation_key(&b, &a).unwrap();
        prop_assert_eq!(ab.as_str(), ba.as_str());
    }

    #[test]
    fn key_derivation_is_deterministic_and_hex(a in "\\PC{1,60}", b in "\\PC{1,60}") {
        prop_assume!(!a.trim().is_empty() && !b.trim().is_empty());
        let c = crypto();
        let first = c.derive_conversation_key(&a, &b).unwrap();
        let second = c.derive_conversation_key(&a, &b).unwrap();
        prop_assert_eq!(first.as_str(), second.as_str());
        prop_assert!(is_lower_hex_64(first.as_str()));
    }

    #[test]
    fn integrity_hash_is_hex_and_sensitive(content in ".{0,80}", sender in "[a-z0-9]{1,24}", ts in "[0-9TZ:.-]{0,24}") {
        let h = compute_integrity_hash(&content, &sender, &ts);
        prop_assert!(is_lower_hex_64(&h));
        let changed = format!("{content}x");
        prop_assert_ne!(h, compute_integrity_hash(&changed, &sender, &ts));
    }
}
