//! SHA-256 integrity hash stored alongside each message.
//!
//! hash = hex(SHA-256(content || sender_id || timestamp_iso)), no separators.
//! Tamper evidence for audits only; nothing verifies it on the read path.

use sha2::{Digest, Sha256};

fn digest(content: &str, sender_id: &str, timestamp_iso: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(sender_id.as_bytes());
    hasher.update(timestamp_iso.as_bytes());
    hasher.finalize().into()
}

pub fn compute_integrity_hash(content: &str, sender_id: &str, timestamp_iso: &str) -> String {
    hex::encode(digest(content, sender_id, timestamp_iso))
}

/// Recompute and compare against a stored hash (hex, any case).
pub fn verify_integrity_hash(
    expected_hex: &str,
    content: &str,
    sender_id: &str,
    timestamp_iso: &str,
) -> bool {
    let Ok(expected) = hex::decode(expected_hex) else {
        return false;
    };
    let Ok(expected) = <[u8; 32]>::try_from(expected.as_slice()) else {
        return false;
    };
    constant_time_eq(&digest(content, sender_id, timestamp_iso), &expected)
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
