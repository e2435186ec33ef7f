use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid ciphertext format: {0}")]
    InvalidFormat(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Decryption produced an empty result")]
    EmptyResult,

    #[error("Invalid encryption key or corrupted message data")]
    InvalidEncoding,

    #[error("Decrypted text is empty")]
    EmptyDecryptedText,
}

/// Stable discriminant of a [`CryptoError`], safe to put in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    EncryptionFailed,
    InvalidFormat,
    DecryptionFailed,
    EmptyResult,
    InvalidEncoding,
    EmptyDecryptedText,
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptoError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CryptoError::EncryptionFailed(_) => ErrorKind::EncryptionFailed,
            CryptoError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            CryptoError::DecryptionFailed(_) => ErrorKind::DecryptionFailed,
            CryptoError::EmptyResult => ErrorKind::EmptyResult,
            CryptoError::InvalidEncoding => ErrorKind::InvalidEncoding,
            CryptoError::EmptyDecryptedText => ErrorKind::EmptyDecryptedText,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::EncryptionFailed => "ENCRYPTION_FAILED",
            ErrorKind::InvalidFormat => "INVALID_FORMAT",
            ErrorKind::DecryptionFailed => "DECRYPTION_FAILED",
            ErrorKind::EmptyResult => "EMPTY_RESULT",
            ErrorKind::InvalidEncoding => "INVALID_ENCODING",
            ErrorKind::EmptyDecryptedText => "EMPTY_DECRYPTED_TEXT",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SERVER_SECRET is not set; refusing to derive conversation keys without it")]
    MissingSecret,

    #[error("SERVER_SECRET is empty or whitespace")]
    EmptySecret,

    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
