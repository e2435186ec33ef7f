//! Process-wide configuration.
//!
//! The only setting is `SERVER_SECRET`, mixed into every conversation key.
//! There is no built-in default: a missing or blank secret is a startup error.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::ConfigError;

pub const SERVER_SECRET_ENV: &str = "SERVER_SECRET";

/// Secrets shorter than this still load, but are logged as weak.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// The server secret. Zeroized on drop, never printed.
#[derive(Clone)]
pub struct ServerSecret(Zeroizing<String>);

impl ServerSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret: Zeroizing<String> = Zeroizing::new(secret.into());
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if secret.len() < RECOMMENDED_SECRET_LEN {
            warn!(
                len = secret.len(),
                recommended = RECOMMENDED_SECRET_LEN,
                "server secret is shorter than recommended"
            );
        }
        Ok(Self(secret))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSecret(<redacted>)")
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    server_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CryptoConfig {
    pub server_secret: ServerSecret,
}

impl CryptoConfig {
    pub fn new(server_secret: ServerSecret) -> Self {
        Self { server_secret }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(SERVER_SECRET_ENV) {
            Ok(value) => Ok(Self::new(ServerSecret::new(value)?)),
            Err(_) => Err(ConfigError::MissingSecret),
        }
    }

    /// JSON file of the form `{"server_secret": "..."}`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = Zeroizing::new(std::fs::read_to_string(path)?);
        let file: ConfigFile = serde_json::from_str(&raw)?;
        let secret = file.server_secret.ok_or(ConfigError::MissingSecret)?;
        Ok(Self::new(ServerSecret::new(secret)?))
    }

    /// File when given, environment otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::from_env(),
        }
    }
}
