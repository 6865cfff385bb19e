//! Configuration management for the RAX secret service
//!
//! Separates startup configuration (requires restart) from the secrets
//! configuration (can be replaced at runtime through a reload request).

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Complete service configuration with startup/secrets separation
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: StartupConfig,

    #[serde(flatten)]
    pub secrets: SecretsConfig,
}

/// Configuration that requires a restart to take effect
/// These values are loaded once during service initialization
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    /// IP address to bind the listener
    pub bind_address: String,

    /// Listener port, 0 picks an ephemeral port
    pub port: u16,

    /// Maximum concurrent connections
    pub max_clients: usize,

    /// Maximum length of a single request line in bytes
    pub max_request_length: usize,

    /// Argon2id work factor
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// Argon2id cost parameters
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// The reloadable part: individual secrets and groups of secrets
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SecretsConfig {
    pub secrets: Option<Vec<SecretConfig>>,
    pub groups: Option<Vec<GroupConfig>>,
}

/// A named plaintext secret. The value is wiped when the config is dropped.
#[derive(Deserialize, Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretConfig {
    pub secret: String,
    pub value: String,
}

impl SecretConfig {
    pub fn new(secret: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            value: value.into(),
        }
    }
}

impl fmt::Debug for SecretConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretConfig")
            .field("secret", &self.secret)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// A named group of secrets validated as alternatives
#[derive(Debug, Deserialize, Clone)]
pub struct GroupConfig {
    pub group: String,
    pub secrets: Vec<SecretConfig>,
}

impl ServerConfig {
    /// Load configuration from a file (TOML or YAML by extension) with environment overrides
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("RAX_SECRETS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from an in-memory document
    pub fn parse(contents: &str, format: FileFormat) -> Result<Self, config::ConfigError> {
        let config: ServerConfig = Config::builder()
            .add_source(File::from_str(contents, format))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Split into startup (immutable) and secrets (reloadable) parts
    pub fn split(self) -> (StartupConfig, SecretsConfig) {
        (self.server, self.secrets)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.server.max_request_length == 0 {
            return Err(config::ConfigError::Message(
                "max_request_length must be greater than 0".into(),
            ));
        }

        self.secrets.validate()
    }
}

impl StartupConfig {
    /// Get bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl SecretsConfig {
    /// Load only the reloadable part of the configuration at `path`
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        ServerConfig::load(path).map(|config| config.secrets)
    }

    pub fn secret_count(&self) -> usize {
        self.secrets.as_ref().map_or(0, Vec::len)
    }

    pub fn group_count(&self) -> usize {
        self.groups.as_ref().map_or(0, Vec::len)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.secrets.is_none() && self.groups.is_none() {
            return Err(config::ConfigError::Message(
                "at least one of secrets or groups must be configured".into(),
            ));
        }

        let secrets = self.secrets.as_deref().unwrap_or_default();
        ensure_unique_names(secrets.iter().map(|s| s.secret.as_str()), "secret", "")?;

        let groups = self.groups.as_deref().unwrap_or_default();
        ensure_unique_names(groups.iter().map(|g| g.group.as_str()), "group", "")?;

        for group in groups {
            let scope = format!(" in group '{}'", group.group);
            ensure_unique_names(group.secrets.iter().map(|s| s.secret.as_str()), "secret", &scope)?;
        }

        Ok(())
    }
}

fn ensure_unique_names<'a>(
    names: impl Iterator<Item = &'a str>,
    kind: &str,
    scope: &str,
) -> Result<(), config::ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(config::ConfigError::Message(format!(
                "{} name cannot be empty{}",
                kind, scope
            )));
        }
        if !seen.insert(name) {
            return Err(config::ConfigError::Message(format!(
                "duplicate {} name '{}'{}",
                kind, name, scope
            )));
        }
    }
    Ok(())
}
