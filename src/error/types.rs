//! Error types
//!
//! Defines domain-specific error types for each module of the secret service.
//! Validation outcomes are not errors and never appear here; see
//! [`crate::auth::ValidateResult`].

use std::fmt;
use std::io;

/// Hashing primitive errors
#[derive(Debug)]
pub enum HashError {
    InvalidParams(String),
    HashingFailed(String),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashError::InvalidParams(msg) => write!(f, "Invalid hashing parameters: {}", msg),
            HashError::HashingFailed(msg) => write!(f, "Hashing failed: {}", msg),
        }
    }
}

impl std::error::Error for HashError {}

impl From<argon2::Error> for HashError {
    fn from(error: argon2::Error) -> Self {
        HashError::HashingFailed(error.to_string())
    }
}

/// Validator registry errors, raised while compiling a configuration
#[derive(Debug)]
pub enum RegistryError {
    Hash(HashError),
    GroupCollision {
        group: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Hash(e) => write!(f, "Failed to hash secret: {}", e),
            RegistryError::GroupCollision {
                group,
                first,
                second,
            } => write!(
                f,
                "Secrets '{}' and '{}' in group '{}' share the same value",
                first, second, group
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<HashError> for RegistryError {
    fn from(error: HashError) -> Self {
        RegistryError::Hash(error)
    }
}

/// Wire protocol errors
#[derive(Debug)]
pub enum ProtocolError {
    MalformedRequest(String),
    RequestTooLong(usize),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MalformedRequest(msg) => write!(f, "Malformed request: {}", msg),
            ProtocolError::RequestTooLong(max) => {
                write!(f, "Request exceeds maximum length of {} bytes", max)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<serde_json::Error> for ProtocolError {
    fn from(error: serde_json::Error) -> Self {
        // serde_json only reports positions and type names, never field contents
        ProtocolError::MalformedRequest(error.to_string())
    }
}

/// General service error that encompasses all error types
#[derive(Debug)]
pub enum ServiceError {
    Config(config::ConfigError),
    Hash(HashError),
    Registry(RegistryError),
    Protocol(ProtocolError),
    IoError(io::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(e) => write!(f, "Configuration error: {}", e),
            ServiceError::Hash(e) => write!(f, "Hashing error: {}", e),
            ServiceError::Registry(e) => write!(f, "Registry error: {}", e),
            ServiceError::Protocol(e) => write!(f, "Protocol error: {}", e),
            ServiceError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<config::ConfigError> for ServiceError {
    fn from(error: config::ConfigError) -> Self {
        ServiceError::Config(error)
    }
}

impl From<HashError> for ServiceError {
    fn from(error: HashError) -> Self {
        ServiceError::Hash(error)
    }
}

impl From<RegistryError> for ServiceError {
    fn from(error: RegistryError) -> Self {
        ServiceError::Registry(error)
    }
}

impl From<ProtocolError> for ServiceError {
    fn from(error: ProtocolError) -> Self {
        ServiceError::Protocol(error)
    }
}

impl From<io::Error> for ServiceError {
    fn from(error: io::Error) -> Self {
        ServiceError::IoError(error)
    }
}
