//! Module `commands`
//!
//! Defines the service calls a client can make. Each request is a single
//! JSON object tagged by its `service` field.

use serde::Deserialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A service call parsed from one request line.
#[derive(Debug, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum Request {
    /// `{"service":"check_secret","name":..,"value":..,"full_response":..}`
    CheckSecret(CheckSecretCall),
    /// `{"service":"reload"}`
    Reload,
}

/// Arguments of a `check_secret` call. The candidate value is wiped on drop.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CheckSecretCall {
    pub name: String,
    pub value: String,
    #[serde(default)]
    #[zeroize(skip)]
    pub full_response: bool,
}

impl CheckSecretCall {
    pub fn new(name: impl Into<String>, value: impl Into<String>, full_response: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            full_response,
        }
    }
}

impl fmt::Debug for CheckSecretCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckSecretCall")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("full_response", &self.full_response)
            .finish()
    }
}
