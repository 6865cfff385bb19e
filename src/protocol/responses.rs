//! Service responses
//!
//! Every response is one JSON object followed by a newline.

use serde::Serialize;

use crate::auth::ValidateResult;

pub const TOO_MANY_CONNECTIONS: &str = "Too many connections. Try again later.";
pub const NO_VALID_CONFIG: &str = "A valid config could not be found";
pub const INTERNAL_ERROR: &str = "Internal error";

/// Outcome of a check, collapsed to a boolean unless the caller asked for
/// the full result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CheckResult {
    Full(ValidateResult),
    Simple(bool),
}

impl CheckResult {
    pub fn new(result: ValidateResult, full_response: bool) -> Self {
        if full_response {
            CheckResult::Full(result)
        } else {
            CheckResult::Simple(result.is_success())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Check { result: CheckResult },
    Reloaded { reloaded: bool },
    Error { error: String },
}

impl Response {
    pub fn check(result: ValidateResult, full_response: bool) -> Self {
        Response::Check {
            result: CheckResult::new(result, full_response),
        }
    }

    pub fn reloaded() -> Self {
        Response::Reloaded { reloaded: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }

    /// Format the response as a newline-terminated JSON line
    pub fn to_line(&self) -> String {
        let mut line = serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", INTERNAL_ERROR));
        line.push('\n');
        line
    }
}
