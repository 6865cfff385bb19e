//! Authentication result types
//!
//! Defines the outcome returned by every validation attempt.

use serde::Serialize;
use std::fmt;

/// Result of validating a candidate value against a secret or group.
///
/// `FailedAttemptsExceeded` and `FailedRateExceeded` are reserved for lockout
/// and rate limiting; nothing produces them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidateResult {
    Success,
    FailedInvalid,
    FailedAttemptsExceeded,
    FailedRateExceeded,
}

impl ValidateResult {
    pub fn is_success(self) -> bool {
        self == ValidateResult::Success
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidateResult::Success => "success",
            ValidateResult::FailedInvalid => "failed_invalid",
            ValidateResult::FailedAttemptsExceeded => "failed_attempts_exceeded",
            ValidateResult::FailedRateExceeded => "failed_rate_exceeded",
        }
    }
}

impl fmt::Display for ValidateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
