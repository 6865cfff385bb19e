//! Single secret validator
//!
//! Holds one secret as a salted digest and checks candidates against it.
//! The plaintext is only borrowed during construction.

use log::error;
use subtle::ConstantTimeEq;

use super::hasher::{Digest, Hasher, Salt};
use super::results::ValidateResult;
use crate::error::HashError;

#[derive(Debug, Clone)]
pub struct SecretValidator {
    name: String,
    hasher: Hasher,
    salt: Salt,
    hashed_secret: Digest,
}

impl SecretValidator {
    pub fn new(name: impl Into<String>, value: &str, hasher: &Hasher) -> Result<Self, HashError> {
        let salt = hasher.generate_salt();
        let hashed_secret = hasher.hash(value, &salt)?;

        Ok(Self {
            name: name.into(),
            hasher: hasher.clone(),
            salt,
            hashed_secret,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates the candidate against the stored digest in constant time.
    pub fn validate(&self, candidate: &str) -> ValidateResult {
        let hashed_candidate = match self.hasher.hash(candidate, &self.salt) {
            Ok(digest) => digest,
            Err(e) => {
                error!("Failed to hash candidate for secret {}: {}", self.name, e);
                return ValidateResult::FailedInvalid;
            }
        };

        if bool::from(self.hashed_secret.ct_eq(&hashed_candidate)) {
            ValidateResult::Success
        } else {
            ValidateResult::FailedInvalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hasher::test_hasher;

    #[test]
    fn accepts_configured_value() {
        let validator = SecretValidator::new("wifi", "abc123", &test_hasher()).unwrap();
        assert_eq!(validator.validate("abc123"), ValidateResult::Success);
        assert_eq!(validator.name(), "wifi");
    }

    #[test]
    fn rejects_mutated_value() {
        let validator = SecretValidator::new("wifi", "abc123", &test_hasher()).unwrap();
        assert_eq!(validator.validate("abc124"), ValidateResult::FailedInvalid);
        assert_eq!(validator.validate("abc123x"), ValidateResult::FailedInvalid);
        assert_eq!(validator.validate(""), ValidateResult::FailedInvalid);
    }

    #[test]
    fn repeated_validation_is_stable() {
        let validator = SecretValidator::new("wifi", "abc123", &test_hasher()).unwrap();
        for _ in 0..3 {
            assert_eq!(validator.validate("abc123"), ValidateResult::Success);
            assert_eq!(validator.validate("nope"), ValidateResult::FailedInvalid);
        }
    }

    #[test]
    fn each_validator_gets_its_own_salt() {
        let hasher = test_hasher();
        let a = SecretValidator::new("a", "same", &hasher).unwrap();
        let b = SecretValidator::new("b", "same", &hasher).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hashed_secret, b.hashed_secret);
    }

    #[test]
    fn empty_secret_only_matches_empty_candidate() {
        let validator = SecretValidator::new("blank", "", &test_hasher()).unwrap();
        assert_eq!(validator.validate(""), ValidateResult::Success);
        assert_eq!(validator.validate(" "), ValidateResult::FailedInvalid);
    }
}
