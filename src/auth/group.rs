//! Group of secrets validated as alternatives
//!
//! Every member value is additionally hashed under one shared group salt.
//! That digest indexes straight to the only member a candidate could match,
//! so validation costs two hashes regardless of group size. The member's own
//! salted digest then confirms the match.

use log::{debug, error};
use std::collections::HashMap;

use super::hasher::{Digest, Hasher, Salt};
use super::results::ValidateResult;
use super::validator::SecretValidator;
use crate::config::SecretConfig;
use crate::error::RegistryError;

#[derive(Debug, Clone)]
pub struct SecretGroupValidator {
    name: String,
    hasher: Hasher,
    salt: Salt,
    validators: HashMap<Digest, SecretValidator>,
}

impl SecretGroupValidator {
    /// Compiles a group. Two members whose values share an index key are
    /// rejected rather than letting one silently shadow the other.
    pub fn new(
        name: impl Into<String>,
        members: &[SecretConfig],
        hasher: &Hasher,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        let salt = hasher.generate_salt();
        let mut validators: HashMap<Digest, SecretValidator> =
            HashMap::with_capacity(members.len());

        for member in members {
            let key = hasher.hash(&member.value, &salt)?;
            if let Some(existing) = validators.get(&key) {
                return Err(RegistryError::GroupCollision {
                    group: name,
                    first: existing.name().to_string(),
                    second: member.secret.clone(),
                });
            }
            let validator = SecretValidator::new(member.secret.as_str(), &member.value, hasher)?;
            validators.insert(key, validator);
        }

        Ok(Self {
            name,
            hasher: hasher.clone(),
            salt,
            validators,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn validate(&self, candidate: &str) -> ValidateResult {
        let key = match self.hasher.hash(candidate, &self.salt) {
            Ok(key) => key,
            Err(e) => {
                error!("Failed to hash candidate for group {}: {}", self.name, e);
                return ValidateResult::FailedInvalid;
            }
        };

        match self.validators.get(&key) {
            Some(validator) => {
                debug!("Value matches known validator, performing validation");
                validator.validate(candidate)
            }
            None => {
                debug!("Value does not match a known validator");
                ValidateResult::FailedInvalid
            }
        }
    }
}
