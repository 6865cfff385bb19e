//! Validator registry
//!
//! Routes a `(name, value)` pair to the individual secret or group of that
//! name. The compiled validators live behind one `Arc` that is swapped whole
//! on reload, so a validation always sees either the old or the new
//! configuration, never a mix.

use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::group::SecretGroupValidator;
use super::hasher::Hasher;
use super::results::ValidateResult;
use super::validator::SecretValidator;
use crate::config::SecretsConfig;
use crate::error::RegistryError;

/// One compiled configuration
#[derive(Debug, Default)]
struct Validators {
    individual: HashMap<String, SecretValidator>,
    groups: HashMap<String, SecretGroupValidator>,
}

impl Validators {
    fn build(config: &SecretsConfig, hasher: &Hasher) -> Result<Self, RegistryError> {
        let mut validators = Validators::default();

        for group in config.groups.iter().flatten() {
            let validator = SecretGroupValidator::new(group.group.as_str(), &group.secrets, hasher)?;
            validators.groups.insert(group.group.clone(), validator);
        }

        for secret in config.secrets.iter().flatten() {
            let validator = SecretValidator::new(secret.secret.as_str(), &secret.value, hasher)?;
            validators.individual.insert(secret.secret.clone(), validator);
        }

        Ok(validators)
    }

    fn validate(&self, name: &str, value: &str) -> ValidateResult {
        let result = if let Some(validator) = self.individual.get(name) {
            debug!("Name {} matches a single secret, validating", name);
            validator.validate(value)
        } else if let Some(group) = self.groups.get(name) {
            debug!("Name {} matches a group of secrets, validating", name);
            group.validate(value)
        } else {
            debug!("Name {} does not match any secrets", name);
            ValidateResult::FailedInvalid
        };

        debug!("Validation result: {}", result);
        result
    }
}

/// Owns every compiled validator. Shared across connections behind an `Arc`.
#[derive(Debug)]
pub struct ValidatorRegistry {
    hasher: Hasher,
    validators: RwLock<Arc<Validators>>,
}

impl ValidatorRegistry {
    pub fn new(hasher: Hasher, config: &SecretsConfig) -> Result<Self, RegistryError> {
        info!("Loading config");
        let validators = Validators::build(config, &hasher)?;
        log_loaded(&validators);

        Ok(Self {
            hasher,
            validators: RwLock::new(Arc::new(validators)),
        })
    }

    /// Validates `value` against the secret or group called `name`.
    ///
    /// Unknown names and wrong values both give `FailedInvalid`.
    pub fn validate(&self, name: &str, value: &str) -> ValidateResult {
        // Hashing is slow; hold the lock only long enough to clone the snapshot.
        let snapshot = self.snapshot();
        snapshot.validate(name, value)
    }

    /// Replaces every validator with ones compiled from `config`.
    ///
    /// The new set is built before the lock is taken. On error the current
    /// validators stay in place.
    pub fn reload(&self, config: &SecretsConfig) -> Result<(), RegistryError> {
        info!("Reloading config");
        let validators = Validators::build(config, &self.hasher)?;
        log_loaded(&validators);

        let mut current = self
            .validators
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(validators);
        Ok(())
    }

    pub fn secret_count(&self) -> usize {
        self.snapshot().individual.len()
    }

    pub fn group_count(&self) -> usize {
        self.snapshot().groups.len()
    }

    fn snapshot(&self) -> Arc<Validators> {
        // The guarded value is a single Arc, so a poisoned lock still holds a complete set.
        let guard = self
            .validators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }
}

fn log_loaded(validators: &Validators) {
    info!(
        "Loaded {} secrets and {} groups",
        validators.individual.len(),
        validators.groups.len()
    );
}
