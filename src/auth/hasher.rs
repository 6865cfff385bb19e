//! Salted one-way hashing
//!
//! Wraps Argon2id. Digests are deterministic for a `(plaintext, salt)` pair,
//! so the same hasher can both compile a secret and check a candidate.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use std::fmt;
use subtle::{Choice, ConstantTimeEq};

use crate::config::HashingConfig;
use crate::error::HashError;

pub const SALT_LEN: usize = 16;
pub const DIGEST_LEN: usize = 32;

/// Random salt drawn from the OS generator
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(..)")
    }
}

/// Raw hash output, usable as a map key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl ConstantTimeEq for Digest {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest(..)")
    }
}

#[derive(Clone)]
pub struct Hasher {
    argon2: Argon2<'static>,
}

impl Hasher {
    /// Build a hasher with the given work factor. Rejects parameters Argon2 cannot use.
    pub fn new(config: &HashingConfig) -> Result<Self, HashError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            Some(DIGEST_LEN),
        )
        .map_err(|e| HashError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn generate_salt(&self) -> Salt {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        Salt(salt)
    }

    pub fn hash(&self, plaintext: &str, salt: &Salt) -> Result<Digest, HashError> {
        let mut out = [0u8; DIGEST_LEN];
        self.argon2
            .hash_password_into(plaintext.as_bytes(), salt.as_bytes(), &mut out)?;
        Ok(Digest(out))
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.argon2.params();
        f.debug_struct("Hasher")
            .field("memory_kib", &params.m_cost())
            .field("iterations", &params.t_cost())
            .field("parallelism", &params.p_cost())
            .finish()
    }
}

/// Minimal-cost hasher so unit tests stay fast. Never use outside tests.
#[cfg(test)]
pub(crate) fn test_hasher() -> Hasher {
    Hasher::new(&HashingConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid Argon2 params for tests")
}
