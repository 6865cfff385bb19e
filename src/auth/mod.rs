//! Secret validation
//!
//! Compiles configured secrets and groups into salted digests and checks
//! candidate values against them.

pub mod group;
pub mod hasher;
pub mod registry;
pub mod results;
pub mod validator;

pub use group::SecretGroupValidator;
pub use hasher::{Digest, Hasher, Salt};
pub use registry::ValidatorRegistry;
pub use results::ValidateResult;
pub use validator::SecretValidator;
