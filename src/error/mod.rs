//! Error handling
//!
//! Defines error types and handling for the secret service.

pub mod handlers;
pub mod types;

pub use types::*;
