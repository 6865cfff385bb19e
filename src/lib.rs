pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod utils;

pub use auth::{ValidateResult, ValidatorRegistry};
pub use server::Server;
