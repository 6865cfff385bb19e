//! Secret service protocol
//!
//! Handles request parsing, dispatch, and response generation.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{CheckSecretCall, Request};
pub use handlers::{ServiceContext, handle_request};
pub use parser::parse_request;
pub use responses::{CheckResult, Response};
