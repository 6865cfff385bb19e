//! Client connection handling
//!
//! Reads requests from a connected client and writes back responses.

pub mod handler;

pub use handler::handle_client;
