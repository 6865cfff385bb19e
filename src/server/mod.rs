//! Server core functionality
//!
//! This module contains the TCP listener and accept loop that hands each
//! connection to a client handler.

pub mod core;

pub use core::Server;
