//! Request parsing
//!
//! Turns one line received from a client into a [`Request`].

use crate::error::ProtocolError;
use crate::protocol::Request;

/// Parses a raw request line. Surrounding whitespace, including the line
/// terminator, is ignored.
pub fn parse_request(raw: &str) -> Result<Request, ProtocolError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::MalformedRequest("empty request".into()));
    }

    Ok(serde_json::from_str(trimmed)?)
}
