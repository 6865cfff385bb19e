//! Error handlers
//!
//! Provides error logging and conversion to protocol responses.

use crate::error::types::ServiceError;
use crate::protocol::Response;
use crate::protocol::responses::{INTERNAL_ERROR, NO_VALID_CONFIG};
use log::error;

/// Handle a service error
pub fn handle_error(err: &ServiceError) {
    error!("Secret Service Error: {}", err);
}

/// Convert error to the response sent to the client
pub fn error_to_response(err: &ServiceError) -> Response {
    match err {
        ServiceError::Protocol(e) => Response::error(e.to_string()),
        ServiceError::Config(e) => Response::error(format!("{}: {}", NO_VALID_CONFIG, e)),
        ServiceError::Registry(e) => Response::error(format!("{}: {}", NO_VALID_CONFIG, e)),
        ServiceError::Hash(_) | ServiceError::IoError(_) => Response::error(INTERNAL_ERROR),
    }
}
