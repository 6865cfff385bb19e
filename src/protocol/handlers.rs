//! Request handlers for the RAX secret service.
//!
//! Dispatches parsed requests against the shared validator registry. Both
//! checks and reloads hash with a deliberately slow primitive, so the async
//! entry point moves the work onto the blocking pool.

use log::{error, info};
use std::sync::Arc;

use crate::auth::ValidatorRegistry;
use crate::config::SecretsConfig;
use crate::error::ServiceError;
use crate::error::handlers::{error_to_response, handle_error};
use crate::protocol::responses::{INTERNAL_ERROR, NO_VALID_CONFIG};
use crate::protocol::{CheckSecretCall, Request, Response};

/// State shared by every connection.
#[derive(Debug)]
pub struct ServiceContext {
    pub registry: Arc<ValidatorRegistry>,
    /// Configuration file re-read on reload
    pub config_path: String,
}

impl ServiceContext {
    pub fn new(registry: Arc<ValidatorRegistry>, config_path: impl Into<String>) -> Self {
        Self {
            registry,
            config_path: config_path.into(),
        }
    }
}

/// Dispatches a request to its handler on the blocking thread pool.
pub async fn handle_request(request: Request, ctx: Arc<ServiceContext>) -> Response {
    match tokio::task::spawn_blocking(move || dispatch(&request, &ctx)).await {
        Ok(response) => response,
        Err(e) => {
            error!("Request handler failed: {}", e);
            Response::error(INTERNAL_ERROR)
        }
    }
}

/// Synchronous dispatch, usable directly where blocking is fine.
pub fn dispatch(request: &Request, ctx: &ServiceContext) -> Response {
    match request {
        Request::CheckSecret(call) => handle_check_secret(&ctx.registry, call),
        Request::Reload => handle_reload(&ctx.registry, &ctx.config_path),
    }
}

/// Validates the call and shapes the result per `full_response`.
pub fn handle_check_secret(registry: &ValidatorRegistry, call: &CheckSecretCall) -> Response {
    let result = registry.validate(&call.name, &call.value);
    Response::check(result, call.full_response)
}

/// Re-reads the configuration file and rebuilds the registry from it.
///
/// A missing or invalid file leaves the registry untouched.
pub fn handle_reload(registry: &ValidatorRegistry, config_path: &str) -> Response {
    let config = match SecretsConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Reload of {} failed: {}", config_path, e);
            return Response::error(format!("{}: {}", NO_VALID_CONFIG, e));
        }
    };

    match registry.reload(&config) {
        Ok(()) => {
            info!(
                "Reloaded {} secrets and {} groups from {}",
                config.secret_count(),
                config.group_count(),
                config_path
            );
            Response::reloaded()
        }
        Err(e) => {
            let err = ServiceError::from(e);
            handle_error(&err);
            error_to_response(&err)
        }
    }
}
