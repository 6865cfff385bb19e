//! RAX Secret Service - Entry Point
//!
//! Validates named secrets and groups of secrets over a line-based JSON protocol.

use log::{error, info};
use std::process;
use std::sync::Arc;

use rax_secret_service::auth::{Hasher, ValidatorRegistry};
use rax_secret_service::config::ServerConfig;
use rax_secret_service::error::ServiceError;
use rax_secret_service::protocol::ServiceContext;
use rax_secret_service::server::Server;
use rax_secret_service::utils::logging::setup_logging;

const DEFAULT_CONFIG_PATH: &str = "config";

#[tokio::main]
async fn main() {
    setup_logging();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    info!("Launching secret service with config {}...", config_path);

    let server = match build_server(&config_path).await {
        Ok(server) => server,
        Err(e) => {
            error!("Startup failed: {}", e);
            process::exit(1);
        }
    };

    server.start().await;
}

async fn build_server(config_path: &str) -> Result<Server, ServiceError> {
    let (startup, secrets) = ServerConfig::load(config_path)?.split();
    let hasher = Hasher::new(&startup.hashing)?;
    info!("Using {:?}", hasher);

    let registry = tokio::task::spawn_blocking(move || ValidatorRegistry::new(hasher, &secrets))
        .await
        .map_err(|e| ServiceError::IoError(std::io::Error::other(e)))??;

    let ctx = ServiceContext::new(Arc::new(registry), config_path);
    Ok(Server::bind(startup, ctx).await?)
}
