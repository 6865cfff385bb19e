use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::client::handle_client;
use crate::config::StartupConfig;
use crate::protocol::responses::TOO_MANY_CONNECTIONS;
use crate::protocol::{Response, ServiceContext};

pub struct Server {
    listener: TcpListener,
    ctx: Arc<ServiceContext>,
    config: Arc<StartupConfig>,
    connection_limit: Arc<Semaphore>,
}

impl Server {
    pub async fn bind(config: StartupConfig, ctx: ServiceContext) -> io::Result<Self> {
        let socket = config.listen_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", listener.local_addr()?);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e);
            }
        };

        Ok(Self {
            listener,
            ctx: Arc::new(ctx),
            connection_limit: Arc::new(Semaphore::new(config.max_clients)),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting RAX secret service on {} (max {} clients)",
            self.config.listen_socket(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let permit = match Arc::clone(&self.connection_limit).try_acquire_owned() {
                        Ok(permit) => permit,
                        Err(_) => {
                            warn!("Rejecting {}: connection limit reached", addr);
                            tokio::spawn(reject_client(stream));
                            continue;
                        }
                    };

                    let ctx = Arc::clone(&self.ctx);
                    let max_request_length = self.config.max_request_length;

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        info!("Client connected: {}", addr);
                        handle_client(stream, addr, ctx, max_request_length).await;
                        drop(permit);
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

async fn reject_client(mut stream: TcpStream) {
    let line = Response::error(TOO_MANY_CONNECTIONS).to_line();
    if let Err(e) = stream.write_all(line.as_bytes()).await {
        warn!("Failed to notify rejected client: {}", e);
    }
    let _ = stream.shutdown().await;
}
