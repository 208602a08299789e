//! Concurrent HTTP/1.1 front-end.
//!
//! A fixed pool of worker threads shares one reactor; the accept loop
//! spawns a task per connection and that task owns the connection until
//! the final write. CPU-bound work (parsing, the search, compression)
//! runs to completion on whichever worker picked the task up.

pub mod connection;
pub mod handler;
pub mod params;
pub mod parser;
pub mod reply;
pub mod request;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::error::{Error, Result};

pub use handler::RequestHandler;

pub struct RoutingServer {
    listener: TcpListener,
    handler: Arc<RequestHandler>,
}

impl RoutingServer {
    /// Binds the listening socket. Port 0 asks the OS for a free port,
    /// which the tests use.
    pub async fn bind(address: &str, port: u16, handler: Arc<RequestHandler>) -> Result<Self> {
        let listener = TcpListener::bind(format!("{address}:{port}"))
            .await
            .map_err(|e| Error::BindFailed(format!("{address}:{port}: {e}")))?;
        Ok(Self { listener, handler })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the surrounding task is cancelled.
    pub async fn run(&self) {
        loop {
            match self.listener.accept().await {
                Ok((socket, peer)) => {
                    let handler = self.handler.clone();
                    tokio::spawn(
                        connection::Connection::new(socket, Some(peer.ip()), handler).process(),
                    );
                }
                Err(error) => {
                    tracing::debug!("accept failed: {}", error);
                }
            }
        }
    }
}

/// Resolves once SIGINT or SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
