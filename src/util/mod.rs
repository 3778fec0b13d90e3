//! Utility functions shared across the application.

mod secret;

pub use secret::SecretString;

use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind a listener to a specific host and port, failing if unavailable.
///
/// Drone is pointed at a fixed endpoint, so there is no fallback to
/// alternate ports.
pub async fn bind_listener(host: &str, port: u16) -> std::io::Result<TcpListener> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    TcpListener::bind(addr).await
}
