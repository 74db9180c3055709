//! TCP listener for the chat server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::{ParleyError, Result};

/// Chat server that accepts TCP connections.
///
/// Connection slots are bounded by a semaphore; `accept` waits for a free
/// slot before taking the next connection off the listener.
pub struct ChatListener {
    listener: TcpListener,
    semaphore: Arc<Semaphore>,
    max_connections: usize,
}

impl ChatListener {
    /// Bind to the configured address.
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;

        info!("chat server listening on {}", local_addr);

        Ok(Self {
            listener,
            semaphore: Arc::new(Semaphore::new(config.max_connections)),
            max_connections: config.max_connections,
        })
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Get the number of active connections.
    pub fn active_connections(&self) -> usize {
        self.max_connections - self.semaphore.available_permits()
    }

    /// Accept the next connection once a slot is available.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, ConnectionPermit)> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ParleyError::Io(std::io::Error::other("semaphore closed")))?;

        let (stream, addr) = self.listener.accept().await?;
        debug!("accepted connection from {}", addr);

        Ok((stream, addr, ConnectionPermit { _permit: permit }))
    }

    /// Run the accept loop, spawning `handler` for each connection.
    pub async fn run<F, Fut>(self, handler: F) -> Result<()>
    where
        F: Fn(TcpStream, SocketAddr) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let handler = Arc::new(handler);

        loop {
            match self.accept().await {
                Ok((stream, addr, permit)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        handler(stream, addr).await;
                        drop(permit);
                    });
                }
                Err(e) => {
                    error!("failed to accept connection: {}", e);
                }
            }
        }
    }
}

/// A permit representing an active connection slot.
///
/// Dropping the permit releases the slot.
pub struct ConnectionPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(max_connections: usize) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_connections,
        }
    }

    #[tokio::test]
    async fn test_bind() {
        let listener = ChatListener::bind(&test_config(10)).await.unwrap();
        assert!(listener.local_addr().is_ok());
        assert_eq!(listener.active_connections(), 0);
    }

    #[tokio::test]
    async fn test_accept_connection() {
        let listener = ChatListener::bind(&test_config(10)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (_stream, peer_addr, _permit) = listener.accept().await.unwrap();

        assert_eq!(peer_addr, client.local_addr().unwrap());
        assert_eq!(listener.active_connections(), 1);
    }

    #[tokio::test]
    async fn test_connection_slots_released_on_drop() {
        let listener = ChatListener::bind(&test_config(2)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let _c1 = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (_s1, _, permit1) = listener.accept().await.unwrap();
        let _c2 = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (_s2, _, _permit2) = listener.accept().await.unwrap();

        assert_eq!(listener.active_connections(), 2);

        drop(permit1);
        assert_eq!(listener.active_connections(), 1);
    }
}
