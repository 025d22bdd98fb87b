//! TCP listener.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections
//!
//! There is deliberately no connection cap: every `/hang` request pins a
//! connection for the life of the process, and a cap would let those starve
//! the other endpoints.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};

use crate::config::ListenerConfig;
use crate::observability::Logger;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// Failed to accept connection.
    #[error("failed to accept: {0}")]
    Accept(#[source] std::io::Error),
}

pub struct Listener {
    inner: TcpListener,
    logger: Logger,
}

impl Listener {
    /// Bind to the configured address.
    pub async fn bind(config: &ListenerConfig, logger: &Logger) -> Result<Self, ListenerError> {
        let addr = config.bind_address();
        let inner = TcpListener::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind { addr, source })?;
        Self::from_tcp(inner, logger)
    }

    /// Adopt an already bound listener.
    pub fn from_tcp(inner: TcpListener, logger: &Logger) -> Result<Self, ListenerError> {
        let local_addr = inner.local_addr().map_err(ListenerError::Accept)?;
        logger.in_scope(|| tracing::info!(address = %local_addr, "Listener bound"));

        Ok(Self {
            inner,
            logger: logger.clone(),
        })
    }

    /// Accept a new connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        self.logger
            .in_scope(|| tracing::debug!(peer_addr = %addr, "Connection accepted"));
        Ok((stream, addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}
