//! Per-connection serving.
//!
//! # Responsibilities
//! - Generate connection IDs for log correlation
//! - Wrap the socket for takeover and hand it to hyper
//! - Attach `ConnectInfo` and, for HTTP/1, the `Hijacker` to every request

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, Version},
    Router,
};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use tokio::net::TcpStream;
use tower::ServiceExt;

use crate::net::hijack::HijackableIo;
use crate::observability::Logger;

/// Relaxed ordering is enough: IDs only need to be unique.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Serve HTTP on one accepted socket until the peer leaves, the protocol
/// errors, or a handler takes the socket over.
pub async fn serve_connection(stream: TcpStream, peer: SocketAddr, router: Router, logger: Logger) {
    let id = ConnectionId::new();
    let (io, hijacker) = HijackableIo::new(stream, peer);
    let takeover = hijacker.clone();

    let service = hyper::service::service_fn(move |mut request: Request<Incoming>| {
        // HTTP/2 streams share the socket, so only HTTP/1 requests may take it.
        if request.version() < Version::HTTP_2 {
            request.extensions_mut().insert(hijacker.clone());
        }
        request.extensions_mut().insert(ConnectInfo(peer));
        router.clone().oneshot(request.map(Body::new))
    });

    let mut builder = auto::Builder::new(TokioExecutor::new());
    // A client half-closing must not end the connection under an in-flight
    // handler; `/hang` holds it open regardless of what the peer does.
    builder.http1().half_close(true);

    let result = builder.serve_connection(TokioIo::new(io), service).await;
    logger.in_scope(|| match result {
        // After a hijack hyper's write into the fenced socket always fails.
        Err(_) if takeover.is_hijacked() => {
            tracing::debug!(connection_id = %id, peer_addr = %peer, "Connection handed to handler")
        }
        Err(error) => {
            tracing::debug!(connection_id = %id, peer_addr = %peer, error = %error, "Connection ended")
        }
        Ok(()) => tracing::trace!(connection_id = %id, peer_addr = %peer, "Connection closed"),
    });
}
