//! Raw connection takeover ("hijacking").
//!
//! # Responsibilities
//! - Wrap an accepted socket so hyper can serve it normally
//! - Let a handler take the socket away mid-request
//! - Fence off hyper's I/O path once the socket has been taken
//!
//! # Data Flow
//! ```text
//! TcpStream ──▶ HijackableIo ──▶ hyper (normal request/response)
//!                   │
//!                   └── Hijacker (request extension)
//!                           └── hijack() ──▶ HijackedConnection (handler owns the bytes)
//! ```
//!
//! Both halves share one slot. Whoever empties it owns the stream; hyper's
//! view of the socket then writes into an error and reads into a future that
//! never resolves.

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;

/// Error returned when the connection cannot be taken over.
#[derive(Debug, thiserror::Error)]
pub enum HijackError {
    #[error("connection already hijacked")]
    AlreadyHijacked,
}

#[derive(Debug)]
struct Slot {
    stream: Mutex<Option<TcpStream>>,
}

impl Slot {
    // The slot is a plain Option; a panic while it was held leaves nothing to repair.
    fn lock(&self) -> MutexGuard<'_, Option<TcpStream>> {
        self.stream.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The socket as hyper sees it.
#[derive(Debug)]
pub struct HijackableIo {
    slot: Arc<Slot>,
}

impl HijackableIo {
    /// Wrap `stream`, returning the I/O half for hyper and the takeover
    /// capability for handlers.
    pub fn new(stream: TcpStream, peer: SocketAddr) -> (Self, Hijacker) {
        let slot = Arc::new(Slot {
            stream: Mutex::new(Some(stream)),
        });
        let hijacker = Hijacker {
            slot: Arc::clone(&slot),
            peer,
        };
        (Self { slot }, hijacker)
    }
}

fn hijacked_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "connection hijacked")
}

impl AsyncRead for HijackableIo {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.slot.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_read(cx, buf),
            // A read error or EOF here would make hyper tear the connection
            // down and cancel the handler that now owns the socket.
            None => Poll::Pending,
        }
    }
}

impl AsyncWrite for HijackableIo {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.slot.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_write(cx, buf),
            None => Poll::Ready(Err(hijacked_error())),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.slot.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_flush(cx),
            None => Poll::Ready(Err(hijacked_error())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.slot.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_shutdown(cx),
            // Closing is the new owner's call.
            None => Poll::Ready(Ok(())),
        }
    }
}

/// Takeover capability attached to HTTP/1 requests.
#[derive(Debug, Clone)]
pub struct Hijacker {
    slot: Arc<Slot>,
    peer: SocketAddr,
}

impl Hijacker {
    /// Take exclusive ownership of the underlying socket.
    ///
    /// Succeeds at most once per connection.
    pub fn hijack(&self) -> Result<HijackedConnection, HijackError> {
        let stream = self.slot.lock().take().ok_or(HijackError::AlreadyHijacked)?;
        Ok(HijackedConnection {
            stream,
            peer: self.peer,
        })
    }

    /// Whether a handler has taken the socket.
    pub fn is_hijacked(&self) -> bool {
        self.slot.lock().is_none()
    }
}

/// A socket owned by a handler. Dropping it closes the connection.
#[derive(Debug)]
pub struct HijackedConnection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl HijackedConnection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Write raw bytes and flush them onto the wire.
    pub async fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    /// Close the connection without sending anything further.
    pub fn close(self) {
        drop(self.stream);
    }
}
