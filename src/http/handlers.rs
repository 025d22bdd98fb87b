//! Fault handlers.
//!
//! | Handler | Fault |
//! |---|---|
//! | [`hi`] | none, the control case |
//! | [`hang`] | accepts the request and never answers |
//! | [`drop_connection`] | takes the socket over, waits, closes it |
//!
//! None of them watch for client disconnects or deadlines. A fault that
//! depended on client behaviour would not reproduce deterministically.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::sync::Notify;

use crate::http::request::RequestSummary;
use crate::http::server::AppState;
use crate::net::Hijacker;

/// Delay between taking the socket over and closing it.
pub const DROP_DELAY: Duration = Duration::from_secs(2);

/// Status line suffix, headers and body of the truncated response. The
/// declared length is one byte more than the body that follows.
const NOISY_HEAD: &str = " 200 OK\r\nContent-Length: 3\r\n\r\n";
const NOISY_BODY: &str = "Hi";

const HIJACK_UNSUPPORTED: &str = "server doesn't support hijacking";

/// How a drop handler behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropFault {
    /// Wait this long before closing.
    pub delay: Duration,
    /// Send a truncated response before closing.
    pub partial_response: bool,
}

impl DropFault {
    /// Close without sending a byte.
    pub const QUIET: Self = Self {
        delay: DROP_DELAY,
        partial_response: false,
    };

    /// Promise three body bytes, send two, close.
    pub const NOISY: Self = Self {
        delay: DROP_DELAY,
        partial_response: true,
    };
}

/// `/hi`
pub async fn hi() -> &'static str {
    "Hi!\n"
}

/// `/hang`
pub async fn hang(State(state): State<AppState>, request: Request) -> Response {
    RequestSummary::from_request(&request).log(&state.logger, "waiting indefinitely");
    match park_forever().await {}
}

// The waiter is detached from the request: if hyper ever drops this handler,
// the parked task stays behind for the life of the process.
async fn park_forever() -> Infallible {
    let parked = tokio::spawn(async {
        let never = Notify::new();
        never.notified().await;
    });
    // The task can only finish by being cancelled when the runtime shuts
    // down; even then this handler keeps waiting.
    if let Err(err) = parked.await {
        debug_assert!(err.is_cancelled(), "parked task panicked: {err}");
    }
    std::future::pending::<Infallible>().await
}

/// `/drop` and `/dropNoisy`
pub async fn drop_connection(
    State(state): State<AppState>,
    request: Request,
    fault: DropFault,
) -> Response {
    let Some(hijacker) = request.extensions().get::<Hijacker>().cloned() else {
        state.logger.in_scope(|| tracing::error!("{HIJACK_UNSUPPORTED}"));
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("{HIJACK_UNSUPPORTED}\n")).into_response();
    };

    let mut conn = match hijacker.hijack() {
        Ok(conn) => conn,
        Err(err) => {
            state
                .logger
                .in_scope(|| tracing::error!(err = %err, "unable to hijack connection"));
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("{err}\n")).into_response();
        }
    };

    if fault.partial_response {
        let raw = format!("{:?}{NOISY_HEAD}{NOISY_BODY}", request.version());
        if let Err(err) = conn.send(raw.as_bytes()).await {
            state.logger.in_scope(|| {
                tracing::warn!(peer_addr = %conn.peer_addr(), error = %err, "partial response not delivered")
            });
        }
    }

    tokio::time::sleep(fault.delay).await;

    RequestSummary::from_request(&request).log(&state.logger, "dropping connection");
    conn.close();

    // hyper's side of the socket is fenced off, so this never reaches the client.
    StatusCode::OK.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Logger;
    use axum::body::Body;

    fn state() -> AppState {
        AppState {
            logger: Logger::disabled(),
        }
    }

    #[tokio::test]
    async fn hi_greets() {
        assert_eq!(hi().await, "Hi!\n");
    }

    #[tokio::test]
    async fn drop_without_hijacker_is_500() {
        let request = Request::new(Body::empty());
        let response = drop_connection(State(state()), request, DropFault::QUIET).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"server doesn't support hijacking\n");
    }

    #[tokio::test]
    async fn drop_after_takeover_is_500_with_error_text() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _client = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (server, peer) = listener.accept().await.unwrap();

        let (_io, hijacker) = crate::net::HijackableIo::new(server, peer);
        let _taken = hijacker.hijack().unwrap();

        let mut request = Request::new(Body::empty());
        request.extensions_mut().insert(hijacker);
        let response = drop_connection(State(state()), request, DropFault::NOISY).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"connection already hijacked\n");
    }

    #[tokio::test(start_paused = true)]
    async fn hang_never_completes() {
        let request = Request::new(Body::empty());
        let outcome = tokio::time::timeout(Duration::from_secs(3600), hang(State(state()), request)).await;
        assert!(outcome.is_err());
    }

    #[test]
    fn fault_presets() {
        assert!(!DropFault::QUIET.partial_response);
        assert!(DropFault::NOISY.partial_response);
        assert_eq!(DropFault::QUIET.delay, Duration::from_secs(2));
        assert!(NOISY_HEAD.contains("Content-Length: 3"));
        assert!(NOISY_BODY.len() < 3);
    }
}
