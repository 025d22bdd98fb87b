//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router mapping fault paths to handlers
//! - Wrap it in the request logging middleware
//! - Run the accept loop until shutdown

use axum::{
    extract::{Request, State},
    http::StatusCode,
    routing::any,
    Router,
};
use tokio::sync::broadcast;

use crate::http::handlers::{self, DropFault};
use crate::http::middleware::RequestLogLayer;
use crate::net::{connection, Listener};
use crate::observability::Logger;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub logger: Logger,
}

/// HTTP server for the fault endpoints.
pub struct FaultServer {
    router: Router,
    logger: Logger,
}

impl FaultServer {
    pub fn new(logger: Logger) -> Self {
        let router = Self::build_router(logger.clone());
        Self { router, logger }
    }

    /// Build the Axum router with the logging middleware around every route.
    pub fn build_router(logger: Logger) -> Router {
        let state = AppState {
            logger: logger.clone(),
        };

        Router::new()
            .route("/hi", any(handlers::hi))
            .route(
                "/drop",
                any(|state: State<AppState>, request: Request| {
                    handlers::drop_connection(state, request, DropFault::QUIET)
                }),
            )
            .route(
                "/dropNoisy",
                any(|state: State<AppState>, request: Request| {
                    handlers::drop_connection(state, request, DropFault::NOISY)
                }),
            )
            .route("/hang", any(handlers::hang))
            .fallback(not_found)
            .with_state(state)
            .layer(RequestLogLayer::new(logger))
    }

    /// Accept connections until `shutdown` fires.
    ///
    /// Connections already being served, hung ones included, are left running.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) {
        if let Ok(addr) = listener.local_addr() {
            self.logger
                .in_scope(|| tracing::info!(address = %addr, "HTTP server starting"));
        }

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(connection::serve_connection(
                            stream,
                            peer,
                            self.router.clone(),
                            self.logger.clone(),
                        ));
                    }
                    Err(err) => {
                        self.logger.in_scope(|| tracing::warn!(error = %err, "Accept failed"));
                    }
                },
                _ = shutdown.recv() => {
                    self.logger.in_scope(|| tracing::info!("Shutdown signal received"));
                    break;
                }
            }
        }

        self.logger.in_scope(|| tracing::info!("HTTP server stopped"));
    }
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found\n")
}
