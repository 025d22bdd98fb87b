//! Fault-injection HTTP endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ net::listener ──▶ net::connection (hyper, HijackableIo)
//!                                      │
//!                                      ▼
//!                          http::middleware::request_log  ── "request" record
//!                                      │
//!                                      ▼
//!                               http::server router
//!               ┌──────────────┬───────┴──────┬─────────────────┐
//!              /hi           /hang          /drop          /dropNoisy
//!            "Hi!\n"     park forever   hijack, 2s, close  hijack, "Hi" of 3, 2s, close
//! ```
//!
//! Exit codes: 0 after SIGINT/SIGTERM, 1 when the listener cannot be bound.

use fault_endpoint::config::{self, FaultConfig};
use fault_endpoint::lifecycle::{signals, Shutdown};
use fault_endpoint::net::{Listener, ListenerError};
use fault_endpoint::observability::{logging, Logger};
use fault_endpoint::FaultServer;

#[tokio::main]
async fn main() {
    let config = config::load_config();
    let logger = logging::init(&config.logging);

    logger.in_scope(|| {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            bind_address = %config.listener.bind_address(),
            "fault-endpoint starting"
        )
    });

    if let Err(err) = run(config, logger.clone()).await {
        logger.in_scope(|| tracing::error!(err = %err, "unexpected termination"));
        std::process::exit(1);
    }
}

async fn run(config: FaultConfig, logger: Logger) -> Result<(), ListenerError> {
    let listener = Listener::bind(&config.listener, &logger).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_logger = logger.clone();
    tokio::spawn(async move {
        signals::wait_for_termination(&signal_logger).await;
        shutdown.trigger();
    });

    FaultServer::new(logger.clone()).run(listener, server_shutdown).await;

    logger.in_scope(|| tracing::info!("Shutdown complete"));
    Ok(())
}
