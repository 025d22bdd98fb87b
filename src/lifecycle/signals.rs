//! OS signal handling.
//!
//! SIGINT and SIGTERM both end the process cleanly: the listener stops
//! accepting and `main` returns with exit code 0.

use crate::observability::Logger;

/// Resolve on the first SIGINT or SIGTERM.
///
/// If a handler cannot be installed that signal is logged and ignored; the
/// process then only stops on the other one (or on SIGKILL).
pub async fn wait_for_termination(logger: &Logger) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            logger.in_scope(|| tracing::warn!(error = %err, "Failed to install SIGINT handler"));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                logger.in_scope(|| tracing::warn!(error = %err, "Failed to install SIGTERM handler"));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
