//! Structured logging.
//!
//! # Responsibilities
//! - Build the log sink (JSON lines by default, pretty for local runs)
//! - Hand out a cloneable [`Logger`] that components receive explicitly
//!
//! # Design Decisions
//! - The sink is never installed as the global default. Every component gets
//!   the same `Logger` through its constructor or shared state, which also
//!   lets tests point a single server at an in-memory writer.
//! - The `fmt` layer drops writer errors, so a broken stdout never fails a
//!   request.

use tracing::Dispatch;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Shared handle to the log sink.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// A logger that discards everything.
    pub fn disabled() -> Self {
        Self::new(Dispatch::none())
    }

    /// Run `f` with this logger as the current subscriber, so `tracing`
    /// macros inside it emit here.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Build the stdout logger for the binary.
pub fn init(config: &LoggingConfig) -> Logger {
    Logger::new(build_dispatch(config, std::io::stdout))
}

/// Build a dispatch writing to `writer` with the configured format and filter.
pub fn build_dispatch<W>(config: &LoggingConfig, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => Dispatch::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(writer),
            ),
        ),
        LogFormat::Pretty => Dispatch::new(
            registry.with(tracing_subscriber::fmt::layer().with_writer(writer)),
        ),
    }
}
