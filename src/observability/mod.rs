//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers
//!     → trace_context.rs (traceparent / tracestate / B3 identifiers)
//!     → logging.rs (Logger → structured records on stdout)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Trace identifiers are logged, never interpreted

pub mod logging;
pub mod trace_context;

pub use logging::Logger;
pub use trace_context::TraceContext;
