//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (net::connection, hyper)
//!     → server.rs (Axum router, path → handler)
//!     → middleware/request_log.rs (one "request" record, then delegate)
//!     → handlers.rs (hi | hang | drop | dropNoisy)
//!         └── drop handlers may take the raw socket (net::hijack)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use handlers::{DropFault, DROP_DELAY};
pub use request::RequestSummary;
pub use server::{AppState, FaultServer};
