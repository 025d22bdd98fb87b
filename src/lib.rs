//! Fault-injection HTTP endpoint library.
//!
//! Serves four paths that misbehave on purpose so clients, proxies and
//! observability pipelines can be tested against real network failures:
//! `/hi` (baseline), `/hang` (never answers), `/drop` (silent close) and
//! `/dropNoisy` (truncated body under a lying `Content-Length`).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::FaultConfig;
pub use http::FaultServer;
pub use lifecycle::Shutdown;
pub use observability::Logger;
