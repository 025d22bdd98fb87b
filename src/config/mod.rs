//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! argv + environment (PORT, RUST_LOG)
//!     → loader.rs (clap parse)
//!     → FaultConfig (immutable)
//!     → listener + log sink
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, Cli};
pub use schema::{FaultConfig, ListenerConfig, LogFormat, LoggingConfig, DEFAULT_PORT};
