//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse config → Build logger → Bind listener (fatal on error) → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Exit 0
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! Hung and mid-drop connections are not drained; they die with the process.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
