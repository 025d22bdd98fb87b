//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop)
//!     → connection.rs (connection id, hyper serving)
//!     → hijack.rs (socket wrapper + takeover capability)
//!     → Hand off to HTTP layer
//!
//! Connection States:
//!     Accepted → Serving → Closed
//!                   └──▶ Hijacked → (handler closes, or never)
//! ```

pub mod connection;
pub mod hijack;
pub mod listener;

pub use hijack::{HijackError, HijackableIo, HijackedConnection, Hijacker};
pub use listener::{Listener, ListenerError};
