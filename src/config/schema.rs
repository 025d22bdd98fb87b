//! Configuration schema definitions.
//!
//! Only the listener and the log sink are configurable. Fault parameters
//! (drop delay, noisy response bytes) are fixed in `http::handlers`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: u16 = 8080;

/// Root configuration for the fault endpoint.
#[derive(Debug, Clone, Default)]
pub struct FaultConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Log sink settings.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Interface to bind; all interfaces by default.
    pub host: IpAddr,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// The socket address the listener binds to.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Output format of the log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable lines for local runs.
    Pretty,
}

/// Log sink configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,

    /// `EnvFilter` directives, e.g. `info` or `fault_endpoint=debug`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            filter: "info".to_string(),
        }
    }
}
