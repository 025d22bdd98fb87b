//! Configuration loading from the command line and environment.

use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;

use crate::config::schema::{FaultConfig, ListenerConfig, LogFormat, LoggingConfig, DEFAULT_PORT};

/// Command-line arguments. Every flag has an environment fallback or a default,
/// so running the binary bare is the normal case.
#[derive(Debug, Parser)]
#[command(name = "fault-endpoint")]
#[command(about = "HTTP endpoint that hangs, drops and truncates on purpose", long_about = None)]
pub struct Cli {
    /// Port to listen on. An empty value means the default.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT, value_parser = parse_port)]
    pub port: u16,

    /// Interface to bind.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Log filter directives.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

fn parse_port(value: &str) -> Result<u16, String> {
    if value.trim().is_empty() {
        return Ok(DEFAULT_PORT);
    }
    value.trim().parse().map_err(|e| format!("{e}"))
}

impl Cli {
    pub fn into_config(self) -> FaultConfig {
        FaultConfig {
            listener: ListenerConfig {
                host: self.host,
                port: self.port,
            },
            logging: LoggingConfig {
                format: self.log_format,
                filter: self.log_filter,
            },
        }
    }
}

/// Parse the process arguments into a [`FaultConfig`].
///
/// Invalid arguments (e.g. a non-numeric `PORT`) print a usage error and exit
/// the process with a non-zero code.
pub fn load_config() -> FaultConfig {
    Cli::parse().into_config()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "fault-endpoint",
            "--port",
            "9090",
            "--host",
            "127.0.0.1",
            "--log-format",
            "pretty",
            "--log-filter",
            "debug",
        ])
        .unwrap();

        let config = cli.into_config();
        assert_eq!(config.listener.bind_address().to_string(), "127.0.0.1:9090");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        assert_eq!(parse_port(""), Ok(DEFAULT_PORT));
        assert_eq!(parse_port("  "), Ok(DEFAULT_PORT));
        assert_eq!(parse_port("9000"), Ok(9000));

        let cli = Cli::try_parse_from(["fault-endpoint", "--port", ""]).unwrap();
        assert_eq!(cli.port, 8080);
    }

    // The only test that touches PORT; every other test passes --port or
    // does not care which port is picked.
    #[test]
    fn empty_port_env_is_unset() {
        std::env::set_var("PORT", "");
        let cli = Cli::try_parse_from(["fault-endpoint"]);
        std::env::remove_var("PORT");

        let config = cli.unwrap().into_config();
        assert_eq!(config.listener.port, 8080);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let result = Cli::try_parse_from(["fault-endpoint", "--port", "http"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_log_format() {
        let result = Cli::try_parse_from(["fault-endpoint", "--log-format", "xml"]);
        assert!(result.is_err());
    }
}
