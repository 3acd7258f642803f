//! Node configuration.
//!
//! Every flag can also be supplied through its environment variable.

use crate::logging::LogFormat;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Runtime configuration of a ledger node.
#[derive(Debug, Clone, Parser)]
#[command(name = "tinyledger")]
#[command(about = "A minimal proof-of-work ledger node", long_about = None)]
pub struct NodeConfig {
    /// Address to listen on
    #[arg(long, env = "TINYLEDGER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "TINYLEDGER_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Identity credited with mining rewards (random when omitted)
    #[arg(long, env = "TINYLEDGER_NODE_ID")]
    pub node_id: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "TINYLEDGER_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "TINYLEDGER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,
}

impl NodeConfig {
    /// Address the HTTP server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The configured node identity, or a freshly generated one.
    pub fn resolve_node_id(&self) -> String {
        match &self.node_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => generate_node_id(),
        }
    }
}

/// Generate a random 128-bit node identity as 32 lowercase hex characters.
pub fn generate_node_id() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::try_parse_from(["tinyledger"]).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Human);
        assert!(config.node_id.is_none());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = NodeConfig::try_parse_from([
            "tinyledger",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--node-id",
            "miner-a",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.resolve_node_id(), "miner-a");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(NodeConfig::try_parse_from(["tinyledger", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_generated_node_id_shape() {
        let id = generate_node_id();

        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, generate_node_id());
    }

    #[test]
    fn test_empty_node_id_replaced() {
        let config = NodeConfig::try_parse_from(["tinyledger", "--node-id", ""]).unwrap();
        assert_eq!(config.resolve_node_id().len(), 32);
    }
}
