//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use localchat_client::UNKNOWN_USERNAME;

use crate::logging::LogLevel;

/// localchat terminal client
#[derive(Parser, Debug, Clone)]
#[command(name = "localchat")]
#[command(about = "Terminal client for a localchat server")]
#[command(version)]
pub struct Config {
    /// Server host
    #[arg(long, env = "LOCALCHAT_IP", default_value = "localhost")]
    pub host: String,

    /// Server port
    #[arg(long, env = "LOCALCHAT_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Username announced when connecting
    #[arg(short, long, env = "LOCALCHAT_USERNAME", default_value = UNKNOWN_USERNAME)]
    pub username: String,

    /// Use a throwaway identity instead of the persisted one
    #[arg(long, env = "DEV")]
    pub dev: bool,

    /// Default log filter, overridden by `RUST_LOG`
    #[arg(long, env = "LOCALCHAT_LOG", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log file (default `~/.localchat/logs/localchat.log`)
    #[arg(long, env = "LOCALCHAT_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// WebSocket URL of the chat endpoint.
    pub fn server_url(&self) -> String {
        format!("ws://{}:{}/chat", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_url() {
        let args = ["localchat", "--host", "10.0.0.7", "--port", "9001", "-u", "ana"];
        let config = Config::try_parse_from(args).unwrap();

        assert_eq!(config.server_url(), "ws://10.0.0.7:9001/chat");
        assert_eq!(config.username, "ana");
        assert!(!config.dev);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["localchat", "--port", "http"]).is_err());
    }

    #[test]
    fn log_level_parses() {
        let config =
            Config::try_parse_from(["localchat", "--log-level", "debug", "--dev"]).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.dev);
    }
}
