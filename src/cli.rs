//! Command-line interface configuration.

use argh::FromArgs;
use std::{net::SocketAddr, path::PathBuf};

use crate::config::{DEFAULT_CLIENT_MSG_PATH, LoggerConfig};

/// A demo server wrapped in the dm-logger request logging middleware
#[derive(Debug, FromArgs)]
pub struct Cli {
    /// directory served under '/assets' (default: './assets')
    #[argh(option, long = "static-dir", default = "PathBuf::from(\"assets\")")]
    pub static_dir: PathBuf,

    /// server bind address (default: '127.0.0.1:8000')
    #[argh(option, default = "SocketAddr::from(([127, 0, 0, 1], 8000))")]
    pub bind: SocketAddr,

    /// honor '?set_log_level=<severity>' on any request
    #[argh(switch, long = "level-from-query")]
    pub level_from_query: bool,

    /// token required in 'dm-logger-level-token' for level changes
    #[argh(option, long = "level-token")]
    pub level_token: Option<String>,

    /// disable ANSI colors in log lines
    #[argh(switch, long = "no-color")]
    pub no_color: bool,

    /// regex identifying asset requests (default: '^/assets/')
    #[argh(option, long = "asset-pattern", default = "String::from(\"^/assets/\")")]
    pub asset_pattern: String,

    /// client log intake path (default: '/__client-msg-tracking')
    #[argh(
        option,
        long = "client-path",
        default = "String::from(DEFAULT_CLIENT_MSG_PATH)"
    )]
    pub client_path: String,

    /// disable the client log intake endpoint
    #[argh(switch, long = "no-client-endpoint")]
    pub no_client_endpoint: bool,
}

impl Cli {
    /// Logger configuration for these flags, on top of `LOG_LEVEL`.
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level_from_query: self.level_from_query,
            level_override_token: self.level_token.clone(),
            colorize: !self.no_color,
            asset_path_pattern: Some(self.asset_pattern.clone()),
            client_msg_path: (!self.no_client_endpoint).then(|| self.client_path.clone()),
            ..LoggerConfig::from_env()
        }
    }
}
