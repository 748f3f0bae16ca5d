//! Logger configuration.
//!
//! Built once at startup and never mutated afterwards. The runtime level
//! lives in the [`SeverityGate`](crate::severity::SeverityGate), not here.
//!
//! # Example
//! ```toml
//! level_from_query = true
//! colorize = false
//! asset_path_pattern = "^/(assets|static)/"
//! client_msg_path = "/__client-msg-tracking"
//! default_level = "info"
//! ```

use serde::Deserialize;

use crate::severity::Severity;

/// Default path of the client log intake endpoint.
pub const DEFAULT_CLIENT_MSG_PATH: &str = "/__client-msg-tracking";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Honor `?set_log_level=<severity>` on any request.
    pub level_from_query: bool,
    /// When set, `set_log_level` also requires a matching
    /// `dm-logger-level-token` request header.
    pub level_override_token: Option<String>,
    /// ANSI colors on severity names and correlation ids.
    pub colorize: bool,
    /// Regex searched in the original URL to spot asset requests.
    pub asset_path_pattern: Option<String>,
    /// Intake endpoint path; `None` disables the endpoint.
    pub client_msg_path: Option<String>,
    /// Initial gate level, and the severity of client messages that name
    /// none (or an unknown one).
    pub default_level: Severity,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level_from_query: false,
            level_override_token: None,
            colorize: true,
            asset_path_pattern: None,
            client_msg_path: Some(DEFAULT_CLIENT_MSG_PATH.to_string()),
            default_level: Severity::Notice,
        }
    }
}

impl LoggerConfig {
    /// Defaults, with `default_level` taken from `LOG_LEVEL`.
    pub fn from_env() -> Self {
        Self {
            default_level: Severity::from_env(),
            ..Self::default()
        }
    }

    /// Intake path the middleware answers on. Paths that do not start with
    /// `/` can never match a request and disable the endpoint.
    pub fn intake_path(&self) -> Option<&str> {
        self.client_msg_path
            .as_deref()
            .filter(|path| path.starts_with('/'))
    }
}
