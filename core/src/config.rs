//! Client configuration.
//!
//! `ClientConfig` is deserializable so host applications can embed it in
//! their own configuration files. Only `base_url` is required.

use std::time::Duration;

use serde::Deserialize;

/// Default global timeout for one request/response round-trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout_secs: None,
            user_agent: None,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        let defaults = TransportConfig::default();
        TransportConfig {
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}

/// Settings for the default transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("signup-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
