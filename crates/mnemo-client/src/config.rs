//! Client configuration.
//!
//! Configuration is captured once at construction and fixed for the lifetime
//! of a [`MemoryClient`](crate::MemoryClient). It can be built by hand, taken
//! from [`Default`], or read from environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MNEMO_BASE_URL` | `http://localhost:8765` | Memory server base URL |
//! | `MNEMO_TIMEOUT_SECS` | `30.0` | Request timeout in seconds |

use std::time::Duration;

use tracing::debug;

use mnemo_core::{defaults, Error, Result};

/// Connection settings for one client instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server base URL; trailing slashes are ignored.
    pub base_url: String,
    /// Per-request deadline in seconds.
    pub timeout_secs: f64,
    /// Overrides the `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            timeout_secs: defaults::TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Load from environment variables, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(defaults::ENV_BASE_URL).unwrap_or_else(|_| defaults::BASE_URL.to_string());
        let timeout_secs = std::env::var(defaults::ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(defaults::TIMEOUT_SECS);

        debug!(
            subsystem = "client",
            component = "config",
            base_url = %base_url,
            timeout_secs,
            "Loaded client configuration from environment"
        );

        Self {
            base_url,
            timeout_secs,
            user_agent: None,
        }
    }

    /// Base URL with trailing slashes removed.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full URL of the JSON-RPC endpoint.
    pub fn rpc_endpoint(&self) -> String {
        format!("{}{}", self.normalized_base_url(), defaults::RPC_PATH)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("mnemo-client/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let url = self.normalized_base_url();
        if url.is_empty() {
            return Err(Error::Config("base_url cannot be empty".to_string()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            return Err(Error::Config(format!(
                "timeout_secs must be a positive number, got: {}",
                self.timeout_secs
            )));
        }

        Ok(())
    }
}
