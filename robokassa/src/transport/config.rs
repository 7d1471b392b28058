//! HTTP transport configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// HTTP client settings, both in whole seconds.
///
/// # Examples
///
/// ```toml
/// [http]
/// idle_timeout_secs = 60
/// request_timeout_secs = 21
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// How long a pooled connection may stay idle before it is evicted.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Overall timeout of one request, from connect to last body byte.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl HttpConfig {
    /// Checks both timeouts against the gateway client's accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`](crate::error::GatewayError::Config) when:
    /// - `request_timeout_secs` is outside 1-300
    /// - `idle_timeout_secs` is outside 1-3600
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(GatewayError::Config(
                "request_timeout_secs must be between 1 and 300".to_owned(),
            ));
        }
        if self.idle_timeout_secs == 0 || self.idle_timeout_secs > 3600 {
            return Err(GatewayError::Config(
                "idle_timeout_secs must be between 1 and 3600".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the request timeout as Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the idle connection timeout as Duration.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn default_idle_timeout_secs() -> u64 {
    90
}

fn default_request_timeout_secs() -> u64 {
    30
}
