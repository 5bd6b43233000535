//! Connection configuration for the daemon client.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, ENV_HOST, ENV_PORT, ENV_TIMEOUT};
use crate::error::{Result, StevedoreError};

/// Where the daemon lives and how long a single request may take.
///
/// The configuration is read-only once a client has been built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Host name or IP address of the daemon.
    pub host: String,
    /// TCP port the daemon listens on.
    pub port: u16,
    /// Per-request timeout in seconds; `None` or `0` waits forever.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given host and port with the default timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets the per-request timeout. `None` or a zero duration disables it.
    ///
    /// The timeout has whole-second resolution; a fractional part rounds up,
    /// so a sub-second timeout becomes one second rather than zero.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout_secs = match timeout {
            Some(t) if t.is_zero() => None,
            Some(t) if t.subsec_nanos() > 0 => Some(t.as_secs().saturating_add(1)),
            Some(t) => Some(t.as_secs()),
            None => None,
        };
        self
    }

    /// Builds the configuration from `STEVEDORE_*` environment variables,
    /// falling back to the defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::Config`] if a variable is set to an
    /// unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::Config`] if a variable holds an unparsable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = port.trim().parse().map_err(|_| StevedoreError::Config {
                message: format!("{ENV_PORT} must be a port number, got {port:?}"),
            })?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            let secs: u64 = timeout.trim().parse().map_err(|_| StevedoreError::Config {
                message: format!("{ENV_TIMEOUT} must be a number of seconds, got {timeout:?}"),
            })?;
            config.request_timeout_secs = (secs > 0).then_some(secs);
        }

        tracing::debug!(host = %config.host, port = config.port, "loaded client configuration");
        Ok(config)
    }

    /// Returns the request timeout, if any. A stored `0` means none.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Builds the `http://host:port/` base URL every request path is joined onto.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::Config`] if the host is empty, the port is
    /// zero, or the pair does not form a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(StevedoreError::Config {
                message: "daemon host must not be empty".to_string(),
            });
        }
        if self.port == 0 {
            return Err(StevedoreError::Config {
                message: "daemon port must not be 0".to_string(),
            });
        }

        // Bare IPv6 literals need brackets inside a URL authority.
        let authority = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.port)
        } else {
            format!("{host}:{}", self.port)
        };

        Url::parse(&format!("http://{authority}/")).map_err(|e| StevedoreError::Config {
            message: format!("invalid daemon address {authority}: {e}"),
        })
    }
}
