//! HTTP client configuration module
//!
//! Event sources never enforce their own deadlines; every timeout an
//! outbound calendar request is subject to is configured here.

use crate::error::{AppError, AppResult};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

const USER_AGENT: &str = concat!("PlanMan/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(45),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create HTTP config optimized for calendar API calls
    pub fn calendar_api() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60), // Calendar APIs can be slow
            ..Self::default()
        }
    }

    /// Create HTTP config for ICS data fetching
    pub fn ics_fetch() -> Self {
        Self {
            connect_timeout: Duration::from_secs(20),
            timeout: Duration::from_secs(120), // ICS files can be large
            ..Self::default()
        }
    }

    /// Overrides the total request timeout, e.g. from the user's config file.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if let Some(timeout) = timeout {
            self.timeout = timeout;
        }
        self
    }

    /// Build a reqwest client with this configuration
    pub fn build_client(&self) -> AppResult<Client> {
        ClientBuilder::new()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_more_patient_than_default() {
        assert!(HttpConfig::calendar_api().timeout > HttpConfig::default().timeout);
        assert!(HttpConfig::ics_fetch().timeout > HttpConfig::calendar_api().timeout);
    }

    #[test]
    fn test_with_timeout_overrides_only_when_set() {
        let config = HttpConfig::calendar_api().with_timeout(Some(Duration::from_secs(5)));
        assert_eq!(config.timeout, Duration::from_secs(5));

        let config = HttpConfig::calendar_api().with_timeout(None);
        assert_eq!(config, HttpConfig::calendar_api());
    }

    #[test]
    fn test_build_client() {
        assert!(HttpConfig::new().build_client().is_ok());
    }
}
