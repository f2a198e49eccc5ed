//! Configuration for the API client
//!
//! Coded defaults target a locally running appointment server; the
//! environment overrides them. The binary honors a `.env` file via dotenvy
//! before reading these.

use std::time::Duration;

/// Default address of the appointment server
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default per-request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the appointment server
    pub base_url: String,

    /// Timeout applied to every request
    pub timeout: Duration,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a configuration from the environment, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("PROMISE_API_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }

        if let Ok(secs) = std::env::var("PROMISE_API_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
