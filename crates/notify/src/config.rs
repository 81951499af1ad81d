//! Delivery configuration.

use std::time::Duration;

use tracing::warn;

/// HipChat v1 room message endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.hipchat.com/v1/rooms/message";

/// Largest message body HipChat accepts, in characters.
pub const MAX_BODY_LENGTH: usize = 10_000;

/// Environment variable overriding the API endpoint.
const ENV_API_URL: &str = "HIPCHAT_API_URL";

/// Environment variable overriding the number of connection attempts.
const ENV_MAX_RETRIES: &str = "NOTIFY_MAX_RETRIES";

/// Environment variable overriding the delay between attempts, in seconds.
const ENV_RETRY_DELAY: &str = "NOTIFY_RETRY_DELAY_SECS";

/// Where and how persistently messages are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Room message endpoint
    pub endpoint: String,
    /// Total number of connection attempts
    pub max_retries: u32,
    /// Pause after a failed connection attempt
    pub retry_delay: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_retries: 3,
            retry_delay: Duration::from_secs(3),
        }
    }
}

impl DeliveryConfig {
    /// Defaults, overridden by any valid environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            config.endpoint = url;
        }
        if let Some(retries) = parse_env::<u32>(ENV_MAX_RETRIES) {
            config = config.with_max_retries(retries);
        }
        if let Some(secs) = parse_env::<u64>(ENV_RETRY_DELAY) {
            config.retry_delay = Duration::from_secs(secs);
        }

        config
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the attempt bound; at least one attempt is always made.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring invalid environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeliveryConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        let config = DeliveryConfig::default().with_max_retries(0);
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_builders() {
        let config = DeliveryConfig::default()
            .with_endpoint("http://localhost:8080/v1/rooms/message")
            .with_max_retries(5)
            .with_retry_delay(Duration::ZERO);
        assert_eq!(config.endpoint, "http://localhost:8080/v1/rooms/message");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, Duration::ZERO);
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_skips_invalid_values() {
        std::env::set_var(ENV_MAX_RETRIES, "five");
        std::env::set_var(ENV_RETRY_DELAY, "0");
        let config = DeliveryConfig::from_env();
        std::env::remove_var(ENV_MAX_RETRIES);
        std::env::remove_var(ENV_RETRY_DELAY);

        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::ZERO);
    }
}
