use std::env;
use std::time::Duration as StdDuration;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Tunables for the session client.
///
/// Defaults carry the recommended production values; tests dial the
/// timing fields down.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Server origin, e.g. `https://api.example.com`
    pub base_url: String,

    /// Per-request timeout, independent of the retry policy
    pub request_timeout_secs: u64,

    /// Total attempts for login/register when the transport fails
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts
    pub backoff_base_millis: u64,

    /// Grace window subtracted from token expiry to absorb clock drift
    pub expiry_skew_minutes: i64,

    /// "Expiring soon" window for the proactive freshness check
    pub refresh_threshold_minutes: i64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            max_attempts: 3,
            backoff_base_millis: 2000,
            expiry_skew_minutes: 5,
            refresh_threshold_minutes: 10,
        }
    }
}

impl ClientSettings {
    /// Load settings from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SESSION__BASE_URL, SESSION__MAX_ATTEMPTS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("SESSION").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }

    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff_base(&self) -> StdDuration {
        StdDuration::from_millis(self.backoff_base_millis)
    }

    pub fn expiry_skew(&self) -> Duration {
        Duration::minutes(self.expiry_skew_minutes)
    }

    pub fn refresh_threshold(&self) -> Duration {
        Duration::minutes(self.refresh_threshold_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_recommendations() {
        let settings = ClientSettings::default();

        assert_eq!(settings.request_timeout(), StdDuration::from_secs(30));
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.backoff_base(), StdDuration::from_secs(2));
        assert_eq!(settings.expiry_skew(), Duration::minutes(5));
        assert_eq!(settings.refresh_threshold(), Duration::minutes(10));
    }
}
