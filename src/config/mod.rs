//! Configuration loading and validation.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::parse_duration;
use crate::upstream::RetryPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Environment variable {0} must be set to the upstream API token")]
    MissingCredential(String),
}

/// Upstream API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Region code to base URL
    #[serde(default = "default_regions")]
    pub regions: BTreeMap<String, String>,
}

fn default_token_env() -> String {
    "RITO_TOKEN".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_regions() -> BTreeMap<String, String> {
    ["euw1", "na1", "la2", "la1", "br1", "eun1", "jp1", "oc1", "ru", "tr1"]
        .into_iter()
        .map(|code| (code.to_string(), format!("https://{}.api.riotgames.com", code)))
        .collect()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            timeout_seconds: default_timeout(),
            regions: default_regions(),
        }
    }
}

/// Retry behaviour for rate-limited upstream calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Multiplier applied to the delay after each retry (1.0 = fixed delay)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime (e.g., "30m")
    #[serde(default = "default_ttl")]
    pub ttl: String,

    /// How often expired entries are purged (e.g., "40m")
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: String,
}

fn default_ttl() -> String {
    "30m".to_string()
}

fn default_cleanup_interval() -> String {
    "40m".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

/// Participant fan-out configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Participant lookups allowed in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    10
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub fanout: FanoutConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if self.upstream.token_env.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Upstream token_env must name an environment variable".to_string(),
            ));
        }

        for (region, host) in &self.upstream.regions {
            // Region codes are embedded in cache keys, which use `_` as separator.
            if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::ValidationError(format!(
                    "Region code {:?} must be ASCII letters and digits",
                    region
                )));
            }
            if host.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Region {} has no host",
                    region
                )));
            }
            Url::parse(host).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Region {} has invalid host {}: {}",
                    region, host, e
                ))
            })?;
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "Retry max_attempts must be at least 1".to_string(),
            ));
        }

        let multiplier = self.retry.backoff_multiplier;
        if multiplier.is_nan() || multiplier < 1.0 {
            return Err(ConfigError::ValidationError(
                "Retry backoff_multiplier must be at least 1.0".to_string(),
            ));
        }

        self.cache_ttl()?;
        self.cache_cleanup_interval()?;

        if self.fanout.max_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "Fan-out max_concurrency must be at least 1".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Cache entry lifetime.
    pub fn cache_ttl(&self) -> Result<Duration, ConfigError> {
        parse_positive_duration("cache.ttl", &self.cache.ttl)
    }

    /// Interval between cache purges.
    pub fn cache_cleanup_interval(&self) -> Result<Duration, ConfigError> {
        parse_positive_duration("cache.cleanup_interval", &self.cache.cleanup_interval)
    }

    /// Upstream request timeout.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds)
    }

    /// Retry policy for rate-limited upstream calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            delay: Duration::from_millis(self.retry.delay_ms),
            backoff_multiplier: self.retry.backoff_multiplier,
        }
    }

    /// Read the upstream API token from the configured environment variable.
    pub fn read_token(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.upstream.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ConfigError::MissingCredential(self.upstream.token_env.clone())),
        }
    }
}

fn parse_positive_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    match parse_duration(value) {
        Some(d) if !d.is_zero() => Ok(d),
        _ => Err(ConfigError::ValidationError(format!(
            "{} must be a positive duration like \"30m\", got {:?}",
            field, value
        ))),
    }
}
