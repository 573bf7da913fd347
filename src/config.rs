//! Runtime configuration: scoring endpoint, HTTP timeout, and log filter.
//!
//! Values come from the environment (a `.env` file is honored) and can be
//! overridden by CLI flags.

use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://credit-risk-api-re8l.onrender.com";
pub const SCORE_PATH: &str = "/api/v1/score";
pub const DOCS_PATH: &str = "/docs";

const ENV_API_URL: &str = "CREDIT_RISK_API_URL";
const ENV_TIMEOUT: &str = "CREDIT_RISK_TIMEOUT_SECS";
const ENV_LOG: &str = "CREDIT_RISK_LOG";

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

/// Where and how to reach the scoring service.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub base_url: String,
    /// Request timeout handed to the HTTP client; `None` keeps the client default.
    pub timeout: Option<Duration>,
}

impl ScoringConfig {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout,
        })
    }

    pub fn score_url(&self) -> String {
        format!("{}{SCORE_PATH}", self.base_url)
    }

    pub fn docs_url(&self) -> String {
        format!("{}{DOCS_PATH}", self.base_url)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Values supplied on the command line; each one wins over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(overrides, |name| env::var(name).ok())
    }

    fn from_lookup(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = overrides
            .api_url
            .clone()
            .or_else(|| lookup(ENV_API_URL))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => match lookup(ENV_TIMEOUT) {
                Some(raw) => Some(
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
                ),
                None => None,
            },
        };
        if timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }

        let log_level = lookup(ENV_LOG).unwrap_or_else(|| "info".to_string());

        Ok(Self {
            scoring: ScoringConfig::new(&base_url, timeout_secs.map(Duration::from_secs))?,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidApiUrl(raw.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidApiUrl(String),
    InvalidTimeout(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl(value) => write!(
                f,
                "invalid scoring API URL '{value}': expected an http:// or https:// base URL"
            ),
            ConfigError::InvalidTimeout(value) => write!(
                f,
                "invalid {ENV_TIMEOUT} '{value}': expected a positive number of seconds"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
