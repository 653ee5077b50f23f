use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::error::CiteSenseError;

const DEFAULT_CITOID_BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1/data/citation/zotero";
const DEFAULT_TWEET_API_BASE_URL: &str = "https://api.vxtwitter.com";
const DEFAULT_MAX_CONCURRENCY: usize = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_QUOTE_DEPTH: usize = 5;

/// Pipeline configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // External services
    pub citoid_base_url: String,
    pub tweet_api_base_url: String,

    // HTTP
    pub request_timeout: Duration,
    pub user_agent: String,

    // Pipeline limits
    pub max_concurrency: usize,
    pub max_quote_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            citoid_base_url: DEFAULT_CITOID_BASE_URL.to_string(),
            tweet_api_base_url: DEFAULT_TWEET_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_quote_depth: DEFAULT_MAX_QUOTE_DEPTH,
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Every var is optional.
    pub fn from_env() -> Result<Self, CiteSenseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CiteSenseError> {
        let defaults = Self::default();
        let config = Self {
            citoid_base_url: lookup("CITOID_BASE_URL").unwrap_or(defaults.citoid_base_url),
            tweet_api_base_url: lookup("TWEET_API_BASE_URL")
                .unwrap_or(defaults.tweet_api_base_url),
            request_timeout: Duration::from_secs(parse_var(
                &lookup,
                "CITESENSE_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            user_agent: lookup("CITESENSE_USER_AGENT").unwrap_or(defaults.user_agent),
            max_concurrency: parse_var(
                &lookup,
                "CITESENSE_MAX_CONCURRENCY",
                DEFAULT_MAX_CONCURRENCY,
            )?,
            max_quote_depth: parse_var(
                &lookup,
                "CITESENSE_MAX_QUOTE_DEPTH",
                DEFAULT_MAX_QUOTE_DEPTH,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CiteSenseError> {
        if self.max_concurrency == 0 {
            return Err(CiteSenseError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(CiteSenseError::Config(
                "request_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the HTTP client shared by every outbound call.
    pub fn http_client(&self) -> Result<reqwest::Client, CiteSenseError> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| CiteSenseError::Config(format!("failed to build HTTP client: {e}")))
    }

    pub fn log_redacted(&self) {
        info!(
            citoid_base_url = self.citoid_base_url.as_str(),
            tweet_api_base_url = self.tweet_api_base_url.as_str(),
            request_timeout_secs = self.request_timeout.as_secs(),
            max_concurrency = self.max_concurrency,
            max_quote_depth = self.max_quote_depth,
            "Loaded configuration"
        );
    }
}

fn default_user_agent() -> String {
    format!("citesense/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, CiteSenseError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CiteSenseError::Config(format!("{key} is invalid ({raw:?}): {e}"))),
        None => Ok(default),
    }
}
