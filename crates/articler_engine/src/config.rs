use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;

pub const ENV_ENDPOINT: &str = "OPENROUTER_URL";
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_MODEL: &str = "OPENROUTER_MODEL";
pub const ENV_MAX_CONCURRENCY: &str = "MAX_CONCURRENCY";
pub const ENV_JOB_TTL_MINUTES: &str = "JOB_TTL_MINUTES";
pub const ENV_CLEANUP_INTERVAL_SECS: &str = "CLEANUP_INTERVAL_SECS";
pub const ENV_COMPLETION_TIMEOUT_SECS: &str = "COMPLETION_TIMEOUT_SECS";

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Widest build pool a job can use.
pub const MAX_CONCURRENCY_LIMIT: usize = Semaphore::MAX_PERMITS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection settings for the remote completion service.
#[derive(Clone, PartialEq, Eq)]
pub struct CompletionSettings {
    pub endpoint: String,
    /// Bearer credential. `None` makes every generation fail fast.
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(30),
            max_tokens: 400,
        }
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub completion: CompletionSettings,
    /// Width of each job's build pool.
    pub max_concurrency: usize,
    /// Jobs older than this are evicted regardless of state.
    pub job_ttl: Duration,
    pub cleanup_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            completion: CompletionSettings::default(),
            max_concurrency: 3,
            job_ttl: Duration::from_secs(30 * 60),
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; unset or blank keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let completion = CompletionSettings {
            endpoint: read(ENV_ENDPOINT).unwrap_or(defaults.completion.endpoint),
            api_key: read(ENV_API_KEY),
            model: read(ENV_MODEL).unwrap_or(defaults.completion.model),
            request_timeout: Duration::from_secs(positive(
                ENV_COMPLETION_TIMEOUT_SECS,
                read(ENV_COMPLETION_TIMEOUT_SECS),
                defaults.completion.request_timeout.as_secs(),
            )?),
            max_tokens: defaults.completion.max_tokens,
        };

        let max_concurrency = positive(
            ENV_MAX_CONCURRENCY,
            read(ENV_MAX_CONCURRENCY),
            defaults.max_concurrency as u64,
        )?;
        let ttl_minutes = positive(
            ENV_JOB_TTL_MINUTES,
            read(ENV_JOB_TTL_MINUTES),
            defaults.job_ttl.as_secs() / 60,
        )?;
        let cleanup_secs = positive(
            ENV_CLEANUP_INTERVAL_SECS,
            read(ENV_CLEANUP_INTERVAL_SECS),
            defaults.cleanup_interval.as_secs(),
        )?;

        Ok(Self {
            completion,
            max_concurrency: usize::try_from(max_concurrency)
                .ok()
                .filter(|width| *width <= MAX_CONCURRENCY_LIMIT)
                .ok_or_else(|| ConfigError::Invalid {
                    key: ENV_MAX_CONCURRENCY,
                    value: max_concurrency.to_string(),
                    reason: format!("must be at most {MAX_CONCURRENCY_LIMIT}"),
                })?,
            job_ttl: Duration::from_secs(ttl_minutes.saturating_mul(60)),
            cleanup_interval: Duration::from_secs(cleanup_secs),
        })
    }
}

fn positive(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be at least 1".to_string(),
        }),
        Ok(value) => Ok(value),
        Err(err) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: err.to_string(),
        }),
    }
}
