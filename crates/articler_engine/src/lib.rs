//! Articler engine: job registry, bounded-concurrency dispatch, cleanup and
//! the remote completion client.
mod builder;
mod cleanup;
mod completion;
mod config;
mod dispatch;
mod engine;
mod prompt;
mod registry;
mod types;

pub use builder::ArticleBuilder;
pub use cleanup::{run_cleanup, sweep_expired, MIN_CLEANUP_INTERVAL};
pub use completion::{CompletionError, CompletionRequest, CompletionService, OpenRouterClient};
pub use config::{
    CompletionSettings, ConfigError, EngineConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL,
    ENV_API_KEY, ENV_CLEANUP_INTERVAL_SECS, ENV_COMPLETION_TIMEOUT_SECS, ENV_ENDPOINT,
    ENV_JOB_TTL_MINUTES, ENV_MAX_CONCURRENCY, ENV_MODEL, MAX_CONCURRENCY_LIMIT,
};
pub use dispatch::{DispatchError, Dispatcher};
pub use engine::EngineHandle;
pub use prompt::{
    build_prompt, FixedVariation, PromptVariation, RandomVariation, VariationStrategy, STYLES,
    TONES,
};
pub use registry::{Clock, JobRegistry};
pub use types::EngineError;
