use articler_core::JobId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Unknown or already evicted job. Not a job failure.
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("engine is shutting down")]
    ShuttingDown,
}
