use std::sync::Arc;

use articler_core::{max_pairs, pair_pointer, Job, JobId, JobRequest};
use engine_logging::{engine_debug, engine_error, engine_info};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use crate::builder::ArticleBuilder;
use crate::{JobRegistry, MAX_CONCURRENCY_LIMIT};

/// Failures that end a whole job.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("build task failed: {0}")]
    Task(#[from] JoinError),
    #[error("build pool closed")]
    PoolClosed,
}

/// Runs the article builds of one job through a bounded pool and folds the
/// results into the registry.
pub struct Dispatcher {
    registry: Arc<JobRegistry>,
    builder: ArticleBuilder,
    max_concurrency: usize,
}

impl Dispatcher {
    pub fn new(registry: Arc<JobRegistry>, builder: ArticleBuilder, max_concurrency: usize) -> Self {
        Self {
            registry,
            builder,
            max_concurrency: max_concurrency.clamp(1, MAX_CONCURRENCY_LIMIT),
        }
    }

    /// Drives `job_id` to completion. Writes against an evicted job are
    /// dropped silently.
    pub async fn run(&self, job_id: &JobId, request: Arc<JobRequest>) {
        engine_info!(
            "Job {} started total={} max_concurrency={}",
            job_id,
            request.total(),
            self.max_concurrency
        );

        match self.build_all(job_id, request).await {
            Ok(()) => {
                let finished = self.registry.mutate(job_id, |job| {
                    job.finish();
                    job.articles().len()
                });
                match finished {
                    Some(count) => engine_info!("Job {} finished articles={}", job_id, count),
                    None => engine_debug!("Job {} finished after eviction", job_id),
                }
            }
            Err(err) => {
                engine_error!("Job {} failed: {}", job_id, err);
                let message = err.to_string();
                self.registry.mutate(job_id, |job| job.fail(message));
            }
        }
    }

    async fn build_all(&self, job_id: &JobId, request: Arc<JobRequest>) -> Result<(), DispatchError> {
        let max_pairs = max_pairs(&request.link_pool, &request.title_pool);
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for index in 0..request.total() {
            let pointer = pair_pointer(index, max_pairs);
            let permits = permits.clone();
            let builder = self.builder.clone();
            let request = request.clone();
            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_| DispatchError::PoolClosed)?;
                Ok::<_, DispatchError>(builder.build(index, &request, pointer, max_pairs).await)
            });
        }

        // Dropping `tasks` on an early return aborts the builds still queued.
        while let Some(joined) = tasks.join_next().await {
            let article = joined??;
            let no = article.no;
            let recorded = self
                .registry
                .mutate(job_id, |job: &mut Job| job.record_article(article));
            match recorded {
                Some(true) => engine_debug!("Job {} recorded article {}", job_id, no),
                Some(false) => engine_debug!("Job {} already done; dropped article {}", job_id, no),
                None => engine_debug!("Job {} evicted; dropped article {}", job_id, no),
            }
        }
        Ok(())
    }
}
