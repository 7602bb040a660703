use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use articler_core::{JobId, JobRequest, JobSnapshot};
use engine_logging::{engine_debug, engine_error, engine_info};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::builder::ArticleBuilder;
use crate::cleanup::run_cleanup;
use crate::completion::CompletionService;
use crate::dispatch::Dispatcher;
use crate::prompt::VariationStrategy;
use crate::{EngineConfig, EngineError, JobRegistry};

enum EngineCommand {
    Run {
        job_id: JobId,
        request: Arc<JobRequest>,
    },
}

/// Entry point for submitting jobs and polling their state.
///
/// Owns the submission worker, every job run it spawns and the cleanup
/// timer. Must be started inside a tokio runtime.
pub struct EngineHandle {
    registry: Arc<JobRegistry>,
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl EngineHandle {
    pub fn start(
        config: &EngineConfig,
        completion: Arc<dyn CompletionService>,
        variation: Arc<dyn VariationStrategy>,
    ) -> Self {
        Self::start_with_registry(config, completion, variation, Arc::new(JobRegistry::new()))
    }

    pub fn start_with_registry(
        config: &EngineConfig,
        completion: Arc<dyn CompletionService>,
        variation: Arc<dyn VariationStrategy>,
        registry: Arc<JobRegistry>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let tracker = TaskTracker::new();

        let builder = ArticleBuilder::new(completion, variation, config.completion.request_timeout);
        let dispatcher = Arc::new(Dispatcher::new(
            registry.clone(),
            builder,
            config.max_concurrency,
        ));

        tracker.spawn(run_cleanup(
            registry.clone(),
            config.job_ttl,
            config.cleanup_interval,
            shutdown.clone(),
        ));
        tracker.spawn(run_commands(
            cmd_rx,
            dispatcher,
            registry.clone(),
            tracker.clone(),
        ));

        Self {
            registry,
            cmd_tx,
            shutdown,
            tracker,
        }
    }

    /// Registers a job and queues it for execution.
    pub fn submit(&self, request: JobRequest) -> Result<JobId, EngineError> {
        if self.shutdown.is_cancelled() {
            return Err(EngineError::ShuttingDown);
        }
        let job_id = self.registry.create(&request);
        engine_info!("Job {} submitted total={}", job_id, request.total());

        let command = EngineCommand::Run {
            job_id: job_id.clone(),
            request: Arc::new(request),
        };
        if self.cmd_tx.send(command).is_err() {
            self.registry.delete(&job_id);
            return Err(EngineError::ShuttingDown);
        }
        Ok(job_id)
    }

    pub fn snapshot(&self, job_id: &JobId) -> Result<JobSnapshot, EngineError> {
        self.registry
            .get(job_id)
            .ok_or_else(|| EngineError::NotFound(job_id.clone()))
    }

    /// Polls until the job is done, calling `on_progress` whenever progress
    /// moves.
    pub async fn wait_for(
        &self,
        job_id: &JobId,
        poll_interval: Duration,
        mut on_progress: impl FnMut(&JobSnapshot),
    ) -> Result<JobSnapshot, EngineError> {
        let mut last_progress = None;
        loop {
            let snapshot = self.snapshot(job_id)?;
            if last_progress != Some(snapshot.progress) {
                last_progress = Some(snapshot.progress);
                on_progress(&snapshot);
            }
            if snapshot.done {
                return Ok(snapshot);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Stops accepting jobs, stops the cleanup timer and waits for every
    /// queued or running job to finish.
    pub async fn shutdown(self) {
        let Self {
            cmd_tx,
            shutdown,
            tracker,
            ..
        } = self;
        engine_info!("Engine shutting down");
        shutdown.cancel();
        drop(cmd_tx);
        tracker.close();
        tracker.wait().await;
        engine_info!("Engine stopped");
    }
}

async fn run_commands(
    mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>,
    dispatcher: Arc<Dispatcher>,
    registry: Arc<JobRegistry>,
    tracker: TaskTracker,
) {
    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::Run { job_id, request } => {
                let dispatcher = dispatcher.clone();
                let run_id = job_id.clone();
                let run = async move { dispatcher.run(&run_id, request).await };
                tracker.spawn(run_supervised(registry.clone(), job_id, run));
            }
        }
    }
    engine_debug!("Submission queue closed");
}

/// Drives one job run on its own task. If the run dies before reaching a
/// terminal state, the job is failed so pollers never wait on it forever.
async fn run_supervised<F>(registry: Arc<JobRegistry>, job_id: JobId, run: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Err(err) = tokio::spawn(run).await {
        engine_error!("Job {} run aborted: {}", job_id, err);
        let message = format!("job run failed: {err}");
        registry.mutate(&job_id, |job| job.fail(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_request() -> JobRequest {
        JobRequest {
            main_keyword: "main".to_string(),
            secondary_keywords: vec!["A".to_string()],
            main_link: "https://main.example".to_string(),
            ..JobRequest::default()
        }
    }

    #[tokio::test]
    async fn panicking_run_leaves_the_job_failed() {
        let registry = Arc::new(JobRegistry::new());
        let job_id = registry.create(&job_request());

        run_supervised(registry.clone(), job_id.clone(), async {
            panic!("dispatcher blew up");
        })
        .await;

        let snapshot = registry.get(&job_id).unwrap();
        assert!(snapshot.done);
        let error = snapshot.error.unwrap();
        assert!(error.starts_with("job run failed"), "{error}");
    }

    #[tokio::test]
    async fn completed_run_is_left_untouched() {
        let registry = Arc::new(JobRegistry::new());
        let job_id = registry.create(&job_request());

        let finished = registry.clone();
        let run_id = job_id.clone();
        run_supervised(registry.clone(), job_id.clone(), async move {
            finished.mutate(&run_id, |job| job.finish());
        })
        .await;

        let snapshot = registry.get(&job_id).unwrap();
        assert!(snapshot.done);
        assert_eq!(snapshot.error, None);
    }
}
