use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use articler_core::{Job, JobId, JobRequest, JobSnapshot};
use chrono::{DateTime, Utc};

/// Source of creation timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// In-memory job store shared by dispatchers, the cleanup task and pollers.
///
/// Every access goes through one mutex. Callers never receive a live
/// reference: reads return snapshots and writes run as closures under the
/// lock.
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobId, Job>>,
    clock: Clock,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Registers a fresh job for `request` and returns its id.
    pub fn create(&self, request: &JobRequest) -> JobId {
        let created_at = self.now();
        let mut jobs = self.lock();
        let mut job_id = JobId::generate();
        while jobs.contains_key(&job_id) {
            job_id = JobId::generate();
        }
        jobs.insert(job_id.clone(), Job::new(job_id.clone(), request, created_at));
        job_id
    }

    pub fn get(&self, job_id: &JobId) -> Option<JobSnapshot> {
        self.lock().get(job_id).map(Job::snapshot)
    }

    /// Applies `update` under the lock. Returns `None` when the job is gone.
    pub fn mutate<R>(&self, job_id: &JobId, update: impl FnOnce(&mut Job) -> R) -> Option<R> {
        self.lock().get_mut(job_id).map(update)
    }

    pub fn delete(&self, job_id: &JobId) -> bool {
        self.lock().remove(job_id).is_some()
    }

    /// Removes every job created before `cutoff`, finished or not.
    pub fn evict_created_before(&self, cutoff: DateTime<Utc>) -> Vec<JobId> {
        let mut jobs = self.lock();
        let expired: Vec<JobId> = jobs
            .values()
            .filter(|job| job.is_expired(cutoff))
            .map(|job| job.id().clone())
            .collect();
        for job_id in &expired {
            jobs.remove(job_id);
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Poisoning is ignored: no Job update can leave a job half-applied.
    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
