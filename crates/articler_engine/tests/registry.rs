mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use articler_core::JobId;
use articler_engine::JobRegistry;
use common::{request, ManualClock};
use pretty_assertions::assert_eq;

#[test]
fn create_registers_an_empty_job() {
    let registry = JobRegistry::new();
    let job_id = registry.create(&request(&["A", "B", "C"]));

    let snapshot = registry.get(&job_id).unwrap();
    assert_eq!(snapshot.total, 3);
    assert_eq!(snapshot.progress, 0.0);
    assert!(!snapshot.done);
    assert!(snapshot.articles.is_empty());
    assert_eq!(snapshot.main_keyword, "main");
    assert_eq!(snapshot.main_link, "https://main.example");
}

#[test]
fn unknown_job_is_not_found() {
    let registry = JobRegistry::new();
    assert!(registry.get(&JobId::from("missing")).is_none());
    assert!(!registry.delete(&JobId::from("missing")));
}

#[test]
fn mutate_applies_under_lock_and_ignores_missing_jobs() {
    let registry = JobRegistry::new();
    let job_id = registry.create(&request(&[]));

    assert_eq!(registry.mutate(&job_id, |job| job.fail("boom")), Some(()));
    let snapshot = registry.get(&job_id).unwrap();
    assert_eq!(snapshot.error.as_deref(), Some("boom"));

    assert!(registry.delete(&job_id));
    assert_eq!(registry.mutate(&job_id, |job| job.finish()), None);
    assert!(registry.is_empty());
}

#[test]
fn snapshots_are_detached_copies() {
    let registry = JobRegistry::new();
    let job_id = registry.create(&request(&["A"]));

    let before = registry.get(&job_id).unwrap();
    registry.mutate(&job_id, |job| job.finish());
    assert!(!before.done);
    assert!(registry.get(&job_id).unwrap().done);
}

#[test]
fn eviction_uses_creation_time_only() {
    let clock = ManualClock::new();
    let registry = JobRegistry::with_clock(clock.clock());

    let old = registry.create(&request(&["A"]));
    registry.mutate(&old, |job| job.finish());
    clock.advance(chrono::Duration::minutes(10));
    let fresh = registry.create(&request(&["A"]));

    let evicted = registry.evict_created_before(registry.now());
    assert_eq!(evicted, vec![old.clone()]);
    assert!(registry.get(&old).is_none());
    assert!(registry.get(&fresh).is_some());
    assert_eq!(registry.len(), 1);
}

#[test]
fn concurrent_creates_get_unique_ids() {
    let registry = Arc::new(JobRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|_| registry.create(&request(&["A"])))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: HashSet<JobId> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(ids.len(), 400);
    assert_eq!(registry.len(), 400);
}
