#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use articler_core::JobRequest;
use articler_engine::{
    ArticleBuilder, Clock, CompletionError, CompletionRequest, CompletionService, FixedVariation,
    PromptVariation,
};
use chrono::{DateTime, TimeZone, Utc};

/// Scriptable completion service keyed by `sub1`.
#[derive(Default)]
pub struct StubCompletion {
    pub delays: HashMap<String, Duration>,
    pub failures: HashSet<String>,
    pub panics: HashSet<String>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl StubCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(mut self, sub1: &str, delay: Duration) -> Self {
        self.delays.insert(sub1.to_string(), delay);
        self
    }

    pub fn fail(mut self, sub1: &str) -> Self {
        self.failures.insert(sub1.to_string());
        self
    }

    pub fn panic_on(mut self, sub1: &str) -> Self {
        self.panics.insert(sub1.to_string());
        self
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CompletionService for StubCompletion {
    async fn generate(
        &self,
        request: &CompletionRequest,
        _variation: &PromptVariation,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&request.sub1) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panics.contains(&request.sub1) {
            panic!("stub panic for {}", request.sub1);
        }
        if self.failures.contains(&request.sub1) {
            return Err(CompletionError::HttpStatus(500));
        }
        Ok(format!("text about {} and {}", request.sub1, request.sub2))
    }
}

pub fn builder(completion: Arc<StubCompletion>, timeout: Duration) -> ArticleBuilder {
    ArticleBuilder::new(completion, Arc::new(FixedVariation::default()), timeout)
}

pub fn request(keywords: &[&str]) -> JobRequest {
    JobRequest {
        main_keyword: "main".to_string(),
        secondary_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        main_link: "https://main.example".to_string(),
        link_pool: vec!["L1".into(), "L2".into(), "L3".into()],
        title_pool: vec!["T1".into(), "T2".into(), "T3".into()],
    }
}

/// Wall clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }

    pub fn clock(&self) -> Clock {
        let inner = self.0.clone();
        Arc::new(move || *inner.lock().unwrap())
    }
}
