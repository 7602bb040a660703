use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Article, JobRequest};

/// Opaque job identifier: 128 random bits rendered as 32 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of one content-generation request.
///
/// Articles arrive in completion order. `finish` restores `no` order once,
/// after which the job is frozen: further records, finishes and failures
/// are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: JobId,
    created_at: DateTime<Utc>,
    total: usize,
    articles: Vec<Article>,
    done: bool,
    error: Option<String>,
    progress: f64,
    main_keyword: String,
    main_link: String,
}

impl Job {
    pub fn new(id: JobId, request: &JobRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            total: request.total(),
            articles: Vec::new(),
            done: false,
            error: None,
            progress: 0.0,
            main_keyword: request.main_keyword.clone(),
            main_link: request.main_link.clone(),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fraction of articles recorded. Reaches 1.0 with the last article,
    /// which can be before the job is done: completion is `is_done`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether the job was created strictly before `cutoff`.
    pub fn is_expired(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }

    /// Appends a completed article and recomputes progress by count.
    /// Returns false when the job is already done.
    pub fn record_article(&mut self, article: Article) -> bool {
        if self.done {
            return false;
        }
        self.articles.push(article);
        let fraction = self.articles.len() as f64 / self.total.max(1) as f64;
        self.progress = self.progress.max(fraction.min(1.0));
        true
    }

    /// Sorts articles by `no` and marks the job done.
    pub fn finish(&mut self) {
        if self.done {
            return;
        }
        self.articles.sort_by_key(|article| article.no);
        self.progress = 1.0;
        self.done = true;
    }

    /// Marks the job done with a fatal error, keeping partial articles as they are.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.done {
            return;
        }
        self.error = Some(message.into());
        self.done = true;
    }

    /// Detached copy for external reporting.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            total: self.total,
            articles: self.articles.clone(),
            done: self.done,
            error: self.error.clone(),
            progress: self.progress,
            main_keyword: self.main_keyword.clone(),
            main_link: self.main_link.clone(),
        }
    }
}

/// What a poller sees of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub total: usize,
    pub articles: Vec<Article>,
    pub done: bool,
    pub error: Option<String>,
    pub progress: f64,
    pub main_keyword: String,
    pub main_link: String,
}
