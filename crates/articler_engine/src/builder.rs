use std::sync::Arc;
use std::time::Duration;

use articler_core::{Article, ArticlePlan, JobRequest};
use engine_logging::{engine_debug, engine_warn};

use crate::completion::{CompletionError, CompletionRequest, CompletionService};
use crate::prompt::VariationStrategy;

/// Builds one article: the deterministic plan plus generated text.
///
/// Completion failures and timeouts are turned into an inline notice in
/// `ai_html`; building itself never fails.
#[derive(Clone)]
pub struct ArticleBuilder {
    completion: Arc<dyn CompletionService>,
    variation: Arc<dyn VariationStrategy>,
    timeout: Duration,
}

impl ArticleBuilder {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        variation: Arc<dyn VariationStrategy>,
        timeout: Duration,
    ) -> Self {
        Self {
            completion,
            variation,
            timeout,
        }
    }

    pub async fn build(
        &self,
        index: usize,
        request: &JobRequest,
        pair_pointer: usize,
        max_pairs: usize,
    ) -> Article {
        let plan = ArticlePlan::new(index, request, pair_pointer, max_pairs);
        let completion_request = CompletionRequest {
            main_keyword: plan.main_keyword.clone(),
            main_link: plan.main_link.clone(),
            sub1: plan.sub1.clone(),
            sub2: plan.sub2.clone(),
        };
        let variation = self.variation.pick();

        let generated = tokio::time::timeout(
            self.timeout,
            self.completion.generate(&completion_request, &variation),
        )
        .await
        .unwrap_or(Err(CompletionError::Timeout));

        let ai_html = match generated {
            Ok(text) => {
                engine_debug!("Article {} generated chars={}", plan.no, text.chars().count());
                plan.success_html(&text)
            }
            Err(err) => {
                engine_warn!("Article {} generation failed: {}", plan.no, err);
                plan.failure_html(&err)
            }
        };
        plan.into_article(ai_html)
    }
}
