use std::fmt;

use url::form_urlencoded;

use crate::article::anchor;
use crate::{embedded_links, Article, EmbeddedLink, JobRequest};

const SEARCH_ENDPOINT: &str = "https://www.bing.com/search?q=";

/// Everything about an article that does not depend on generated text.
///
/// For a fixed index, pool contents and pair pointer the plan is fully
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePlan {
    pub no: usize,
    pub main_keyword: String,
    pub main_link: String,
    pub sub1: String,
    pub sub2: String,
    pub title: String,
    pub embedded: Vec<EmbeddedLink>,
    pub bing_link: String,
}

impl ArticlePlan {
    pub fn new(index: usize, request: &JobRequest, pair_pointer: usize, max_pairs: usize) -> Self {
        let keywords = &request.secondary_keywords;
        let (sub1, sub2) = match keywords.len() {
            0 => (String::new(), String::new()),
            1 => (keywords[0].clone(), keywords[0].clone()),
            n => (keywords[index % n].clone(), keywords[(index + 1) % n].clone()),
        };
        let title = format!(
            "{}-【网址：{}】-{}-{}",
            request.main_keyword, request.main_link, sub1, sub2
        );
        let embedded = embedded_links(
            &request.link_pool,
            &request.title_pool,
            pair_pointer,
            max_pairs,
        );
        let bing_link = search_link(&title);

        Self {
            no: index + 1,
            main_keyword: request.main_keyword.clone(),
            main_link: request.main_link.clone(),
            sub1,
            sub2,
            title,
            embedded,
            bing_link,
        }
    }

    /// Wraps generated text in the main-link anchor.
    pub fn success_html(&self, text: &str) -> String {
        self.wrap(text)
    }

    /// Inline notice used in place of generated text when generation failed.
    pub fn failure_html(&self, reason: &dyn fmt::Display) -> String {
        self.wrap(&format!("AI生成失败：{reason}"))
    }

    pub fn into_article(self, ai_html: String) -> Article {
        Article {
            no: self.no,
            title: self.title,
            ai_html,
            main_link: self.main_link,
            embedded: self.embedded,
            bing_link: self.bing_link,
        }
    }

    fn wrap(&self, body: &str) -> String {
        let text = format!("{} -【网址：{}】- {}", self.main_keyword, self.main_link, body);
        anchor(&self.main_link, &text)
    }
}

/// Search-engine query URL for `query`, form-urlencoded.
pub fn search_link(query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{SEARCH_ENDPOINT}{encoded}")
}
