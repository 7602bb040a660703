use serde::{Deserialize, Serialize};

/// One link/title pairing shown inside an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedLink {
    pub title: String,
    pub link: String,
    pub html: String,
}

impl EmbeddedLink {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        let title = title.into();
        let link = link.into();
        let html = anchor(&link, &title);
        Self { title, link, html }
    }
}

/// One generated output unit. Built once, never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// 1-based position of the secondary keyword this article was built for.
    pub no: usize,
    pub title: String,
    pub ai_html: String,
    pub main_link: String,
    pub embedded: Vec<EmbeddedLink>,
    pub bing_link: String,
}

pub(crate) fn anchor(href: &str, text: &str) -> String {
    format!(r#"<a href="{href}" target="_blank">{text}</a>"#)
}
