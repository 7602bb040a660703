use serde::{Deserialize, Serialize};

/// Parameters of one batch generation request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequest {
    pub main_keyword: String,
    pub secondary_keywords: Vec<String>,
    pub main_link: String,
    pub link_pool: Vec<String>,
    pub title_pool: Vec<String>,
}

impl JobRequest {
    /// Builds a request from raw free-text inputs, one list entry per line.
    pub fn from_text_fields(
        main_keyword: &str,
        secondary_keywords: &str,
        main_link: &str,
        link_pool: &str,
        title_pool: &str,
    ) -> Self {
        Self {
            main_keyword: main_keyword.trim().to_string(),
            secondary_keywords: parse_lines(secondary_keywords),
            main_link: main_link.trim().to_string(),
            link_pool: parse_lines(link_pool),
            title_pool: parse_lines(title_pool),
        }
    }

    /// Applies the free-text intake rule to an already structured request:
    /// scalars trimmed, list entries trimmed and blank entries dropped.
    pub fn normalized(self) -> Self {
        Self {
            main_keyword: self.main_keyword.trim().to_string(),
            secondary_keywords: clean_entries(self.secondary_keywords.iter()),
            main_link: self.main_link.trim().to_string(),
            link_pool: clean_entries(self.link_pool.iter()),
            title_pool: clean_entries(self.title_pool.iter()),
        }
    }

    /// Number of articles this request produces.
    pub fn total(&self) -> usize {
        self.secondary_keywords.len()
    }
}

/// Splits newline-separated input into trimmed, non-empty entries.
pub fn parse_lines(raw: &str) -> Vec<String> {
    clean_entries(raw.lines())
}

fn clean_entries<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| entry.as_ref().trim().to_owned())
        .filter(|entry| !entry.is_empty())
        .collect()
}
