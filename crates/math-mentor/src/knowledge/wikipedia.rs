//! Wikipedia Knowledge Client
//!
//! Queries the MediaWiki Action API: a title search followed by plain-text
//! intro extracts for the top hits.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::KnowledgeClient;
use crate::error::{MentorError, Result};
use crate::model::Article;

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

/// How much of an intro extract to keep per article
const MAX_EXTRACT_CHARS: usize = 1200;

/// Wikipedia client over the MediaWiki API
pub struct WikipediaClient {
    http: reqwest::Client,
    base_url: String,
    top_k: usize,
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            top_k: 3,
        }
    }

    /// Point at a different MediaWiki instance (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Number of pages to load per query
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    fn api_url(&self) -> String {
        format!("{}/w/api.php", self.base_url)
    }

    fn page_url(&self, title: &str) -> String {
        format!("{}/wiki/{}", self.base_url, title.replace(' ', "_"))
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.top_k.to_string();
        let response = self
            .http
            .get(self.api_url())
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MentorError::Knowledge(format!(
                "search returned HTTP {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await?;

        Ok(body
            .query
            .search
            .into_iter()
            .map(|hit| hit.title)
            .collect())
    }

    async fn intro_extract(&self, title: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.api_url())
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MentorError::Knowledge(format!(
                "extract returned HTTP {}",
                response.status()
            )));
        }

        let body: ExtractResponse = response.json().await?;

        Ok(body
            .query
            .pages
            .into_values()
            .next()
            .and_then(|page| page.extract)
            .map(|text| truncate_extract(&text, MAX_EXTRACT_CHARS)))
    }
}

#[async_trait]
impl KnowledgeClient for WikipediaClient {
    async fn search(&self, query: &str) -> Result<Vec<Article>> {
        let titles = self.search_titles(query).await?;

        if titles.is_empty() {
            return Err(MentorError::NoResults(query.to_string()));
        }

        let mut articles = Vec::new();
        for title in titles {
            match self.intro_extract(&title).await {
                Ok(Some(extract)) => {
                    articles.push(Article::new(&title, extract, self.page_url(&title)));
                }
                Ok(None) => {
                    tracing::debug!(title = %title, "Page had no intro extract");
                }
                Err(e) => {
                    tracing::warn!(title = %title, error = %e, "Extract fetch failed");
                }
            }
        }

        if articles.is_empty() {
            return Err(MentorError::NoResults(query.to_string()));
        }

        Ok(articles)
    }

    async fn health_check(&self) -> bool {
        match self
            .http
            .get(self.api_url())
            .query(&[("action", "query"), ("format", "json")])
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Wikipedia health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "Wikipedia"
    }
}

/// Cut at a character boundary, appending an ellipsis when shortened
fn truncate_extract(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.trim().to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    extract: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_uses_underscores() {
        let client = WikipediaClient::new();
        assert_eq!(
            client.page_url("Pythagorean theorem"),
            "https://en.wikipedia.org/wiki/Pythagorean_theorem"
        );
    }

    #[test]
    fn test_truncate_extract() {
        assert_eq!(truncate_extract("short", 10), "short");
        assert_eq!(truncate_extract("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"query": {"search": [{"title": "Cricket", "pageid": 1}, {"title": "Cricket (insect)", "pageid": 2}]}}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.query.search.len(), 2);
        assert_eq!(parsed.query.search[0].title, "Cricket");
    }

    #[test]
    fn test_parse_extract_response() {
        let json = r#"{"query": {"pages": {"123": {"title": "Cricket", "extract": "Cricket is a bat-and-ball game."}}}}"#;
        let parsed: ExtractResponse = serde_json::from_str(json).unwrap();
        let page = parsed.query.pages.into_values().next().unwrap();
        assert_eq!(page.extract.as_deref(), Some("Cricket is a bat-and-ball game."));
    }
}
