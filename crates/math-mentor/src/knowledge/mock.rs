//! Mock Knowledge Client
//!
//! For testing and demo purposes. Serves a small set of static articles.

use std::collections::HashMap;

use async_trait::async_trait;

use super::KnowledgeClient;
use crate::error::{MentorError, Result};
use crate::model::Article;

/// Mock knowledge client with static articles
pub struct MockKnowledgeClient {
    articles: HashMap<String, Article>,
}

impl Default for MockKnowledgeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockKnowledgeClient {
    pub fn new() -> Self {
        let mut client = Self {
            articles: HashMap::new(),
        };

        for (title, extract) in BUILTIN_TOPICS {
            client = client.with_article(title, extract);
        }

        client
    }

    /// Create with no built-in topics
    pub fn empty() -> Self {
        Self {
            articles: HashMap::new(),
        }
    }

    /// Add an article (keyed by lowercased title)
    pub fn with_article(mut self, title: &str, extract: &str) -> Self {
        let url = format!(
            "https://en.wikipedia.org/wiki/{}",
            title.replace(' ', "_")
        );
        self.articles
            .insert(title.to_lowercase(), Article::new(title, extract, url));
        self
    }
}

#[async_trait]
impl KnowledgeClient for MockKnowledgeClient {
    async fn search(&self, query: &str) -> Result<Vec<Article>> {
        let query_lower = query.to_lowercase();

        let mut hits: Vec<Article> = self
            .articles
            .iter()
            .filter(|(key, _)| key.contains(&query_lower) || query_lower.contains(key.as_str()))
            .map(|(_, article)| article.clone())
            .collect();
        hits.sort_by(|a, b| a.title.cmp(&b.title));

        if hits.is_empty() {
            return Err(MentorError::NoResults(query.to_string()));
        }

        Ok(hits)
    }

    async fn health_check(&self) -> bool {
        true // Mock always healthy
    }

    fn name(&self) -> &str {
        "MockKnowledge"
    }
}

const BUILTIN_TOPICS: &[(&str, &str)] = &[
    (
        "Cricket",
        "Cricket is a bat-and-ball game played between two teams of eleven players. \
         A standard one-day innings lasts fifty overs of six balls each.",
    ),
    (
        "Pythagorean theorem",
        "In mathematics, the Pythagorean theorem states that the square of the hypotenuse \
         of a right triangle equals the sum of the squares of the other two sides.",
    ),
    (
        "Prime number",
        "A prime number is a natural number greater than 1 that has no positive divisors \
         other than 1 and itself.",
    ),
    (
        "Calculus",
        "Calculus is the mathematical study of continuous change, developed independently \
         by Isaac Newton and Gottfried Wilhelm Leibniz in the late 17th century.",
    ),
    (
        "Probability",
        "Probability is a branch of mathematics concerning numerical descriptions of how \
         likely an event is to occur, expressed as a number between 0 and 1.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_topic_resolves() {
        let client = MockKnowledgeClient::new();

        let articles = client.search("prime number").await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Prime number");
        assert!(articles[0].url.ends_with("Prime_number"));
    }

    #[tokio::test]
    async fn test_unknown_topic_errors() {
        let client = MockKnowledgeClient::new();

        let result = client.search("octarine").await;
        assert!(matches!(result, Err(MentorError::NoResults(_))));
    }

    #[tokio::test]
    async fn test_custom_article() {
        let client = MockKnowledgeClient::empty().with_article("Topology", "Rubber-sheet geometry.");

        let articles = client.search("topology").await.unwrap();
        assert_eq!(articles[0].extract, "Rubber-sheet geometry.");
    }
}
