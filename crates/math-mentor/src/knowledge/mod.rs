//! Knowledge Lookup
//!
//! Abstractions and implementations for encyclopedia-style lookups.

mod wikipedia;
mod mock;

pub use mock::MockKnowledgeClient;
pub use wikipedia::WikipediaClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Article;

/// Knowledge source trait (Strategy pattern)
///
/// Implement this for each backend: Wikipedia, a local corpus, etc.
#[async_trait]
pub trait KnowledgeClient: Send + Sync {
    /// Search for articles matching a query
    async fn search(&self, query: &str) -> Result<Vec<Article>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Backend name
    fn name(&self) -> &str;
}
