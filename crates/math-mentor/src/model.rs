//! Domain Types

use serde::{Deserialize, Serialize};

/// A knowledge article returned by a lookup
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    /// Page title
    pub title: String,

    /// Plain-text introduction/summary
    pub extract: String,

    /// Canonical page URL
    pub url: String,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        extract: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            extract: extract.into(),
            url: url.into(),
        }
    }
}
