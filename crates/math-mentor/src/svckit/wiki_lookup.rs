//! Wikipedia Lookup Tool
//!
//! Fetches article titles and intro extracts for a search query.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult,
    error::AgentError,
    tool::{ParameterSchema, ToolSchema},
};

use crate::error::MentorError;
use crate::knowledge::KnowledgeClient;

/// Tool for searching encyclopedia articles
pub struct WikiLookupTool {
    client: Arc<dyn KnowledgeClient>,
}

impl WikiLookupTool {
    pub fn new(client: Arc<dyn KnowledgeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WikiLookupTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "wikipedia".into(),
            description:
                "A tool for searching the internet to find information on the mentioned topics."
                    .into(),
            parameters: vec![ParameterSchema {
                name: "query".into(),
                param_type: "string".into(),
                description: "Topic to search for (e.g., 'Pythagorean theorem')".into(),
                required: true,
                default: None,
            }],
            category: Some("knowledge".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call
            .arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing query".into()))?;

        match self.client.search(query).await {
            Ok(articles) => {
                let mut output = String::new();
                for article in &articles {
                    output.push_str(&format!(
                        "Page: {}\nSummary: {}\n({})\n\n",
                        article.title, article.extract, article.url
                    ));
                }
                Ok(ToolResult::success("wikipedia", output.trim()))
            }
            Err(MentorError::NoResults(query)) => Ok(ToolResult::success(
                "wikipedia",
                format!("No good Wikipedia search result was found for '{}'.", query),
            )),
            Err(e) => Ok(ToolResult::failure("wikipedia", e.to_string())),
        }
    }
}
