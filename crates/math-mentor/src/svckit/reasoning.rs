//! Reasoning Tool
//!
//! Step-by-step solutions via the reasoning template chain.

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult,
    error::AgentError,
    tool::{ParameterSchema, ToolSchema},
};

use crate::chains::ReasoningChain;

/// Tool for logic and word problems needing a worked solution
pub struct ReasoningTool {
    chain: ReasoningChain,
}

impl ReasoningTool {
    pub fn new(chain: ReasoningChain) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl Tool for ReasoningTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "reasoning".into(),
            description:
                "A tool for answering logic-based and reasoning questions with a step-by-step explanation."
                    .into(),
            parameters: vec![ParameterSchema {
                name: "question".into(),
                param_type: "string".into(),
                description: "The full question to solve step by step".into(),
                required: true,
                default: None,
            }],
            category: Some("math".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let question = call
            .arguments
            .get("question")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing question".into()))?;

        match self.chain.run(question).await {
            Ok(answer) => Ok(ToolResult::success("reasoning", answer)),
            Err(e) => Ok(ToolResult::failure("reasoning", e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::provider::GenerationOptions;
    use agent_runtime::MockProvider;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_returns_worked_solution() {
        let chain = ReasoningChain::new(
            Arc::new(MockProvider::new().reply("1. Restate...\n4. The answer is 42.")),
            GenerationOptions::default(),
        );
        let tool = ReasoningTool::new(chain);

        let mut arguments = HashMap::new();
        arguments.insert("question".into(), serde_json::json!("What is six times seven?"));
        let call = ToolCall {
            name: "reasoning".into(),
            arguments,
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("The answer is 42."));
    }
}
