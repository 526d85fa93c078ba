//! Calculator Tool
//!
//! Arithmetic via the model-mediated math chain.

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult,
    error::AgentError,
    tool::{ParameterSchema, ToolSchema},
};

use crate::chains::MathChain;

/// Tool for answering math questions with exact arithmetic
pub struct CalculatorTool {
    chain: MathChain,
}

impl CalculatorTool {
    pub fn new(chain: MathChain) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "calculator".into(),
            description:
                "A tool for answering math-related questions. Only input mathematical expressions."
                    .into(),
            parameters: vec![ParameterSchema {
                name: "expression".into(),
                param_type: "string".into(),
                description: "Mathematical expression to evaluate (e.g., '2 + 2', '10 * 5')"
                    .into(),
                required: true,
                default: None,
            }],
            category: Some("math".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let expression = call
            .arguments
            .get("expression")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing expression".into()))?;

        match self.chain.run(expression).await {
            Ok(answer) => Ok(ToolResult::success("calculator", answer)),
            Err(e) => Ok(ToolResult::failure("calculator", e.to_string())),
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

    fn tool(provider: MockProvider) -> CalculatorTool {
        CalculatorTool::new(MathChain::new(
            Arc::new(provider),
            GenerationOptions::default(),
        ))
    }

    fn call(expression: &str) -> ToolCall {
        let mut arguments = HashMap::new();
        arguments.insert("expression".into(), serde_json::json!(expression));
        ToolCall {
            name: "calculator".into(),
            arguments,
            id: None,
        }
    }

    #[tokio::test]
    async fn test_plain_expression() {
        let tool = tool(MockProvider::new());

        let result = tool.execute(&call("(2 + 3) * 4")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "(2 + 3) * 4 = 20");
    }

    #[tokio::test]
    async fn test_division_by_zero_reports_failure() {
        let tool = tool(MockProvider::new());

        let result = tool.execute(&call("1 / 0")).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("division by zero"));
    }
}
