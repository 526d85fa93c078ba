//! Reasoning Chain
//!
//! Fills a step-by-step solution template with the question and returns the
//! model's worked answer verbatim.

use std::sync::Arc;

use agent_core::message::Message;
use agent_core::provider::{GenerationOptions, LlmProvider};

use crate::error::{MentorError, Result};

/// Default step-by-step solution template
pub const REASONING_TEMPLATE: &str = r#"You are a mathematical assistant. Solve the given problem step-by-step. Clearly explain each step and the reasoning behind it. Present the solution in the following structure:

1. Restate the problem.
2. List the known quantities.
3. Work through the calculation step by step.
4. State the final answer.

Question: {question}
Answer:"#;

/// Chain that produces structured step-by-step solutions
pub struct ReasoningChain {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
    template: String,
}

impl ReasoningChain {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self {
            provider,
            options,
            template: REASONING_TEMPLATE.into(),
        }
    }

    /// Override the solution template. Must contain `{question}`.
    pub fn with_template(mut self, template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains("{question}") {
            return Err(MentorError::Config(
                "reasoning template must contain {question}".into(),
            ));
        }
        self.template = template;
        Ok(self)
    }

    /// Produce a worked, step-by-step answer
    pub async fn run(&self, question: &str) -> Result<String> {
        let prompt = self.template.replace("{question}", question.trim());
        let messages = vec![Message::user(prompt)];

        let completion = self
            .provider
            .complete(&messages, &self.options)
            .await
            .map_err(|e| MentorError::Chain(e.to_string()))?;

        Ok(completion.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_runtime::MockProvider;

    #[tokio::test]
    async fn test_returns_model_answer() {
        let chain = ReasoningChain::new(
            Arc::new(MockProvider::new().reply("1. The problem asks...\n4. The answer is 12.")),
            GenerationOptions::default(),
        );

        let answer = chain.run("A bag holds 3 dozen eggs...").await.unwrap();
        assert!(answer.ends_with("The answer is 12."));
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_chain_error() {
        let chain = ReasoningChain::new(
            Arc::new(MockProvider::new().failure("timeout")),
            GenerationOptions::default(),
        );

        let result = chain.run("anything").await;
        assert!(matches!(result, Err(MentorError::Chain(_))));
    }

    #[test]
    fn test_template_must_reference_question() {
        let chain = ReasoningChain::new(
            Arc::new(MockProvider::new()),
            GenerationOptions::default(),
        );

        assert!(chain.with_template("no placeholder here").is_err());
    }
}
