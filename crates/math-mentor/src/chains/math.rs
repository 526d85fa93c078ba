//! Math Chain
//!
//! Model-mediated arithmetic: input that already parses as an expression is
//! evaluated directly; anything else is first translated by the LLM into a
//! single-line expression, then evaluated numerically. The model never
//! produces the final number itself.

use std::sync::Arc;

use agent_core::message::Message;
use agent_core::provider::{GenerationOptions, LlmProvider};

use crate::error::{MentorError, Result};
use crate::eval;

const TRANSLATE_PROMPT: &str = r#"Translate the math problem below into a single-line mathematical expression using only numbers, parentheses, and the operators + - * / ^. Respond with the expression alone, no explanation.

Question: {question}
Expression:"#;

/// Chain that turns math questions into evaluated expressions
pub struct MathChain {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl MathChain {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        // Translation should be deterministic
        let options = GenerationOptions {
            temperature: 0.0,
            ..options
        };
        Self { provider, options }
    }

    /// Evaluate an expression or word problem
    pub async fn run(&self, input: &str) -> Result<String> {
        // Plain expressions never touch the model; a broken expression is a
        // broken expression, not a word problem
        match eval::evaluate(input) {
            Ok(value) => {
                return Ok(format!("{} = {}", input.trim(), eval::format_number(value)));
            }
            Err(e) if looks_like_expression(input) => return Err(e),
            Err(_) => {}
        }

        let prompt = TRANSLATE_PROMPT.replace("{question}", input.trim());
        let messages = vec![Message::user(prompt)];

        let completion = self
            .provider
            .complete(&messages, &self.options)
            .await
            .map_err(|e| MentorError::Chain(e.to_string()))?;

        let expression = extract_expression(&completion.content).ok_or_else(|| {
            MentorError::Eval("the model did not produce an expression".into())
        })?;

        let value = eval::evaluate(&expression)?;
        tracing::debug!(input = %input, expression = %expression, "Translated math problem");

        Ok(format!("{} = {}", expression, eval::format_number(value)))
    }
}

/// Input made only of digits, operators, and parentheses is an expression,
/// however malformed
fn looks_like_expression(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-*/^().".contains(c))
}

/// Pull a candidate expression out of a model reply.
///
/// Accepts fenced blocks, an `Expression:` prefix, or a bare line.
fn extract_expression(content: &str) -> Option<String> {
    let content = content.trim();

    // Fenced block: take the inside, dropping an optional language tag
    let body = if let Some(start) = content.find("```") {
        let after = &content[start + 3..];
        let end = after.find("```")?;
        let inner = &after[..end];
        inner
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.chars().all(char::is_alphabetic))
            .map(String::from)?
    } else {
        content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(String::from)?
    };

    let body = body
        .strip_prefix("Expression:")
        .map(str::trim)
        .unwrap_or(&body);

    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}
