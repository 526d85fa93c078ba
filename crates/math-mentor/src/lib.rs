//! # math-mentor
//!
//! Math problem solving and knowledge lookup for the agent: the three tools
//! the assistant is wired with, and the chains behind them.
//!
//! ## Tool routing
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  "Who invented calculus?"      ──▶  wikipedia lookup       │
//! │  "What is 17 * 24?"            ──▶  calculator (MathChain) │
//! │  "A train leaves at 9am..."    ──▶  reasoning template     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator is model-mediated: plain expressions evaluate directly,
//! word problems are first translated by the LLM into a single-line
//! expression and then evaluated numerically, so arithmetic is never left
//! to the language model.

pub mod svckit;
pub mod chains;
pub mod knowledge;
pub mod eval;
pub mod model;
pub mod error;

pub use error::{MentorError, Result};
pub use model::Article;
pub use chains::{MathChain, ReasoningChain};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{CalculatorTool, ReasoningTool, WikiLookupTool};
}

/// Greeting the transcript is seeded with
pub const GREETING: &str = "Hi, I am a Math Chatbot who can answer all your math questions!";

/// System prompt for the math mentor agent
pub const MATH_MENTOR_PROMPT: &str = r#"You are a mathematics assistant that answers math and general-knowledge questions.

## How to Answer

1. For factual or topical questions, use `wikipedia` to look up information first.
2. For arithmetic, use `calculator` and pass it a plain mathematical expression.
3. For word problems and multi-step logic, use `reasoning` to produce a step-by-step solution.
4. Synthesize tool results into a clear final answer. Show the key steps, not just the result.

## Accuracy

- Never do arithmetic in your head when `calculator` can do it.
- If a lookup returns nothing useful, say so instead of guessing.
- If you can answer a simple question directly without tools, do so.

Be concise and accurate."#;
