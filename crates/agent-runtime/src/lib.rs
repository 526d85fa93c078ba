//! # agent-runtime
//!
//! Runtime providers for the math-mentor agent system.
//!
//! ## Providers
//!
//! - **Groq** (default): hosted inference over the OpenAI-compatible
//!   chat-completions API, constructed from a user-supplied credential
//! - **Mock**: scripted provider for tests and offline demos
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::groq::GroqProvider;
//!
//! let provider = GroqProvider::new(api_key);
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "groq")]
pub mod groq;

pub mod mock;

#[cfg(feature = "groq")]
pub use groq::GroqProvider;

pub use mock::MockProvider;

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, Session, Tool, ToolRegistry,
};
