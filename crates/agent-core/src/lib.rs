//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction, an extensible
//! tool system, and transcript session bookkeeping.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Session                               │
//! │  ┌──────────────┐   submit()   ┌──────────────────────────┐  │
//! │  │  Transcript  │─────────────▶│       AgentRunner        │  │
//! │  └──────────────┘              │  ┌────────┐ ┌──────────┐ │  │
//! │        │ signals               │  │ Tools  │ │ Provider │ │  │
//! │        ▼                       │  └────────┘ └──────────┘ │  │
//! │  ┌──────────────┐              └──────────────────────────┘  │
//! │  │   Notifier   │                                            │
//! │  └──────────────┘                                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Groq, Ollama, or any
//! other backend without changing agent logic. The `Notifier` and
//! `AgentObserver` traits decouple the core from any particular rendering
//! surface: the session signals warnings and errors synchronously, and the
//! reasoning loop reports intermediate thoughts the same way.

pub mod provider;
pub mod tool;
pub mod reasoning;
pub mod message;
pub mod notify;
pub mod error;
pub mod session;

pub use error::{AgentError, Result};
pub use message::{Message, Role, Transcript};
pub use notify::{AgentObserver, Notifier, NullNotifier, NullObserver};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentRunner, ObservedAgent};
pub use session::{Session, SubmitOutcome};
pub use tool::{Tool, ToolCall, ToolResult, ToolRegistry};
