//! Rendering Surface Signals
//!
//! The core never talks to a UI directly. Warnings, errors and intermediate
//! agent reasoning go through these traits, invoked synchronously, so any
//! rendering surface (web page, WebSocket frame, test harness) can plug in.

use crate::tool::{ToolCall, ToolResult};

/// Dedicated notification calls for the rendering surface.
pub trait Notifier: Send + Sync {
    /// Informational message (e.g. missing credential)
    fn info(&self, message: &str);

    /// Warning that left state unchanged (e.g. empty input)
    fn warning(&self, message: &str);

    /// Error from a failed request
    fn error(&self, message: &str);
}

/// Notifier that drops all signals
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn info(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Observer for intermediate reasoning produced while an agent works.
///
/// The reasoning loop calls these between provider round-trips; a streaming
/// handler can forward them to the client as they arrive.
pub trait AgentObserver: Send + Sync {
    /// An assistant "thought" that led to a tool call
    fn on_thought(&self, _content: &str) {}

    /// A tool is about to execute
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// A tool finished executing
    fn on_tool_result(&self, _result: &ToolResult) {}
}

/// Observer that ignores all events
pub struct NullObserver;

impl AgentObserver for NullObserver {}
