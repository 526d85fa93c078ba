//! Application State

use std::sync::Arc;

use agent_core::session::MemorySessionStore;
use math_mentor::knowledge::KnowledgeClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Knowledge backend for the wikipedia tool
    pub knowledge: Arc<dyn KnowledgeClient>,

    /// In-memory session list, discarded on process exit
    pub sessions: Arc<MemorySessionStore>,

    /// Credential fallback when a request carries none
    pub default_api_key: Option<String>,

    /// Model used when a request names none
    pub default_model: String,
}
