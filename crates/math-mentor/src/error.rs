//! Error Types for Math Mentor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MentorError>;

#[derive(Error, Debug)]
pub enum MentorError {
    #[error("Knowledge lookup error: {0}")]
    Knowledge(String),

    #[error("No results found for '{0}'")]
    NoResults(String),

    #[error("Evaluation error: {0}")]
    Eval(String),

    #[error("Chain error: {0}")]
    Chain(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<MentorError> for agent_core::AgentError {
    fn from(err: MentorError) -> Self {
        agent_core::AgentError::ToolExecution(err.to_string())
    }
}
