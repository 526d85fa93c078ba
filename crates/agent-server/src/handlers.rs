//! HTTP/WebSocket Handlers

use axum::{
    Json,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use agent_core::{
    AgentError, AgentObserver, LlmProvider, Notifier, ObservedAgent,
    provider::GenerationOptions,
    reasoning::{Agent, AgentConfig},
    session::{Session, SessionId, SessionStore, SubmitOutcome},
    tool::{ToolCall, ToolRegistry, ToolResult},
};
use agent_runtime::GroqProvider;
use math_mentor::{
    GREETING, MATH_MENTOR_PROMPT, MathChain, ReasoningChain,
    tools::{CalculatorTool, ReasoningTool, WikiLookupTool},
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub knowledge_reachable: bool,
    pub credential_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub conversation_id: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// One of "info", "warning", "error"
    pub severity: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub conversation_id: String,
    pub messages: Vec<TranscriptMessage>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptMessage {
    pub role: String,
    pub content: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, severity: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: code.into(),
            severity: severity.into(),
        }),
    )
}

fn missing_credential() -> ApiError {
    api_error(
        StatusCode::UNAUTHORIZED,
        "MISSING_CREDENTIAL",
        "info",
        AgentError::MissingCredential("no API key supplied".into()).user_message(),
    )
}

// ============================================================================
// Agent Assembly
// ============================================================================

/// Build an agent bound to a credential.
///
/// The provider is constructed per request because the credential arrives
/// with the request; the chains behind the calculator and reasoning tools
/// share it.
pub fn build_agent(state: &AppState, api_key: &str, model: &str) -> Agent {
    let provider: Arc<dyn LlmProvider> = Arc::new(GroqProvider::new(api_key));

    let generation = GenerationOptions {
        model: model.to_string(),
        ..Default::default()
    };

    let mut tools = ToolRegistry::new();
    tools.register(WikiLookupTool::new(state.knowledge.clone()));
    tools.register(CalculatorTool::new(MathChain::new(
        provider.clone(),
        generation.clone(),
    )));
    tools.register(ReasoningTool::new(ReasoningChain::new(
        provider.clone(),
        generation.clone(),
    )));

    let config = AgentConfig {
        system_prompt: MATH_MENTOR_PROMPT.into(),
        generation,
        ..Default::default()
    };

    Agent::new(provider, Arc::new(tools), config)
}

fn resolve_api_key(state: &AppState, request_key: Option<&str>) -> Option<String> {
    request_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .or_else(|| state.default_api_key.clone())
}

fn load_or_create_session(state: &AppState, conversation_id: Option<&str>) -> Session {
    if let Some(id) = conversation_id {
        let session_id = SessionId::from_string(id);
        if let Ok(Some(session)) = state.sessions.load(&session_id) {
            return session;
        }
        let mut session = Session::with_greeting(GREETING);
        session.id = session_id;
        return session;
    }

    Session::with_greeting(GREETING)
}

/// Notifier that records signals for the HTTP response
#[derive(Default)]
struct CapturedSignals {
    last: Mutex<Option<String>>,
}

impl CapturedSignals {
    fn message(&self, fallback: &str) -> String {
        self.last
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
            .unwrap_or_else(|| fallback.into())
    }
}

impl Notifier for CapturedSignals {
    fn info(&self, message: &str) {
        if let Ok(mut guard) = self.last.lock() {
            *guard = Some(message.into());
        }
    }
    fn warning(&self, message: &str) {
        self.info(message);
    }
    fn error(&self, message: &str) {
        self.info(message);
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let knowledge_reachable = state.knowledge.health_check().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        knowledge_reachable,
        credential_configured: state.default_api_key.is_some(),
    })
}

/// List available models for the configured credential
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let api_key = state.default_api_key.clone().ok_or_else(missing_credential)?;

    let provider = GroqProvider::new(api_key);
    let models = provider.list_models().await.map_err(|e| {
        api_error(
            StatusCode::BAD_GATEWAY,
            "PROVIDER_ERROR",
            "error",
            e.user_message(),
        )
    })?;

    Ok(Json(serde_json::json!({ "models": models })))
}

/// Main chat endpoint (non-streaming)
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let api_key =
        resolve_api_key(&state, payload.api_key.as_deref()).ok_or_else(missing_credential)?;

    let model = payload
        .model
        .clone()
        .unwrap_or_else(|| state.default_model.clone());

    let agent = build_agent(&state, &api_key, &model);
    let mut session = load_or_create_session(&state, payload.conversation_id.as_deref());
    let signals = CapturedSignals::default();

    let outcome = session.submit(&payload.message, &agent, &signals).await;
    let conversation_id = session.id.to_string();

    match outcome {
        SubmitOutcome::Answered(answer) => {
            if let Err(e) = state.sessions.save(&session) {
                tracing::warn!("Failed to save session: {}", e);
            }
            Ok(Json(ChatResponse {
                message: answer,
                conversation_id,
                model,
            }))
        }
        SubmitOutcome::Empty => Err(api_error(
            StatusCode::BAD_REQUEST,
            "EMPTY_INPUT",
            "warning",
            signals.message("Please enter a question."),
        )),
        SubmitOutcome::Failed(e) => {
            // The transcript keeps the user message; persist it so the
            // conversation stays consistent on the next request.
            if let Err(save_err) = state.sessions.save(&session) {
                tracing::warn!("Failed to save session: {}", save_err);
            }

            let (status, code) = match e {
                AgentError::Auth(_) => (StatusCode::UNAUTHORIZED, "AUTH_FAILED"),
                AgentError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
                _ => (StatusCode::BAD_GATEWAY, "AGENT_ERROR"),
            };

            Err(api_error(
                status,
                code,
                "error",
                signals.message("An unexpected error occurred."),
            ))
        }
    }
}

/// Full ordered transcript for one conversation
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let session_id = SessionId::from_string(&conversation_id);

    let session = state
        .sessions
        .load(&session_id)
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SESSION_ERROR",
                "error",
                e.user_message(),
            )
        })?
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                "UNKNOWN_CONVERSATION",
                "error",
                format!("No conversation with id {}", conversation_id),
            )
        })?;

    Ok(Json(TranscriptResponse {
        conversation_id,
        messages: session
            .all()
            .iter()
            .map(|m| TranscriptMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect(),
    }))
}

// ============================================================================
// WebSocket Streaming
// ============================================================================

/// WebSocket endpoint streaming intermediate reasoning as it happens
pub async fn chat_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

/// Forwards observer and notifier events to the client as JSON frames
struct StreamEvents {
    tx: mpsc::UnboundedSender<serde_json::Value>,
}

impl StreamEvents {
    fn send(&self, event: serde_json::Value) {
        let _ = self.tx.send(event);
    }
}

impl AgentObserver for StreamEvents {
    fn on_thought(&self, content: &str) {
        self.send(serde_json::json!({"type": "thought", "content": content}));
    }

    fn on_tool_call(&self, call: &ToolCall) {
        self.send(serde_json::json!({
            "type": "tool_call",
            "tool": call.name,
            "arguments": call.arguments,
        }));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        self.send(serde_json::json!({
            "type": "tool_result",
            "tool": result.name,
            "success": result.success,
            "output": result.output,
        }));
    }
}

impl Notifier for StreamEvents {
    fn info(&self, message: &str) {
        self.send(serde_json::json!({"type": "info", "message": message}));
    }

    fn warning(&self, message: &str) {
        self.send(serde_json::json!({"type": "warning", "message": message}));
    }

    fn error(&self, message: &str) {
        self.send(serde_json::json!({"type": "error", "message": message}));
    }
}

async fn handle_stream(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
            _ => continue,
        };

        // Parse request
        let request: ChatRequest = match serde_json::from_str(&msg) {
            Ok(r) => r,
            Err(e) => {
                let error =
                    serde_json::json!({"type": "error", "message": e.to_string()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
                continue;
            }
        };

        let Some(api_key) = resolve_api_key(&state, request.api_key.as_deref()) else {
            let info = serde_json::json!({
                "type": "info",
                "message": AgentError::MissingCredential("no API key supplied".into())
                    .user_message(),
            });
            let _ = sender.send(Message::Text(info.to_string().into())).await;
            continue;
        };

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| state.default_model.clone());
        let agent = build_agent(&state, &api_key, &model);
        let mut session = load_or_create_session(&state, request.conversation_id.as_deref());
        let question = request.message;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let events = Arc::new(StreamEvents { tx });
        let runner = ObservedAgent::new(agent, events.clone());

        // Run the submission concurrently so events stream as they happen
        let worker = tokio::spawn(async move {
            let outcome = session.submit(&question, &runner, events.as_ref()).await;

            if let SubmitOutcome::Answered(answer) = &outcome {
                events.send(serde_json::json!({
                    "type": "answer",
                    "content": answer,
                    "conversation_id": session.id.to_string(),
                    "model": model,
                }));
            }

            session
        });

        while let Some(event) = rx.recv().await {
            if sender.send(Message::Text(event.to_string().into())).await.is_err() {
                break;
            }
        }

        match worker.await {
            Ok(session) => {
                if let Err(e) = state.sessions.save(&session) {
                    tracing::warn!("Failed to save session: {}", e);
                }
            }
            Err(e) => tracing::error!("Stream worker panicked: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_mentor::knowledge::MockKnowledgeClient;

    fn test_state(default_api_key: Option<&str>) -> AppState {
        AppState {
            knowledge: Arc::new(MockKnowledgeClient::new()),
            sessions: Arc::new(agent_core::session::MemorySessionStore::new()),
            default_api_key: default_api_key.map(String::from),
            default_model: "gemma2-9b-it".into(),
        }
    }

    #[test]
    fn test_resolve_api_key_prefers_request() {
        let state = test_state(Some("env-key"));
        assert_eq!(
            resolve_api_key(&state, Some("request-key")).as_deref(),
            Some("request-key")
        );
        assert_eq!(resolve_api_key(&state, None).as_deref(), Some("env-key"));
        assert_eq!(resolve_api_key(&state, Some("  ")).as_deref(), Some("env-key"));
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let state = test_state(None);
        assert!(resolve_api_key(&state, None).is_none());
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let state = test_state(None);
        let session = load_or_create_session(&state, None);

        assert_eq!(session.message_count(), 1);
        assert_eq!(session.all()[0].content, GREETING);
    }

    #[test]
    fn test_session_reloaded_by_conversation_id() {
        let state = test_state(None);
        let session = load_or_create_session(&state, Some("abc-123"));
        state.sessions.save(&session).unwrap();

        let reloaded = load_or_create_session(&state, Some("abc-123"));
        assert_eq!(reloaded.id.as_str(), "abc-123");
        assert_eq!(reloaded.message_count(), 1);
    }

    #[test]
    fn test_build_agent_registers_three_tools() {
        let state = test_state(None);
        let agent = build_agent(&state, "gsk_test", "gemma2-9b-it");

        let mut names = agent.tools().names();
        names.sort_unstable();
        assert_eq!(names, vec!["calculator", "reasoning", "wikipedia"]);
    }
}
