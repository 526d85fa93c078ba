//! math-mentor HTTP Server
//!
//! Axum-based server providing REST API and WebSocket endpoints for the
//! math-and-knowledge chat assistant. The agent is wired with the wikipedia,
//! calculator, and reasoning tools; the LLM credential is supplied per
//! request (UI sidebar) or via `GROQ_API_KEY`.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::session::MemorySessionStore;
use math_mentor::knowledge::{KnowledgeClient, WikipediaClient};

use crate::handlers::{
    chat_handler, chat_stream_handler, get_transcript, health_check, list_models,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Knowledge backend for the wikipedia tool
    let knowledge: Arc<dyn KnowledgeClient> = Arc::new(WikipediaClient::new());

    if knowledge.health_check().await {
        tracing::info!("✓ {} reachable", knowledge.name());
    } else {
        tracing::warn!("⚠ {} not reachable - lookups will fail", knowledge.name());
    }

    // Credential fallback; requests may carry their own key
    let default_api_key = std::env::var("GROQ_API_KEY").ok();

    if default_api_key.is_some() {
        tracing::info!("✓ Groq credential configured from environment");
    } else {
        tracing::warn!("⚠ No GROQ_API_KEY set - clients must supply a key per request");
    }

    let default_model =
        std::env::var("GROQ_MODEL").unwrap_or_else(|_| "gemma2-9b-it".into());
    tracing::info!("Default model: {}", default_model);

    // Build application state
    let state = AppState {
        knowledge,
        sessions: Arc::new(MemorySessionStore::new()),
        default_api_key,
        default_model,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))

        // Agent API
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/stream", get(chat_stream_handler))
        .route("/api/chat/{conversation_id}", get(get_transcript))

        // Static files (WASM frontend)
        .nest_service("/", tower_http::services::ServeDir::new("static"))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 math-mentor server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             - Health check");
    tracing::info!("  GET  /api/models         - List available models");
    tracing::info!("  POST /api/chat           - Submit a question");
    tracing::info!("  GET  /api/chat/stream    - WebSocket reasoning stream");
    tracing::info!("  GET  /api/chat/:id       - Conversation transcript");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
