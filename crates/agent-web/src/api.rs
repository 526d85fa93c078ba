//! API Client

use serde::{Deserialize, Serialize};

/// Chat message for display
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Successful chat reply
#[derive(Clone, Debug)]
pub struct ChatReply {
    pub message: String,
    pub conversation_id: String,
}

/// Signal surfaced by the backend (info / warning / error)
#[derive(Clone, Debug)]
pub struct Notice {
    pub severity: String,
    pub message: String,
}

impl Notice {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: "error".into(),
            message: message.into(),
        }
    }
}

/// Send a chat message to the backend
pub async fn send_chat(
    message: &str,
    api_key: Option<&str>,
    conversation_id: Option<&str>,
) -> Result<ChatReply, Notice> {
    let client = reqwest::Client::new();

    let mut body = serde_json::json!({
        "message": message,
    });

    if let Some(key) = api_key {
        body["api_key"] = serde_json::json!(key);
    }

    if let Some(id) = conversation_id {
        body["conversation_id"] = serde_json::json!(id);
    }

    let response = client
        .post("/api/chat")
        .json(&body)
        .send()
        .await
        .map_err(|e| Notice::error(e.to_string()))?;

    if response.status().is_success() {
        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Notice::error(e.to_string()))?;
        Ok(ChatReply {
            message: data["message"].as_str().unwrap_or("No response").to_string(),
            conversation_id: data["conversation_id"].as_str().unwrap_or_default().to_string(),
        })
    } else {
        let data: serde_json::Value = response.json().await.unwrap_or_default();
        Err(Notice {
            severity: data["severity"].as_str().unwrap_or("error").to_string(),
            message: data["error"].as_str().unwrap_or("Request failed").to_string(),
        })
    }
}
