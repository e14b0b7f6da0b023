//! Request and response bodies for the Ollama HTTP API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PullRequest {
    pub model: String,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct PullResponse {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ShowRequest {
    pub model: String,
}

/// Subset of `/api/show` output surfaced to the front-end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(default)]
    pub details: ModelDetails,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization_level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRequest {
    pub model: String,
    pub from: String,
    pub system: String,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    #[serde(default)]
    pub done: bool,
}

/// Shape of non-2xx bodies: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
