use super::types::{
    ChatMessage, ChatRequest, ChatResponse, CreateRequest, CreateResponse, ErrorBody,
    ModelMetadata, PullRequest, PullResponse, ShowRequest,
};
use super::OllamaBackend;
use crate::image::ImagePayload;
use crate::models::{ChatReply, ModelName, PersonaSpec};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client for the Ollama REST API.
///
/// Every call blocks the calling workflow for the full round trip. Pulls and
/// chats can take minutes on a cold model, so only connection setup is
/// bounded; no overall request timeout is applied here.
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// POST a JSON body and parse a JSON reply. Failures come back as plain
    /// messages so each endpoint can wrap them in its own error kind.
    async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> std::result::Result<Resp, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Ollama at {}: {}", url, e);
                e.to_string()
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            tracing::error!("Ollama error on {} (status {}): {}", path, status, message);
            return Err(format!("status {}: {}", status, message));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Unparseable Ollama response from {}: {}", path, e);
            format!("unparseable response: {}", e)
        })
    }
}

#[async_trait]
impl OllamaBackend for OllamaClient {
    async fn pull(&self, model: &ModelName) -> Result<()> {
        tracing::info!("Pulling model {} (may take a while)", model);

        let request = PullRequest {
            model: model.as_str().to_string(),
            stream: false,
        };
        let response: PullResponse = self
            .post("/api/pull", &request)
            .await
            .map_err(|e| Error::ModelUnavailable(format!("pull {}: {}", model, e)))?;

        tracing::debug!("Pull of {} finished: {}", model, response.status);
        Ok(())
    }

    async fn show(&self, model: &ModelName) -> Result<ModelMetadata> {
        let request = ShowRequest {
            model: model.as_str().to_string(),
        };
        self.post("/api/show", &request)
            .await
            .map_err(|e| Error::ModelUnavailable(format!("show {}: {}", model, e)))
    }

    async fn create(&self, spec: &PersonaSpec) -> Result<()> {
        tracing::info!("Creating persona {} from {}", spec.name, spec.base_model);

        let request = CreateRequest {
            model: spec.name.as_str().to_string(),
            from: spec.base_model.as_str().to_string(),
            system: spec.system_prompt.clone(),
            stream: false,
        };
        let response: CreateResponse = self
            .post("/api/create", &request)
            .await
            .map_err(|e| Error::PersonaCreation(format!("create {}: {}", spec.name, e)))?;

        tracing::debug!("Create of {} finished: {}", spec.name, response.status);
        Ok(())
    }

    async fn chat(
        &self,
        model: &ModelName,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<ChatReply> {
        tracing::debug!("Sending chat request to {} ({} chars)", model, prompt.len());

        // One user turn, one image, reply fully buffered.
        let request = ChatRequest {
            model: model.as_str().to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
                images: Some(vec![image.base64()]),
            }],
            stream: false,
        };
        let response: ChatResponse = self
            .post("/api/chat", &request)
            .await
            .map_err(|e| Error::RequestFailed(format!("chat with {}: {}", model, e)))?;

        Ok(ChatReply::new(response.message.content))
    }
}
