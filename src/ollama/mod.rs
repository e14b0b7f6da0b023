//! Ollama backend integration.
//!
//! The serving process is treated as four black-box RPCs (pull, show,
//! create, chat) behind the [`OllamaBackend`] trait, so the workflows run
//! unchanged against the real HTTP API or a scripted mock.

pub mod client;
pub mod mock;
pub mod types;

pub use client::OllamaClient;
pub use mock::MockBackend;
pub use types::{ModelDetails, ModelMetadata};

use crate::image::ImagePayload;
use crate::models::{ChatReply, ModelName, PersonaSpec};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait OllamaBackend: Send + Sync {
    /// Download the model if the backend does not already have it. Idempotent
    /// on the backend side; a present model returns without a transfer.
    async fn pull(&self, model: &ModelName) -> Result<()>;

    /// Fetch metadata for a model the backend already has.
    async fn show(&self, model: &ModelName) -> Result<ModelMetadata>;

    /// Register a derived model under `spec.name`. Re-creating an existing
    /// name overwrites its definition.
    async fn create(&self, spec: &PersonaSpec) -> Result<()>;

    /// Send one single-turn chat message carrying `image` and return the
    /// complete buffered reply. No conversation history is kept.
    async fn chat(
        &self,
        model: &ModelName,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<ChatReply>;
}
