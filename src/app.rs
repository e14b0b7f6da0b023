//! Workflow orchestration for the three user actions.

use crate::guard::ModelGuard;
use crate::image::ImagePayload;
use crate::models::{ChatReply, Config, ModelName, PersonaSpec};
use crate::ollama::{ModelMetadata, OllamaBackend, OllamaClient};
use crate::session::{SessionStore, Slot};
use crate::{Error, Result};
use tracing::info;

/// Drives the caption, VQA, and persona workflows for one session.
///
/// One instance per interactive session. Every backend call suspends the
/// calling workflow for the full round trip; actions are serialized by the
/// single caller, so the session store never sees concurrent writers. A
/// failed action propagates its error and leaves the corresponding slot
/// untouched.
pub struct App {
    backend: Box<dyn OllamaBackend>,
    guard: ModelGuard,
    session: SessionStore,
}

impl App {
    /// Build an app talking to the Ollama host from environment configuration.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::with_backend(Box::new(OllamaClient::new(config.host))))
    }

    /// Build an app over an injected backend (tests and harnesses).
    pub fn with_backend(backend: Box<dyn OllamaBackend>) -> Self {
        Self {
            backend,
            guard: ModelGuard::new(),
            session: SessionStore::new(),
        }
    }

    /// Guarantee `model` is present on the backend. Idempotent per session:
    /// repeat calls for a verified name perform no backend traffic.
    pub async fn ensure_model(&mut self, model: &ModelName) -> Result<ModelMetadata> {
        self.guard
            .ensure_available(self.backend.as_ref(), model)
            .await
    }

    /// One independent multimodal turn; no conversation state is carried
    /// between calls, even against the same model and image.
    async fn ask(
        &self,
        model: &ModelName,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<ChatReply> {
        if prompt.trim().is_empty() {
            return Err(Error::EmptyPrompt);
        }
        self.backend.chat(model, prompt, image).await
    }

    /// Caption `image` and record the reply under [`Slot::Caption`].
    pub async fn caption(
        &mut self,
        model: &ModelName,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<ChatReply> {
        let reply = self.ask(model, prompt, image).await?;
        info!("Captioning complete ({} chars)", reply.text.len());
        self.session.set(Slot::Caption, reply.clone());
        Ok(reply)
    }

    /// Answer `question` about `image` and record the reply under
    /// [`Slot::Vqa`].
    pub async fn vqa(
        &mut self,
        model: &ModelName,
        question: &str,
        image: &ImagePayload,
    ) -> Result<ChatReply> {
        let reply = self.ask(model, question, image).await?;
        info!("VQA complete ({} chars)", reply.text.len());
        self.session.set(Slot::Vqa, reply.clone());
        Ok(reply)
    }

    /// Register `spec` on the backend and return the persona's name.
    ///
    /// The base model must have passed [`App::ensure_model`] first; an
    /// unverified base is refused before any backend call. Re-creating an
    /// existing name overwrites its definition on the backend.
    pub async fn create_persona(&mut self, spec: &PersonaSpec) -> Result<ModelName> {
        if !self.guard.is_verified(&spec.base_model) {
            return Err(Error::ModelUnavailable(format!(
                "base model {} has not been verified this session",
                spec.base_model
            )));
        }

        self.backend.create(spec).await?;
        info!("Persona {} created from {}", spec.name, spec.base_model);
        Ok(spec.name.clone())
    }

    /// Create the persona, then query it with `prompt` and `image`; the reply
    /// lands under [`Slot::Persona`]. A creation failure stops the workflow
    /// before any chat request is issued against the unregistered name.
    pub async fn run_persona(
        &mut self,
        spec: &PersonaSpec,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<ChatReply> {
        let persona = self.create_persona(spec).await?;
        let reply = self.ask(&persona, prompt, image).await?;
        info!("Persona {} replied ({} chars)", persona, reply.text.len());
        self.session.set(Slot::Persona, reply.clone());
        Ok(reply)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ollama::MockBackend;
    use image::DynamicImage;

    fn model(name: &str) -> ModelName {
        name.parse().unwrap()
    }

    fn payload() -> ImagePayload {
        ImagePayload::from_image(DynamicImage::new_rgb8(1, 1)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_before_the_backend() {
        let backend = MockBackend::new().with_known_model("llava:7b");
        let handle = backend.clone();
        let mut app = App::with_backend(Box::new(backend));

        let result = app.caption(&model("llava:7b"), "   ", &payload()).await;

        assert!(matches!(result, Err(Error::EmptyPrompt)));
        assert_eq!(handle.chat_calls(), 0);
        assert!(app.session().get(Slot::Caption).is_none());
    }

    #[tokio::test]
    async fn test_caption_writes_its_slot() {
        let backend = MockBackend::new()
            .with_known_model("llava:7b")
            .with_chat_reply("A cat on a mat");
        let mut app = App::with_backend(Box::new(backend));

        let reply = app
            .caption(&model("llava:7b"), "Describe this image:", &payload())
            .await
            .unwrap();

        assert_eq!(reply.text, "A cat on a mat");
        assert_eq!(app.session().get(Slot::Caption), Some(&reply));
        assert!(app.session().get(Slot::Vqa).is_none());
    }
}
