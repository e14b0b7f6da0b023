use super::types::{ModelDetails, ModelMetadata};
use super::OllamaBackend;
use crate::image::ImagePayload;
use crate::models::{ChatReply, ModelName, PersonaSpec};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Scripted in-memory backend for tests and dry runs.
///
/// Clones share state, so a test can hand one clone to the workflow under
/// test and keep another to inspect call counters afterwards.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    known_models: HashSet<String>,
    missing_models: HashSet<String>,
    chat_replies: Vec<String>,
    fail_chat: bool,
    fail_create: bool,
    pull_calls: usize,
    show_calls: usize,
    create_calls: usize,
    chat_calls: usize,
    chat_prompts: Vec<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a model as already present, as if pulled in a prior session.
    pub fn with_known_model(self, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .known_models
            .insert(name.to_string());
        self
    }

    /// Mark a model as unpullable (typo, not in the registry, ...).
    pub fn with_missing_model(self, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .missing_models
            .insert(name.to_string());
        self
    }

    /// Queue a chat reply; replies cycle once exhausted.
    pub fn with_chat_reply(self, reply: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .chat_replies
            .push(reply.to_string());
        self
    }

    pub fn set_chat_failure(&self, fail: bool) {
        self.state.lock().unwrap().fail_chat = fail;
    }

    pub fn set_create_failure(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    pub fn pull_calls(&self) -> usize {
        self.state.lock().unwrap().pull_calls
    }

    pub fn show_calls(&self) -> usize {
        self.state.lock().unwrap().show_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn chat_calls(&self) -> usize {
        self.state.lock().unwrap().chat_calls
    }

    /// Prompts received by `chat`, in call order.
    pub fn chat_prompts(&self) -> Vec<String> {
        self.state.lock().unwrap().chat_prompts.clone()
    }
}

#[async_trait]
impl OllamaBackend for MockBackend {
    async fn pull(&self, model: &ModelName) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pull_calls += 1;

        if state.missing_models.contains(model.as_str()) {
            return Err(Error::ModelUnavailable(format!(
                "pull {}: not found in registry",
                model
            )));
        }
        state.known_models.insert(model.as_str().to_string());
        Ok(())
    }

    async fn show(&self, model: &ModelName) -> Result<ModelMetadata> {
        let mut state = self.state.lock().unwrap();
        state.show_calls += 1;

        if !state.known_models.contains(model.as_str()) {
            return Err(Error::ModelUnavailable(format!(
                "show {}: model not found",
                model
            )));
        }
        Ok(ModelMetadata {
            details: ModelDetails {
                family: Some("mock".to_string()),
                ..ModelDetails::default()
            },
            capabilities: vec!["completion".to_string(), "vision".to_string()],
            ..ModelMetadata::default()
        })
    }

    async fn create(&self, spec: &PersonaSpec) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;

        if state.fail_create {
            return Err(Error::PersonaCreation(format!(
                "create {}: injected failure",
                spec.name
            )));
        }
        if !state.known_models.contains(spec.base_model.as_str()) {
            return Err(Error::PersonaCreation(format!(
                "create {}: unknown base model {}",
                spec.name, spec.base_model
            )));
        }
        // Overwrites any existing definition under the same name.
        state.known_models.insert(spec.name.as_str().to_string());
        Ok(())
    }

    async fn chat(
        &self,
        model: &ModelName,
        prompt: &str,
        _image: &ImagePayload,
    ) -> Result<ChatReply> {
        let mut state = self.state.lock().unwrap();
        state.chat_calls += 1;
        state.chat_prompts.push(prompt.to_string());

        if state.fail_chat {
            return Err(Error::RequestFailed(format!(
                "chat with {}: injected failure",
                model
            )));
        }
        if !state.known_models.contains(model.as_str()) {
            return Err(Error::RequestFailed(format!(
                "chat with {}: unknown model",
                model
            )));
        }

        if state.chat_replies.is_empty() {
            Ok(ChatReply::new(format!("Reply to: {}", prompt)))
        } else {
            let index = (state.chat_calls - 1) % state.chat_replies.len();
            Ok(ChatReply::new(state.chat_replies[index].clone()))
        }
    }
}
