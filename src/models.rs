//! Core data types shared across the workflows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Name of a model known to the Ollama backend.
///
/// This may be a base vision model (`llava:7b`) or a derived persona model.
/// Uniqueness is the backend's concern; this type only rejects names that
/// could never address a model (empty or containing whitespace).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(Error::InvalidModelName(name));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ModelName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// One complete reply from the backend. Opaque text, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
}

impl ChatReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Recipe for a derived model: a base model plus a fixed system prompt.
///
/// Consumed once by persona creation; afterwards only the resulting name
/// matters, which behaves like any base model.
#[derive(Debug, Clone)]
pub struct PersonaSpec {
    pub name: ModelName,
    pub base_model: ModelName,
    pub system_prompt: String,
}

impl PersonaSpec {
    pub fn new(
        name: ModelName,
        base_model: ModelName,
        system_prompt: impl Into<String>,
    ) -> Result<Self> {
        let system_prompt = system_prompt.into();
        if system_prompt.trim().is_empty() {
            return Err(Error::EmptyPrompt);
        }
        Ok(Self {
            name,
            base_model,
            system_prompt,
        })
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub vision_model: ModelName,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("OLLAMA_HOST")
            .unwrap_or_else(|_| "http://localhost:11434".to_string());
        let vision_model = std::env::var("VISION_MODEL")
            .unwrap_or_else(|_| "llava:7b".to_string())
            .parse()?;

        Ok(Self { host, vision_model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_trims_and_accepts_tags() {
        let name = ModelName::new("  llava:7b ").unwrap();
        assert_eq!(name.as_str(), "llava:7b");
        assert_eq!(name.to_string(), "llava:7b");
    }

    #[test]
    fn test_model_name_rejects_empty() {
        assert!(matches!(
            ModelName::new(""),
            Err(Error::InvalidModelName(_))
        ));
        assert!(matches!(
            ModelName::new("   "),
            Err(Error::InvalidModelName(_))
        ));
    }

    #[test]
    fn test_model_name_rejects_interior_whitespace() {
        assert!(matches!(
            ModelName::new("dog lover"),
            Err(Error::InvalidModelName(_))
        ));
    }

    #[test]
    fn test_model_name_serializes_transparently() {
        let name: ModelName = "dog-lover".parse().unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"dog-lover\"");
    }

    #[test]
    fn test_persona_spec_rejects_blank_system_prompt() {
        let name: ModelName = "dog-lover".parse().unwrap();
        let base: ModelName = "llava:7b".parse().unwrap();
        assert!(matches!(
            PersonaSpec::new(name, base, "  \n"),
            Err(Error::EmptyPrompt)
        ));
    }

    #[test]
    fn test_chat_reply_round_trips() {
        let reply = ChatReply::new("A cat on a mat");
        let json = serde_json::to_string(&reply).unwrap();
        let back: ChatReply = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reply);
    }
}
