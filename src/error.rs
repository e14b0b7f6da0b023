//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Chat request failed: {0}")]
    RequestFailed(String),

    #[error("Persona creation failed: {0}")]
    PersonaCreation(String),

    #[error("Invalid model name: {0:?}")]
    InvalidModelName(String),

    #[error("Prompt must not be empty")]
    EmptyPrompt,
}

pub type Result<T> = std::result::Result<T, Error>;
