//! Core workflows for a local vision-model playground backed by Ollama.
//!
//! Drives a locally hosted vision-capable model through three workflows:
//! image captioning, visual question answering, and "persona" models derived
//! from a base model plus a fixed system prompt. Results are kept in a
//! per-session store so the front-end can redisplay them without triggering
//! new model calls.

pub mod app;
pub mod error;
pub mod guard;
pub mod image;
pub mod models;
pub mod ollama;
pub mod prompts;
pub mod session;

pub use error::{Error, Result};
