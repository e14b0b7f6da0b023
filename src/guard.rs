//! Model availability guarding.

use crate::models::ModelName;
use crate::ollama::{ModelMetadata, OllamaBackend};
use crate::Result;
use std::collections::HashMap;

/// Ensures a model is present on the backend before anything references it.
///
/// The first call for a name pulls the model (potentially minutes of network
/// transfer) and fetches its metadata; later calls for the same name return
/// the cached metadata without touching the backend. A failed call caches
/// nothing, so the user can explicitly try again; the guard itself never
/// retries.
#[derive(Debug, Default)]
pub struct ModelGuard {
    verified: HashMap<ModelName, ModelMetadata>,
}

impl ModelGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn ensure_available(
        &mut self,
        backend: &dyn OllamaBackend,
        model: &ModelName,
    ) -> Result<ModelMetadata> {
        if let Some(metadata) = self.verified.get(model) {
            tracing::debug!("Model {} already verified this session", model);
            return Ok(metadata.clone());
        }

        tracing::info!("Ensuring model {} is available", model);
        backend.pull(model).await?;
        let metadata = backend.show(model).await?;

        self.verified.insert(model.clone(), metadata.clone());
        tracing::info!("Model {} ready", model);
        Ok(metadata)
    }

    /// Whether the model has passed availability checking this session.
    pub fn is_verified(&self, model: &ModelName) -> bool {
        self.verified.contains_key(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ollama::MockBackend;
    use crate::Error;

    fn model(name: &str) -> ModelName {
        name.parse().unwrap()
    }

    #[tokio::test]
    async fn test_second_call_skips_the_backend() {
        let backend = MockBackend::new();
        let mut guard = ModelGuard::new();
        let name = model("llava:7b");

        let first = guard.ensure_available(&backend, &name).await.unwrap();
        let second = guard.ensure_available(&backend, &name).await.unwrap();

        assert_eq!(backend.pull_calls(), 1);
        assert_eq!(backend.show_calls(), 1);
        assert_eq!(first.details.family, second.details.family);
        assert!(guard.is_verified(&name));
    }

    #[tokio::test]
    async fn test_distinct_models_are_pulled_separately() {
        let backend = MockBackend::new();
        let mut guard = ModelGuard::new();

        guard
            .ensure_available(&backend, &model("llava:7b"))
            .await
            .unwrap();
        guard
            .ensure_available(&backend, &model("llava:13b"))
            .await
            .unwrap();

        assert_eq!(backend.pull_calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let backend = MockBackend::new().with_missing_model("nope");
        let mut guard = ModelGuard::new();
        let name = model("nope");

        assert!(matches!(
            guard.ensure_available(&backend, &name).await,
            Err(Error::ModelUnavailable(_))
        ));
        assert!(!guard.is_verified(&name));

        // An explicit re-invocation reaches the backend again.
        let _ = guard.ensure_available(&backend, &name).await;
        assert_eq!(backend.pull_calls(), 2);
    }
}
