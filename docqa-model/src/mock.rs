//! Deterministic mock model for tests and demos.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{GenerationModel, Result};

/// A [`GenerationModel`] that returns a canned reply and records every
/// prompt it receives.
///
/// Useful for pipeline tests that need to assert on the assembled prompt
/// or verify that no generation call was made at all.
pub struct MockModel {
    reply: String,
    calls: Mutex<Vec<String>>,
}

impl MockModel {
    /// Create a mock that always answers with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), calls: Mutex::new(Vec::new()) }
    }

    /// Return copies of all prompts passed to [`generate`](GenerationModel::generate).
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    /// Return how many times the model was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl GenerationModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.lock().expect("mock lock poisoned").push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
