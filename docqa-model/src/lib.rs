//! # docqa-model
//!
//! Answering-model capability for the docqa pipeline.
//!
//! The pipeline treats text generation as an opaque capability: a prompt
//! goes in, plain answer text comes out. This crate defines that seam as
//! the [`GenerationModel`] trait plus the available backends:
//!
//! - [`OpenAIChatModel`] — OpenAI chat completions (feature `openai`)
//! - [`MockModel`] — deterministic model for tests and demos
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docqa_model::openai::OpenAIChatModel;
//!
//! let model = OpenAIChatModel::from_env()?; // reads OPENAI_API_KEY
//! let answer = model.generate("Say hello.").await?;
//! ```

pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;

pub use mock::MockModel;
#[cfg(feature = "openai")]
pub use openai::OpenAIChatModel;

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by answering-model backends.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The backend failed to produce an answer (auth, rate limit, network,
    /// malformed response).
    #[error("Generation error ({model}): {message}")]
    GenerationError {
        /// The model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// The backend was constructed with invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// A model capable of answering a prompt with plain text.
///
/// Implementations wrap a specific backend behind a unified async
/// interface. Errors carry the backend's model name so callers can
/// report which external service failed.
#[async_trait]
pub trait GenerationModel: Send + Sync {
    /// Generate answer text for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Return the model identifier (e.g. `"gpt-4.1-nano"`).
    fn model_name(&self) -> &str;
}
