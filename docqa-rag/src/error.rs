//! Error types for the `docqa-rag` crate.

use thiserror::Error;

/// Errors that can occur in the question-answering pipeline.
///
/// Only `ConfigError`, `DocumentError`, and the external-service variants
/// (`EmbeddingError`, `ModelError`) are expected to reach callers; cache
/// failures are absorbed by the index store, which logs them and rebuilds.
#[derive(Debug, Error)]
pub enum QaError {
    /// Invalid or missing configuration: empty query, missing credential,
    /// embedder/index dimension mismatch.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source document could not be read or parsed. Raised before any
    /// chunking happens.
    #[error("Document error: {0}")]
    DocumentError(String),

    /// A persisted index could not be loaded or saved. Recoverable: the
    /// store falls back to rebuilding (load) or keeps the in-memory index
    /// (save).
    #[error("Cache error: {0}")]
    CacheError(String),

    /// The embedding capability failed (auth, rate limit, network).
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error in pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// An error propagated from the answering model.
    #[error(transparent)]
    ModelError(#[from] docqa_model::ModelError),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, QaError>;
