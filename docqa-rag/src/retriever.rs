//! Query-time retrieval: embed the query, search the index.

use tracing::{debug, error};

use crate::document::ScoredChunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};
use crate::index::VectorIndex;

/// Retrieves the chunks most similar to a query from a [`VectorIndex`].
///
/// The query must be embedded with the same provider that built the
/// index; a dimension mismatch is reported as a configuration error
/// rather than producing nonsense scores.
#[derive(Debug, Clone)]
pub struct Retriever {
    top_k: usize,
    similarity_threshold: f32,
}

impl Retriever {
    /// Create a retriever returning at most `top_k` results, dropping
    /// any scored below `similarity_threshold`.
    pub fn new(top_k: usize, similarity_threshold: f32) -> Self {
        Self { top_k, similarity_threshold }
    }

    /// Retrieve up to `top_k` chunks for `query`, ordered by descending
    /// similarity (ties break by ascending sequence index).
    ///
    /// An empty index short-circuits to an empty result without calling
    /// the embedder — there is nothing to score and no reason to spend
    /// an API call.
    ///
    /// # Errors
    ///
    /// - [`QaError::EmbeddingError`] if embedding the query fails.
    /// - [`QaError::ConfigError`] on an embedder/index dimension mismatch.
    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        embedder: &dyn EmbeddingProvider,
        query: &str,
    ) -> Result<Vec<ScoredChunk>> {
        if index.is_empty() {
            debug!("index is empty; skipping query embedding");
            return Ok(Vec::new());
        }

        if embedder.dimensions() != index.dimensions() {
            return Err(QaError::ConfigError(format!(
                "embedder dimension {} does not match index dimension {} (index built with '{}')",
                embedder.dimensions(),
                index.dimensions(),
                index.model_name()
            )));
        }

        let query_embedding = embedder.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
            e
        })?;

        let mut results = index.search(&query_embedding, self.top_k)?;
        results.retain(|r| r.score >= self.similarity_threshold);

        debug!(result_count = results.len(), "retrieval completed");
        Ok(results)
    }
}
