//! In-memory vector index over a single document's chunks.
//!
//! A [`VectorIndex`] owns the `(chunk, embedding)` rows produced by one
//! build and is read-only afterwards, so concurrent readers need no
//! locking. Search is exhaustive cosine similarity over every row.

use serde::{Deserialize, Serialize};

use crate::document::{Chunk, ScoredChunk};
use crate::error::{QaError, Result};

/// One indexed chunk with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRow {
    /// The chunk this row indexes.
    pub chunk: Chunk,
    /// The chunk's embedding; fixed dimension across the index, never
    /// mutated after the build.
    pub embedding: Vec<f32>,
}

/// A searchable collection of chunk embeddings for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    model: String,
    dimensions: usize,
    rows: Vec<IndexRow>,
}

impl VectorIndex {
    /// Build an index from parallel chunk and embedding sequences.
    ///
    /// # Errors
    ///
    /// - [`QaError::PipelineError`] if the sequences differ in length.
    /// - [`QaError::ConfigError`] if any embedding's dimension differs
    ///   from `dimensions`.
    pub fn build(
        model: impl Into<String>,
        dimensions: usize,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(QaError::PipelineError(format!(
                "embedding count ({}) does not match chunk count ({})",
                embeddings.len(),
                chunks.len()
            )));
        }

        for embedding in &embeddings {
            if embedding.len() != dimensions {
                return Err(QaError::ConfigError(format!(
                    "embedding dimension {} does not match index dimension {}",
                    embedding.len(),
                    dimensions
                )));
            }
        }

        let rows = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexRow { chunk, embedding })
            .collect();

        Ok(Self { model: model.into(), dimensions, rows })
    }

    /// Reassemble an index from previously persisted rows. Used by the
    /// index store's load path, which has already validated compatibility.
    pub(crate) fn from_rows(model: String, dimensions: usize, rows: Vec<IndexRow>) -> Self {
        Self { model, dimensions, rows }
    }

    /// The embedding model this index was built with.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// The embedding dimensionality of this index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the index holds no chunks (empty document).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn rows(&self) -> &[IndexRow] {
        &self.rows
    }

    /// Return up to `k` chunks most similar to `query_embedding`.
    ///
    /// Results are ordered by descending cosine similarity; exact score
    /// ties break by ascending sequence index so retrieval is
    /// deterministic. Fewer than `k` rows yields fewer than `k` results;
    /// an empty index yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::ConfigError`] if the query embedding's dimension
    /// does not match the index's (a mismatched embedder, not a bad query).
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }

        if query_embedding.len() != self.dimensions {
            return Err(QaError::ConfigError(format!(
                "query embedding dimension {} does not match index dimension {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<ScoredChunk> = self
            .rows
            .iter()
            .map(|row| ScoredChunk {
                chunk: row.chunk.clone(),
                score: cosine_similarity(&row.embedding, query_embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.sequence_index.cmp(&b.chunk.sequence_index))
        });
        scored.truncate(k);
        Ok(scored)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
