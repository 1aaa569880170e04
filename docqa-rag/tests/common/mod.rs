//! Deterministic embedding stubs shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docqa_rag::{EmbeddingProvider, Result};

/// Hash-based embedder: deterministic, content-dependent direction,
/// L2-normalised. Counts every embedding call so tests can tell a cache
/// hit from a rebuild.
pub struct HashEmbedder {
    dimensions: usize,
    model: String,
    calls: AtomicUsize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, model: "hash-embedder".to_string(), calls: AtomicUsize::new(0) }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Number of texts embedded so far (batch calls count each text).
    pub fn embed_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn embedding_for(&self, text: &str) -> Vec<f32> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        emb
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.embedding_for(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Keyword-axis embedder: one dimension per keyword, 1.0 when the text
/// contains that keyword. Makes relevance fully predictable in tests.
pub struct KeywordEmbedder {
    keywords: Vec<&'static str>,
}

impl KeywordEmbedder {
    pub fn new(keywords: Vec<&'static str>) -> Self {
        Self { keywords }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lowered = text.to_lowercase();
        Ok(self
            .keywords
            .iter()
            .map(|kw| if lowered.contains(kw) { 1.0 } else { 0.0 })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.keywords.len()
    }

    fn model_name(&self) -> &str {
        "keyword-embedder"
    }
}
