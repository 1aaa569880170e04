//! Index store: build-or-cache lifecycle for a document's vector index.
//!
//! The store owns the on-disk cache. Layout is one directory per
//! document, `<cache_dir>/<identity>_index/index.json`, where the
//! identity is the document's content hash. The blob is understood only
//! by this module's own save/load pair; a version or model mismatch is a
//! cache miss, never a crash.
//!
//! Cache failures stay inside this module: a failed load logs a warning
//! and rebuilds, a failed save logs a warning and the in-memory index
//! still serves the session. The one condition that does surface is a
//! dimension mismatch between a loaded index and the current embedder,
//! which is a configuration error rather than a stale cache.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chunking::Chunker;
use crate::document::Document;
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};
use crate::index::{IndexRow, VectorIndex};

/// Bumped whenever the persisted layout changes; older blobs are treated
/// as cache misses.
const FORMAT_VERSION: u32 = 1;

/// Whether a persisted index may be reused for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Load the persisted index if one exists and is compatible.
    UseCache,
    /// Ignore any persisted index and rebuild from scratch.
    Rebuild,
}

/// On-disk shape of a persisted index.
#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    format_version: u32,
    model: String,
    dimensions: usize,
    rows: Vec<IndexRow>,
}

/// Builds, persists, and reloads [`VectorIndex`]es keyed by document
/// identity.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{CachePolicy, IndexStore, PageChunker};
///
/// let store = IndexStore::new("/tmp/docqa-cache");
/// let index = store
///     .get_or_build(&document, &embedder, &PageChunker::default(), CachePolicy::UseCache)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct IndexStore {
    cache_dir: Option<PathBuf>,
}

impl IndexStore {
    /// Create a store that persists indexes under `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { cache_dir: Some(cache_dir.into()) }
    }

    /// Create a store with persistence disabled: every call builds in
    /// memory and nothing touches disk.
    pub fn ephemeral() -> Self {
        Self { cache_dir: None }
    }

    /// Whether this store persists indexes to disk.
    pub fn caching_enabled(&self) -> bool {
        self.cache_dir.is_some()
    }

    /// Path of the persisted blob for a document identity, if caching is
    /// enabled.
    pub fn index_path(&self, identity: &str) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(format!("{identity}_index")).join("index.json"))
    }

    /// Obtain the index for `document`: load from cache when permitted
    /// and possible, otherwise chunk, embed, and build.
    ///
    /// After a fresh build the index is persisted when caching is
    /// enabled; a save failure is logged and ignored.
    ///
    /// # Errors
    ///
    /// - [`QaError::EmbeddingError`] if the embedding capability fails
    ///   during a build.
    /// - [`QaError::ConfigError`] if a cached index's dimensions do not
    ///   match the current embedder's.
    pub async fn get_or_build(
        &self,
        document: &Document,
        embedder: &dyn EmbeddingProvider,
        chunker: &dyn Chunker,
        policy: CachePolicy,
    ) -> Result<VectorIndex> {
        let identity = document.identity();
        let path = self.index_path(&identity);

        if policy == CachePolicy::UseCache {
            if let Some(path) = &path {
                match self.load(path, embedder) {
                    Ok(index) => {
                        info!(document = %document.name, chunks = index.len(), "loaded cached index");
                        return Ok(index);
                    }
                    Err(e @ QaError::ConfigError(_)) => return Err(e),
                    Err(e) => {
                        warn!(document = %document.name, error = %e, "cache load failed; rebuilding index");
                    }
                }
            }
        }

        let index = self.build(document, embedder, chunker).await?;

        if let Some(path) = &path {
            if let Err(e) = self.save(path, &index) {
                warn!(document = %document.name, error = %e, "failed to persist index; continuing in memory");
            }
        }

        Ok(index)
    }

    /// Chunk the document, embed every chunk, and assemble the index.
    async fn build(
        &self,
        document: &Document,
        embedder: &dyn EmbeddingProvider,
        chunker: &dyn Chunker,
    ) -> Result<VectorIndex> {
        let chunks = chunker.chunk(document);
        debug!(document = %document.name, chunk_count = chunks.len(), "chunked document");

        let embeddings = if chunks.is_empty() {
            Vec::new()
        } else {
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            embedder.embed_batch(&texts).await?
        };

        let index =
            VectorIndex::build(embedder.model_name(), embedder.dimensions(), chunks, embeddings)?;
        info!(document = %document.name, chunks = index.len(), "built index");
        Ok(index)
    }

    /// Load a persisted index and verify it is compatible with the
    /// current embedder.
    fn load(&self, path: &Path, embedder: &dyn EmbeddingProvider) -> Result<VectorIndex> {
        let bytes = fs::read(path)
            .map_err(|e| QaError::CacheError(format!("read {}: {e}", path.display())))?;
        let persisted: PersistedIndex = serde_json::from_slice(&bytes)
            .map_err(|e| QaError::CacheError(format!("parse {}: {e}", path.display())))?;

        if persisted.format_version != FORMAT_VERSION {
            return Err(QaError::CacheError(format!(
                "format version {} (current {})",
                persisted.format_version, FORMAT_VERSION
            )));
        }

        // A different model is a plain cache miss. The same model with
        // different dimensions means the configuration itself is wrong.
        if persisted.model != embedder.model_name() {
            return Err(QaError::CacheError(format!(
                "cached index built with model '{}', embedder is '{}'",
                persisted.model,
                embedder.model_name()
            )));
        }
        if persisted.dimensions != embedder.dimensions() {
            return Err(QaError::ConfigError(format!(
                "cached index dimension {} does not match embedder dimension {}",
                persisted.dimensions,
                embedder.dimensions()
            )));
        }

        Ok(VectorIndex::from_rows(persisted.model, persisted.dimensions, persisted.rows))
    }

    /// Serialize the index under its document directory.
    fn save(&self, path: &Path, index: &VectorIndex) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| QaError::CacheError(format!("create {}: {e}", parent.display())))?;
        }

        let persisted = PersistedIndex {
            format_version: FORMAT_VERSION,
            model: index.model_name().to_string(),
            dimensions: index.dimensions(),
            rows: index.rows().to_vec(),
        };
        let bytes = serde_json::to_vec(&persisted)
            .map_err(|e| QaError::CacheError(format!("serialize index: {e}")))?;
        fs::write(path, bytes)
            .map_err(|e| QaError::CacheError(format!("write {}: {e}", path.display())))?;

        debug!(path = %path.display(), "persisted index");
        Ok(())
    }
}
