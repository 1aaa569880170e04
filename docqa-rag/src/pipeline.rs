//! Pipeline orchestrator.
//!
//! [`QaPipeline`] wires chunker → index store → retriever → prompt
//! assembler → answering model into one request/response flow. One
//! [`DocumentSession`] holds one document's built index; queries against
//! it are stateless, so a failed query never poisons the next one.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{CachePolicy, Document, QaConfig, QaPipeline};
//!
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())
//!     .embedder(Arc::new(my_embedder))
//!     .model(Arc::new(my_model))
//!     .build()?;
//!
//! let session = pipeline.open(document, CachePolicy::UseCache).await?;
//! match pipeline.ask(&session, "What does chapter 2 cover?").await? {
//!     Answer::Answered { text, .. } => println!("{text}"),
//!     Answer::NoContext => println!("no relevant context found"),
//! }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use docqa_model::GenerationModel;
use tracing::{error, info};

use crate::chunking::{Chunker, PageChunker};
use crate::config::QaConfig;
use crate::document::{Document, ScoredChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};
use crate::index::VectorIndex;
use crate::prompt::assemble;
use crate::retriever::Retriever;
use crate::store::{CachePolicy, IndexStore};

/// One document's readable state: the document plus its built index.
///
/// Created by [`QaPipeline::open`], dropped when the caller is done with
/// the document. The index is read-only after the build, so a session
/// can serve concurrent readers.
#[derive(Debug)]
pub struct DocumentSession {
    document: Document,
    index: VectorIndex,
}

impl DocumentSession {
    /// The document this session was opened for.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The session's vector index.
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

/// The outcome of one answered query.
#[derive(Debug, Clone)]
pub enum Answer {
    /// The model produced an answer from retrieved context.
    Answered {
        /// Plain answer text extracted from the model response.
        text: String,
        /// The retrieved chunks the prompt was grounded on, in retrieval
        /// order.
        sources: Vec<ScoredChunk>,
        /// Wall-clock duration of the generation call.
        latency: Duration,
    },
    /// Retrieval matched nothing; the model call was skipped.
    NoContext,
}

/// The question-answering pipeline orchestrator.
///
/// Construct one via [`QaPipeline::builder()`], [`open`](QaPipeline::open)
/// a document, then [`ask`](QaPipeline::ask) questions against the
/// session.
pub struct QaPipeline {
    config: QaConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn GenerationModel>,
    chunker: Arc<dyn Chunker>,
    store: IndexStore,
}

impl std::fmt::Debug for QaPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaPipeline")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl QaPipeline {
    /// Create a new [`QaPipelineBuilder`].
    pub fn builder() -> QaPipelineBuilder {
        QaPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Open a session for `document`: obtain its index from the store,
    /// building (chunk → embed → index) or loading from cache per
    /// `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::EmbeddingError`] if embedding fails during a
    /// build, or [`QaError::ConfigError`] if a cached index is
    /// dimensionally incompatible with the embedder.
    pub async fn open(&self, document: Document, policy: CachePolicy) -> Result<DocumentSession> {
        let index = self
            .store
            .get_or_build(&document, self.embedder.as_ref(), self.chunker.as_ref(), policy)
            .await
            .map_err(|e| {
                error!(document = %document.name, error = %e, "failed to obtain index");
                e
            })?;

        info!(document = %document.name, chunks = index.len(), "session opened");
        Ok(DocumentSession { document, index })
    }

    /// Answer a question from the session's document.
    ///
    /// Retrieves the top-matching chunks, assembles a grounded prompt,
    /// and calls the answering model. When retrieval comes back empty the
    /// model call is skipped and [`Answer::NoContext`] is returned.
    ///
    /// # Errors
    ///
    /// - [`QaError::ConfigError`] for a blank query (checked before any
    ///   external call is made).
    /// - [`QaError::EmbeddingError`] / [`QaError::ModelError`] when an
    ///   external capability fails; the session stays usable for the
    ///   next query.
    pub async fn ask(&self, session: &DocumentSession, query: &str) -> Result<Answer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QaError::ConfigError("query must not be empty".to_string()));
        }

        let retriever = Retriever::new(self.config.top_k, self.config.similarity_threshold);
        let sources = retriever.retrieve(&session.index, self.embedder.as_ref(), query).await?;

        if sources.is_empty() {
            info!(document = %session.document.name, "no relevant context; skipping model call");
            return Ok(Answer::NoContext);
        }

        let prompt = assemble(&sources, query);
        let started = Instant::now();
        let text = self.model.generate(&prompt.render()).await.map_err(|e| {
            error!(model = self.model.model_name(), error = %e, "generation failed");
            e
        })?;
        let latency = started.elapsed();

        info!(
            document = %session.document.name,
            sources = sources.len(),
            latency_ms = latency.as_millis() as u64,
            "answered query"
        );

        Ok(Answer::Answered { text, sources, latency })
    }
}

/// Builder for constructing a [`QaPipeline`].
///
/// `embedder` and `model` are required. `config` defaults to
/// [`QaConfig::default()`], the chunker to a [`PageChunker`] sized from
/// the config, and the store to [`IndexStore::ephemeral()`] (no disk
/// cache).
#[derive(Default)]
pub struct QaPipelineBuilder {
    config: Option<QaConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    model: Option<Arc<dyn GenerationModel>>,
    chunker: Option<Arc<dyn Chunker>>,
    store: Option<IndexStore>,
}

impl QaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the answering model.
    pub fn model(mut self, model: Arc<dyn GenerationModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the document chunker. When unset, a [`PageChunker`] with
    /// the config's `chunk_size`/`chunk_overlap` is used.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the index store (enables the disk cache when the store has a
    /// cache directory).
    pub fn index_store(mut self, store: IndexStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the [`QaPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::ConfigError`] if `embedder` or `model` is
    /// missing.
    pub fn build(self) -> Result<QaPipeline> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| QaError::ConfigError("embedder is required".to_string()))?;
        let model =
            self.model.ok_or_else(|| QaError::ConfigError("model is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(PageChunker::new(config.chunk_size, config.chunk_overlap)));
        let store = self.store.unwrap_or_else(IndexStore::ephemeral);

        Ok(QaPipeline { config, embedder, model, chunker, store })
    }
}
