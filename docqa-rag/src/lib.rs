//! # docqa-rag
//!
//! Retrieval-augmented question answering over a single document.
//!
//! A document is split into overlapping chunks, each chunk is embedded,
//! and the resulting vector index is cached on disk keyed by the
//! document's content hash. At query time the top-matching chunks are
//! retrieved and wrapped in a grounded prompt that confines the
//! answering model to the retrieved context.
//!
//! ```text
//! document ──▶ Chunker ──▶ EmbeddingProvider ──▶ IndexStore (build/cache)
//!                                                     │
//! query ──▶ Retriever ──▶ Prompt Assembler ──▶ GenerationModel ──▶ answer
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::{Answer, CachePolicy, Document, IndexStore, QaConfig, QaPipeline};
//!
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())           // 700-char chunks, 120 overlap, k=4
//!     .embedder(Arc::new(embedder))
//!     .model(Arc::new(model))
//!     .index_store(IndexStore::new("./cache"))
//!     .build()?;
//!
//! let document = Document::from_pages("report.pdf", pages);
//! let session = pipeline.open(document, CachePolicy::UseCache).await?;
//!
//! match pipeline.ask(&session, "What is the conclusion?").await? {
//!     Answer::Answered { text, sources, .. } => println!("{text} ({} sources)", sources.len()),
//!     Answer::NoContext => println!("nothing relevant in the document"),
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`document`] | Documents, pages, chunks, retrieval results |
//! | [`loader`] | Text and PDF loading (`pdf` feature) |
//! | [`chunking`] | Page-aware overlapping chunker |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | In-memory vector index with cosine search |
//! | [`store`] | Disk-cached index build/load lifecycle |
//! | [`retriever`] | Query-time top-k retrieval |
//! | [`prompt`] | Grounded prompt assembly |
//! | [`pipeline`] | End-to-end orchestrator and sessions |
//! | [`config`] | Pipeline configuration |
//! | [`openai`] | OpenAI embedding provider (`openai` feature) |

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod store;

pub use chunking::{Chunker, PageChunker};
pub use config::{QaConfig, QaConfigBuilder};
pub use document::{Chunk, Document, Page, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{QaError, Result};
pub use index::VectorIndex;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbedder;
pub use pipeline::{Answer, DocumentSession, QaPipeline, QaPipelineBuilder};
pub use prompt::{Prompt, REFUSAL_TEXT, assemble, format_context};
pub use retriever::Retriever;
pub use store::{CachePolicy, IndexStore};
