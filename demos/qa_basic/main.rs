//! # Basic QA Demo
//!
//! Runs the whole pipeline — chunk, embed, index, cache, retrieve,
//! prompt, answer — with deterministic stand-ins for the embedding and
//! generation capabilities, so it needs **zero API keys**.
//!
//! Run: `cargo run -p docqa-demos --bin qa_basic`

use std::sync::Arc;

use docqa_model::MockModel;
use docqa_rag::{
    Answer, CachePolicy, Document, EmbeddingProvider, IndexStore, QaConfig, QaPipeline,
};

// ---------------------------------------------------------------------------
// MockEmbedder — deterministic hash-based embeddings for demos/tests
// ---------------------------------------------------------------------------

struct MockEmbedder {
    dimensions: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> docqa_rag::Result<Vec<f32>> {
        // Deterministic embedding: hash the text bytes, then generate a
        // normalised vector whose direction depends on the content.
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        // L2-normalise so cosine similarity is just the dot product.
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    // -- 1. Configure the pipeline ----------------------------------------
    // Small chunks keep the demo output readable; the library defaults
    // are 700/120/4.
    let config = QaConfig::builder()
        .chunk_size(200)
        .chunk_overlap(50)
        .top_k(3)
        .build()?;

    let cache_dir = std::env::temp_dir().join("docqa-demo-cache");
    let pipeline = QaPipeline::builder()
        .config(config)
        .embedder(Arc::new(MockEmbedder { dimensions: 64 }))
        .model(Arc::new(MockModel::new(
            "According to page 2, beta testing happens every second week.",
        )))
        .index_store(IndexStore::new(&cache_dir))
        .build()?;

    // -- 2. Open a document -----------------------------------------------
    // Second run hits the on-disk cache under `cache_dir` instead of
    // re-embedding.
    let document = Document::from_pages(
        "handbook.pdf",
        vec![
            "Alpha systems are configured through the alpha console. The console \
             exposes every tunable the operators need."
                .to_string(),
            "Beta testing happens every second week. Results are filed in the \
             beta tracker the following Monday."
                .to_string(),
        ],
    );
    let session = pipeline.open(document, CachePolicy::UseCache).await?;
    println!("Indexed {} chunk(s); cache at {}", session.index().len(), cache_dir.display());

    // -- 3. Ask questions --------------------------------------------------
    let questions = ["When does beta testing happen?", "How are alpha systems configured?"];

    for question in &questions {
        println!("\nQ: {question}");
        match pipeline.ask(&session, question).await? {
            Answer::Answered { text, sources, latency } => {
                println!("A: {text}");
                println!(
                    "   ({} source chunk(s), model answered in {} ms)",
                    sources.len(),
                    latency.as_millis()
                );
                for s in &sources {
                    let preview: String = s.chunk.text.chars().take(60).collect();
                    println!("   [score={:.4} page={:?}] {preview}…", s.score, s.chunk.page);
                }
            }
            Answer::NoContext => println!("A: (no relevant context found in the document)"),
        }
    }

    Ok(())
}
