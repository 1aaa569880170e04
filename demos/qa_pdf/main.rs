//! # PDF QA Demo
//!
//! The original use case end to end: load a PDF, index it (cached on
//! disk), and answer questions about it with OpenAI embeddings and chat.
//!
//! Requires `OPENAI_API_KEY` in the environment.
//!
//! Run: `cargo run -p docqa-demos --bin qa_pdf --features openai -- report.pdf "What is the conclusion?"`

use std::sync::Arc;

use docqa_model::OpenAIChatModel;
use docqa_rag::{Answer, CachePolicy, IndexStore, OpenAIEmbedder, QaPipeline, loader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let mut args = std::env::args().skip(1);
    let pdf_path = args.next().ok_or_else(|| anyhow::anyhow!("usage: qa_pdf <pdf> <question>"))?;
    let question = args.next().ok_or_else(|| anyhow::anyhow!("usage: qa_pdf <pdf> <question>"))?;

    let pipeline = QaPipeline::builder()
        .embedder(Arc::new(OpenAIEmbedder::from_env()?))
        .model(Arc::new(OpenAIChatModel::from_env()?))
        .index_store(IndexStore::new(std::env::temp_dir().join("docqa-pdf-cache")))
        .build()?;

    let document = loader::load_pdf_file(&pdf_path)?;
    println!("Loaded '{}' ({} pages)", document.name, document.pages.len());

    let session = pipeline.open(document, CachePolicy::UseCache).await?;
    println!("Index ready: {} chunk(s)", session.index().len());

    match pipeline.ask(&session, &question).await? {
        Answer::Answered { text, sources, latency } => {
            println!("\n{text}");
            println!("\n({} source chunk(s), {} ms)", sources.len(), latency.as_millis());
        }
        Answer::NoContext => println!("\nNo relevant context found in the document."),
    }

    Ok(())
}
