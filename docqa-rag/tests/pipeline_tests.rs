//! End-to-end pipeline tests with deterministic stubs.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::KeywordEmbedder;
use docqa_model::{GenerationModel, MockModel};
use docqa_rag::{
    Answer, CachePolicy, Document, EmbeddingProvider, QaConfig, QaError, QaPipeline, REFUSAL_TEXT,
};

fn sample_document() -> Document {
    Document::from_pages(
        "notes.pdf",
        vec![
            "Alpha systems are configured through the alpha console.".to_string(),
            "Beta testing happens every second week.".to_string(),
        ],
    )
}

fn pipeline_with(model: Arc<dyn GenerationModel>, threshold: f32) -> QaPipeline {
    QaPipeline::builder()
        .config(
            QaConfig::builder()
                .chunk_size(80)
                .chunk_overlap(10)
                .top_k(4)
                .similarity_threshold(threshold)
                .build()
                .unwrap(),
        )
        .embedder(Arc::new(KeywordEmbedder::new(vec!["alpha", "beta", "paris"])))
        .model(model)
        .build()
        .unwrap()
}

#[tokio::test]
async fn answered_query_returns_model_text_with_sources() {
    let model = Arc::new(MockModel::new("the alpha console"));
    let pipeline = pipeline_with(model.clone(), 0.0);

    let session = pipeline.open(sample_document(), CachePolicy::UseCache).await.unwrap();
    let answer = pipeline.ask(&session, "how is alpha configured?").await.unwrap();

    match answer {
        Answer::Answered { text, sources, .. } => {
            assert_eq!(text, "the alpha console");
            assert!(!sources.is_empty());
            assert_eq!(sources[0].chunk.page, Some(1));
        }
        Answer::NoContext => panic!("expected an answer"),
    }

    // The model saw exactly one grounded prompt carrying the contract
    // string and the retrieved text.
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(REFUSAL_TEXT));
    assert!(prompts[0].contains("alpha console"));
}

#[tokio::test]
async fn irrelevant_query_skips_the_model_call() {
    let model = Arc::new(MockModel::new("should never be seen"));
    let pipeline = pipeline_with(model.clone(), 0.5);

    let session = pipeline.open(sample_document(), CachePolicy::UseCache).await.unwrap();
    let answer = pipeline.ask(&session, "tell me about gamma rays").await.unwrap();

    assert!(matches!(answer, Answer::NoContext));
    assert_eq!(model.call_count(), 0, "no-context queries must not reach the model");
}

#[tokio::test]
async fn empty_document_yields_no_context() {
    let model = Arc::new(MockModel::new("unused"));
    let pipeline = pipeline_with(model.clone(), 0.0);

    let session =
        pipeline.open(Document::from_text("empty.txt", ""), CachePolicy::UseCache).await.unwrap();
    assert!(session.index().is_empty());

    let answer = pipeline.ask(&session, "anything at all?").await.unwrap();
    assert!(matches!(answer, Answer::NoContext));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn blank_query_is_a_configuration_error() {
    let model = Arc::new(MockModel::new("unused"));
    let pipeline = pipeline_with(model.clone(), 0.0);

    let session = pipeline.open(sample_document(), CachePolicy::UseCache).await.unwrap();
    let err = pipeline.ask(&session, "   ").await.unwrap_err();

    assert!(matches!(err, QaError::ConfigError(_)));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn session_survives_a_failed_query() {
    let model = Arc::new(MockModel::new("fine"));
    let pipeline = pipeline_with(model.clone(), 0.0);
    let session = pipeline.open(sample_document(), CachePolicy::UseCache).await.unwrap();

    assert!(pipeline.ask(&session, "").await.is_err());
    let answer = pipeline.ask(&session, "alpha?").await.unwrap();
    assert!(matches!(answer, Answer::Answered { .. }));
}

/// A keyword embedder with a failure switch, so a test can make one
/// query's embedding fail and the next succeed against the same session.
struct FlakyEmbedder {
    inner: KeywordEmbedder,
    failing: AtomicBool,
}

impl FlakyEmbedder {
    fn new(keywords: Vec<&'static str>) -> Self {
        Self { inner: KeywordEmbedder::new(keywords), failing: AtomicBool::new(false) }
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, text: &str) -> docqa_rag::Result<Vec<f32>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(QaError::EmbeddingError {
                provider: "flaky-embedder".to_string(),
                message: "service unavailable".to_string(),
            });
        }
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_name(&self) -> &str {
        "flaky-embedder"
    }
}

/// A model with the same failure switch for the generation call.
struct FlakyModel {
    failing: AtomicBool,
}

#[async_trait]
impl GenerationModel for FlakyModel {
    async fn generate(&self, _prompt: &str) -> docqa_model::Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(docqa_model::ModelError::GenerationError {
                model: "flaky-model".to_string(),
                message: "upstream timeout".to_string(),
            });
        }
        Ok("recovered".to_string())
    }

    fn model_name(&self) -> &str {
        "flaky-model"
    }
}

#[tokio::test]
async fn embedding_failure_aborts_only_that_query() {
    let embedder = Arc::new(FlakyEmbedder::new(vec!["alpha", "beta"]));
    let model = Arc::new(MockModel::new("fine"));
    let pipeline = QaPipeline::builder()
        .config(QaConfig::builder().chunk_size(80).chunk_overlap(10).top_k(4).build().unwrap())
        .embedder(embedder.clone())
        .model(model.clone())
        .build()
        .unwrap();
    let session = pipeline.open(sample_document(), CachePolicy::UseCache).await.unwrap();

    embedder.set_failing(true);
    let err = pipeline.ask(&session, "alpha?").await.unwrap_err();
    assert!(matches!(err, QaError::EmbeddingError { .. }), "got {err}");
    assert_eq!(model.call_count(), 0, "a failed retrieval must not reach the model");

    embedder.set_failing(false);
    let answer = pipeline.ask(&session, "alpha?").await.unwrap();
    assert!(matches!(answer, Answer::Answered { .. }));
}

#[tokio::test]
async fn model_failure_aborts_only_that_query() {
    let model = Arc::new(FlakyModel { failing: AtomicBool::new(true) });
    let pipeline = pipeline_with(model.clone(), 0.0);
    let session = pipeline.open(sample_document(), CachePolicy::UseCache).await.unwrap();

    let err = pipeline.ask(&session, "alpha?").await.unwrap_err();
    assert!(matches!(err, QaError::ModelError(_)), "got {err}");

    model.failing.store(false, Ordering::SeqCst);
    match pipeline.ask(&session, "alpha?").await.unwrap() {
        Answer::Answered { text, .. } => assert_eq!(text, "recovered"),
        Answer::NoContext => panic!("retrieval should still match"),
    }
}

#[tokio::test]
async fn builder_requires_embedder_and_model() {
    let err = QaPipeline::builder().build().unwrap_err();
    assert!(matches!(err, QaError::ConfigError(_)));
}

/// A stub that behaves like a perfectly grounded model: it answers only
/// when the prompt's context mentions the fact, otherwise it follows the
/// refusal instruction verbatim.
struct LiteralGroundedStub;

#[async_trait]
impl GenerationModel for LiteralGroundedStub {
    async fn generate(&self, prompt: &str) -> docqa_model::Result<String> {
        let context = prompt
            .split("Context:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\nQuestion:").next())
            .unwrap_or("");
        if context.to_lowercase().contains("paris") {
            Ok("The capital is Paris.".to_string())
        } else {
            Ok(REFUSAL_TEXT.to_string())
        }
    }

    fn model_name(&self) -> &str {
        "literal-grounded-stub"
    }
}

#[tokio::test]
async fn refusal_contract_is_detectable_when_context_lacks_the_fact() {
    // The document never mentions Paris; retrieval still returns chunks
    // (threshold 0), so the model is called and must refuse verbatim.
    let pipeline = pipeline_with(Arc::new(LiteralGroundedStub), 0.0);
    let session = pipeline.open(sample_document(), CachePolicy::UseCache).await.unwrap();

    let answer = pipeline.ask(&session, "what is the capital, paris?").await.unwrap();
    match answer {
        Answer::Answered { text, .. } => assert_eq!(text, REFUSAL_TEXT),
        Answer::NoContext => panic!("retrieval should have matched with threshold 0"),
    }
}
