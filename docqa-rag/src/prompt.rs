//! Grounded prompt assembly.
//!
//! Turns a retrieval result and a query into a single instruction that
//! confines the model to the retrieved context. The refusal sentence is
//! a contract string: downstream consumers may compare against
//! [`REFUSAL_TEXT`] verbatim to detect "no answer found".

use crate::document::ScoredChunk;

/// The exact sentence the model is instructed to reply with when the
/// context does not contain the answer.
pub const REFUSAL_TEXT: &str = "I cannot find relevant information in the provided document.";

/// A grounded instruction ready to send to the answering model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    context: String,
    query: String,
}

impl Prompt {
    /// The formatted context block.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The user's question.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Render the full instruction string.
    pub fn render(&self) -> String {
        format!(
            "You are an assistant answering questions about a single document.\n\
             Answer the question using ONLY the context below. If the context does not \
             contain the information needed, reply exactly:\n\
             {REFUSAL_TEXT}\n\
             When relevant, cite the page or quote the snippet your answer is based on.\n\
             \n\
             Context:\n\
             {context}\n\
             \n\
             Question: {query}",
            context = self.context,
            query = self.query,
        )
    }
}

/// Format retrieved chunks into a context block: retrieval order, one
/// blank line between chunks, each prefixed with its page when known.
pub fn format_context(results: &[ScoredChunk]) -> String {
    results
        .iter()
        .map(|r| match r.chunk.page {
            Some(page) => format!("[page {page}] {}", r.chunk.text),
            None => r.chunk.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Assemble a [`Prompt`] from a retrieval result and a query.
///
/// An empty retrieval result still produces a valid prompt with an empty
/// context block; whether to send it is the orchestrator's call.
pub fn assemble(results: &[ScoredChunk], query: &str) -> Prompt {
    Prompt { context: format_context(results), query: query.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn hit(text: &str, page: Option<u32>, sequence_index: usize) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk { text: text.to_string(), page, sequence_index },
            score: 1.0,
        }
    }

    #[test]
    fn context_preserves_retrieval_order_and_annotates_pages() {
        let results = vec![hit("second page text", Some(2), 5), hit("unpaged text", None, 1)];
        let context = format_context(&results);
        assert_eq!(context, "[page 2] second page text\n\nunpaged text");
    }

    #[test]
    fn rendered_prompt_carries_contract_pieces() {
        let prompt = assemble(&[hit("alpha", Some(1), 0)], "what is alpha?");
        let rendered = prompt.render();
        assert!(rendered.contains(REFUSAL_TEXT));
        assert!(rendered.contains("[page 1] alpha"));
        assert!(rendered.contains("Question: what is alpha?"));
        assert!(rendered.contains("ONLY the context"));
    }

    #[test]
    fn empty_retrieval_still_assembles() {
        let prompt = assemble(&[], "anything?");
        assert_eq!(prompt.context(), "");
        assert!(prompt.render().contains("Question: anything?"));
    }
}
