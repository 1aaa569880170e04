//! Data types for documents, chunks, and retrieval results.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One page of a source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    /// 1-based page number, or `None` for unpaged sources (plain text).
    pub number: Option<u32>,
    /// The text content of the page.
    pub text: String,
}

/// A source document, held as the ordered sequence of its pages.
///
/// Documents live for one session: loaded, indexed, queried, dropped.
/// Only the derived [`identity`](Document::identity) outlives the session,
/// as the key for the persisted index cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Display name, typically the source file name.
    pub name: String,
    /// Ordered page texts.
    pub pages: Vec<Page>,
    /// Optional URI pointing to the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

impl Document {
    /// Create a single-page document from plain text with no page numbering.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: vec![Page { number: None, text: text.into() }],
            source_uri: None,
        }
    }

    /// Create a document from ordered page texts, numbered from 1.
    pub fn from_pages(name: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            name: name.into(),
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(i, text)| Page { number: Some(i as u32 + 1), text })
                .collect(),
            source_uri: None,
        }
    }

    /// Derive the document's cache identity: the hex SHA-256 of its page
    /// numbers and texts. Identical content always maps to the same
    /// identity, which is what makes the persisted index reusable across
    /// sessions.
    ///
    /// Pages are separated by a form-feed byte in the hash input so that
    /// page-boundary shifts change the identity. Page numbers participate
    /// too: chunks carry their page tag, so a paged and an unpaged
    /// document with the same text must not share a cache entry.
    pub fn identity(&self) -> String {
        let mut hasher = Sha256::new();
        for page in &self.pages {
            match page.number {
                Some(n) => {
                    hasher.update([0x01]);
                    hasher.update(n.to_be_bytes());
                }
                None => hasher.update([0x00]),
            }
            hasher.update(page.text.as_bytes());
            hasher.update([0x0c]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Whether the document contains any non-empty page text.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.text.is_empty())
    }
}

/// A bounded segment of document text: the unit of retrieval.
///
/// Chunks are immutable once produced. The chunker is deterministic, so
/// re-chunking unchanged content yields an identical sequence — the cache
/// relies on this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// The page this chunk originates from, when the source is paged.
    pub page: Option<u32>,
    /// Position of this chunk in the document-wide chunk sequence.
    pub sequence_index: usize,
}

/// A retrieved [`Chunk`] paired with a similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_stable_for_same_content() {
        let a = Document::from_pages("a.pdf", vec!["one".into(), "two".into()]);
        let b = Document::from_pages("b.pdf", vec!["one".into(), "two".into()]);
        // Name does not participate in identity; content does.
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn identity_changes_with_content_and_page_boundaries() {
        let a = Document::from_pages("d", vec!["one".into(), "two".into()]);
        let b = Document::from_pages("d", vec!["onetwo".into()]);
        let c = Document::from_pages("d", vec!["one".into(), "three".into()]);
        assert_ne!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
    }

    #[test]
    fn paged_and_unpaged_same_text_have_distinct_identities() {
        // Chunks carry the page tag, so these must not share a cache entry.
        let unpaged = Document::from_text("d", "one");
        let paged = Document::from_pages("d", vec!["one".into()]);
        assert_ne!(unpaged.identity(), paged.identity());
    }

    #[test]
    fn empty_document() {
        assert!(Document::from_text("x", "").is_empty());
        assert!(!Document::from_text("x", "hello").is_empty());
    }
}
