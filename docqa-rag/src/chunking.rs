//! Document chunking.
//!
//! Provides the [`Chunker`] trait and [`PageChunker`], a fixed-size
//! sliding-window splitter that never crosses page boundaries. Chunks
//! overlap by a configurable number of characters so that content near a
//! chunk boundary stays retrievable from both sides.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations must be deterministic: the same document and the same
/// parameters always produce the identical chunk sequence. The index
/// cache depends on this.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` for a document with no text. Chunks carry a
    /// document-wide `sequence_index` starting at 0.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits each page into fixed-size chunks by character count with overlap.
///
/// Each window holds at most `chunk_size` characters and consecutive
/// windows share `chunk_overlap` characters. Windows never span pages, so
/// every chunk's page tag is exact. Counting is in Unicode scalar values;
/// multi-byte characters are never split.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::PageChunker;
///
/// let chunker = PageChunker::new(700, 120);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct PageChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl PageChunker {
    /// Create a new `PageChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Default for PageChunker {
    /// The pipeline defaults: 700-character chunks with 120 characters of
    /// overlap, sized to keep a handful of chunks inside a model's
    /// effective context window.
    fn default() -> Self {
        Self::new(700, 120)
    }
}

impl Chunker for PageChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut sequence_index = 0;

        for page in &document.pages {
            for text in split_with_overlap(&page.text, self.chunk_size, self.chunk_overlap) {
                chunks.push(Chunk { text, page: page.number, sequence_index });
                sequence_index += 1;
            }
        }

        chunks
    }
}

/// Sliding-window split over characters. Empty input produces no windows;
/// trailing content shorter than `chunk_size` is always kept.
fn split_with_overlap(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    // Byte offset of every character, so windows slice on char boundaries.
    let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let char_count = offsets.len();
    // Guarded to 1 so a degenerate overlap can never stall the window.
    let step = chunk_size.saturating_sub(chunk_overlap).max(1);

    let mut windows = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + chunk_size).min(char_count);
        let byte_start = offsets[start];
        let byte_end = if end == char_count { text.len() } else { offsets[end] };
        windows.push(text[byte_start..byte_end].to_string());
        if end == char_count {
            break;
        }
        start += step;
    }

    windows
}
