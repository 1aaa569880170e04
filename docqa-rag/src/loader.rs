//! Document loading: plain text always, PDF behind the `pdf` feature.
//!
//! Loading happens before chunking; anything unreadable or unparseable
//! is a [`QaError::DocumentError`] and the pipeline never starts.

use std::path::Path;

use tracing::debug;

use crate::document::Document;
use crate::error::{QaError, Result};

/// Load a UTF-8 text file as a single-page document.
///
/// # Errors
///
/// Returns [`QaError::DocumentError`] if the file cannot be read or is
/// not valid UTF-8.
pub fn load_text_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| QaError::DocumentError(format!("read {}: {e}", path.display())))?;

    debug!(path = %path.display(), bytes = text.len(), "loaded text document");
    Ok(Document::from_text(display_name(path), text))
}

/// Extract a PDF's pages from raw bytes into a paged document.
///
/// # Errors
///
/// Returns [`QaError::DocumentError`] if the bytes are not a parseable
/// PDF.
#[cfg(feature = "pdf")]
pub fn load_pdf_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Document> {
    let name = name.into();
    let pages = pdf_extract::extract_text_by_pages_from_mem(bytes)
        .map_err(|e| QaError::DocumentError(format!("extract PDF '{name}': {e}")))?;

    debug!(document = %name, pages = pages.len(), "extracted PDF");
    Ok(Document::from_pages(name, pages))
}

/// Load a PDF file from disk into a paged document.
///
/// # Errors
///
/// Returns [`QaError::DocumentError`] if the file cannot be read or
/// parsed.
#[cfg(feature = "pdf")]
pub fn load_pdf_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| QaError::DocumentError(format!("read {}: {e}", path.display())))?;
    load_pdf_bytes(display_name(path), &bytes)
}

fn display_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| {
        path.display().to_string()
    })
}
