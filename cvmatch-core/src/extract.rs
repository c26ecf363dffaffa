//! PDF text extraction.
//!
//! Extraction is a narrow seam: a [`PdfPageExtractor`] turns one file into
//! per-page text, and [`extract_document_text`] folds the pages into the
//! single string the rest of the pipeline works on. Tests substitute the
//! extractor; production uses [`LopdfExtractor`].

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::{MatchError, Result};

/// Error type extractors surface; the ingestor wraps it with file context.
pub type PageExtractionError = Box<dyn std::error::Error + Send + Sync>;

/// Page-level text extraction from a PDF file.
pub trait PdfPageExtractor: Send + Sync {
    /// Extract the text of every page, in document order.
    fn extract_pages(&self, path: &Path) -> std::result::Result<Vec<String>, PageExtractionError>;
}

/// [`PdfPageExtractor`] backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfPageExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> std::result::Result<Vec<String>, PageExtractionError> {
        let document = Document::load(path)?;
        let mut pages = Vec::new();
        for &number in document.get_pages().keys() {
            pages.push(document.extract_text(&[number])?);
        }
        Ok(pages)
    }
}

/// Extract the full text of one CV.
///
/// Pages are concatenated with nothing in between; page boundaries are not
/// chunk boundaries.
///
/// # Errors
///
/// [`MatchError::NotFound`] if `path` does not exist,
/// [`MatchError::Extraction`] carrying the file's base name if the extractor
/// fails.
pub fn extract_document_text(extractor: &dyn PdfPageExtractor, path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(MatchError::NotFound(path.to_path_buf()));
    }
    let file = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string();
    let pages = extractor
        .extract_pages(path)
        .map_err(|source| MatchError::Extraction { file, source })?;
    let text = pages.concat();
    debug!(path = %path.display(), pages = pages.len(), chars = text.chars().count(), "extracted CV text");
    Ok(text)
}
