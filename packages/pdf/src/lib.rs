#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Plain-text extraction from dashboard PDF reports.
//!
//! Wraps [`pdf_extract`] to turn a PDF (on disk or in memory) into one
//! string: the text of every page in document order, each page followed
//! by a newline. Everything downstream works on that string alone.
//!
//! `pdf_extract` can panic on malformed documents, so extraction runs
//! under [`std::panic::catch_unwind`] and a panic surfaces as
//! [`PdfError::Extraction`] like any other parse failure.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Every PDF starts with this header.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Errors specific to PDF text extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// Reading the PDF from disk failed.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The bytes are not a PDF, or a page's text could not be extracted.
    #[error("PDF extraction error: {0}")]
    Extraction(String),
}

/// Reads the PDF at `path` and returns its concatenated page text.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read, or
/// [`PdfError::Extraction`] if it is not a readable PDF.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String, PdfError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| PdfError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Read {} bytes from {}", bytes.len(), path.display());

    extract_text_from_mem(&bytes)
}

/// Extracts the concatenated page text of an in-memory PDF.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if `bytes` is not a PDF or any page
/// fails to extract.
pub fn extract_text_from_mem(bytes: &[u8]) -> Result<String, PdfError> {
    let pages = extract_pages_from_mem(bytes)?;
    let text = join_pages(&pages);

    log::debug!(
        "Extracted {} characters of text from {} page(s)",
        text.len(),
        pages.len()
    );

    Ok(text)
}

/// Extracts the text of each page of an in-memory PDF, in document order.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if `bytes` is not a PDF or any page
/// fails to extract.
pub fn extract_pages_from_mem(bytes: &[u8]) -> Result<Vec<String>, PdfError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(PdfError::Extraction(
            "not a PDF document (missing %PDF header)".to_string(),
        ));
    }

    panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|payload| PdfError::Extraction(panic_message(payload.as_ref())))?
    .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))
}

/// Joins page texts, appending a newline after every page.
#[must_use]
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let capacity = pages.iter().map(|p| p.as_ref().len() + 1).sum();
    let mut text = String::with_capacity(capacity);

    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
    }

    text
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());

    format!("PDF parser aborted: {detail}")
}
