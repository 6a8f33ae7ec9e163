#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Project-financial metric extraction from dashboard PDF reports.
//!
//! A parse is a single pass: pull the plain text out of the PDF
//! ([`project_dashboard_pdf`]), run every [`FieldSpec`] in a
//! [`FieldTable`] against it, and assemble a [`DashboardRecord`].
//!
//! Field extraction never fails. A label that is missing, or whose value
//! does not parse, leaves the field at `0` or `""`. The only error path is
//! getting text out of the PDF in the first place.

pub mod extract;
pub mod field_table;

use std::path::Path;

use project_dashboard_models::DashboardRecord;
use project_dashboard_pdf::PdfError;

pub use field_table::{FieldSpec, FieldTable};

/// Errors that abort a dashboard parse.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The PDF could not be read or its text could not be extracted.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Reading a field table file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field table could not be parsed or failed validation.
    #[error("Invalid field table: {message}")]
    FieldTable {
        /// Description of what went wrong.
        message: String,
    },
}

/// Parses the dashboard PDF at `path`.
///
/// # Errors
///
/// Returns [`DashboardError::Pdf`] if the file is missing, unreadable, or
/// not a PDF whose text can be extracted.
pub fn parse_dashboard_pdf(
    path: impl AsRef<Path>,
    table: &FieldTable,
) -> Result<DashboardRecord, DashboardError> {
    let path = path.as_ref();
    let text = project_dashboard_pdf::extract_text(path)?;
    let record = parse_dashboard_text(&text, table);

    log::debug!("Parsed dashboard {}", path.display());

    Ok(record)
}

/// Parses a dashboard PDF held in memory.
///
/// # Errors
///
/// Returns [`DashboardError::Pdf`] if `bytes` is not a PDF whose text can
/// be extracted.
pub fn parse_dashboard_bytes(
    bytes: &[u8],
    table: &FieldTable,
) -> Result<DashboardRecord, DashboardError> {
    let text = project_dashboard_pdf::extract_text_from_mem(bytes)?;
    let record = parse_dashboard_text(&text, table);

    log::debug!("Parsed dashboard from {} in-memory bytes", bytes.len());

    Ok(record)
}

/// Runs every field in `table` against already-extracted report text.
#[must_use]
pub fn parse_dashboard_text(text: &str, table: &FieldTable) -> DashboardRecord {
    let mut record = DashboardRecord::default();

    for spec in table.fields() {
        let value = spec.extract(text);
        log::trace!("{} = {value:?}", spec.field());

        let stored = record.set(spec.field(), value);
        debug_assert!(stored, "field table kinds are validated on load");
    }

    record
}
