//! CSV and PDF reports of quotations, and the endpoints that download them.

mod csv_export;
mod endpoint;
mod pdf_export;
mod row;

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use time::PrimitiveDateTime;

pub use csv_export::render_csv;
pub use endpoint::{export_csv_endpoint, export_pdf_endpoint};
pub use pdf_export::{PdfLayout, render_pdf};
pub use row::{ExportRow, export_filename, format_export_date};

use crate::Error;

/// The filename prefix for downloaded reports.
pub const EXPORT_BASE_NAME: &str = "quotations";

/// A rendered report ready to be downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    /// Suggested download name, including the extension.
    pub filename: String,
    /// MIME type sent in the `Content-Type` header.
    pub content_type: &'static str,
    /// The rendered document.
    pub bytes: Vec<u8>,
}

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);

        (
            [
                (CONTENT_TYPE, self.content_type.to_owned()),
                (CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Render `rows` as a CSV file named after `base` and the export time `now`.
///
/// # Errors
/// Returns [Error::CsvExportError] if the CSV writer fails.
pub fn export_csv(
    rows: &[ExportRow],
    base: &str,
    now: PrimitiveDateTime,
) -> Result<ExportFile, Error> {
    Ok(ExportFile {
        filename: export_filename(base, now, "csv"),
        content_type: "text/csv; charset=utf-8",
        bytes: render_csv(rows)?,
    })
}

/// Render `rows` as a PDF file named after `base` and the export time `now`.
pub fn export_pdf(
    rows: &[ExportRow],
    base: &str,
    now: PrimitiveDateTime,
    layout: &PdfLayout,
) -> ExportFile {
    ExportFile {
        filename: export_filename(base, now, "pdf"),
        content_type: "application/pdf",
        bytes: render_pdf(rows, now, layout),
    }
}
