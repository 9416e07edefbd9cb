//! Download endpoints for the filtered quotation list.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{QuotationFilter, filter_quotations},
    quotation::get_all_quotations,
    report::{EXPORT_BASE_NAME, ExportRow, PdfLayout, export_csv, export_pdf},
    timezone::local_now,
};

/// The state needed for exporting quotations.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Download the quotations matching the list filter as CSV.
pub async fn export_csv_endpoint(
    State(state): State<ExportState>,
    Query(filter): Query<QuotationFilter>,
) -> Result<Response, Error> {
    let rows = get_export_rows(&state, &filter)?;
    let now = local_now(&state.local_timezone)?;

    tracing::debug!("Exporting {} quotations as CSV", rows.len());
    let file = export_csv(&rows, EXPORT_BASE_NAME, now)
        .inspect_err(|error| tracing::error!("Could not export quotations as CSV: {error}"))?;

    Ok(file.into_response())
}

/// Download the quotations matching the list filter as PDF.
pub async fn export_pdf_endpoint(
    State(state): State<ExportState>,
    Query(filter): Query<QuotationFilter>,
) -> Result<Response, Error> {
    let rows = get_export_rows(&state, &filter)?;
    let now = local_now(&state.local_timezone)?;

    tracing::debug!("Exporting {} quotations as PDF", rows.len());

    Ok(export_pdf(&rows, EXPORT_BASE_NAME, now, &PdfLayout::default()).into_response())
}

fn get_export_rows(state: &ExportState, filter: &QuotationFilter) -> Result<Vec<ExportRow>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let quotations = get_all_quotations(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve quotations: {error}"))?;

    Ok(filter_quotations(quotations, filter)
        .iter()
        .map(ExportRow::from)
        .collect())
}
