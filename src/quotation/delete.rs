//! Quotation deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    quotation::{QuotationId, delete_quotation},
};

/// The state needed for deleting a quotation.
#[derive(Debug, Clone)]
pub struct DeleteQuotationEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteQuotationEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle quotation deletion.
///
/// On success the client is redirected to the dashboard so that both the list
/// and the stat cards are fetched again.
pub async fn delete_quotation_endpoint(
    Path(quotation_id): Path<QuotationId>,
    State(state): State<DeleteQuotationEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_quotation(quotation_id, &connection) {
        Ok(_) => {
            tracing::info!("Deleted quotation {quotation_id}");

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DeleteMissingQuotation) => Error::DeleteMissingQuotation.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting quotation {quotation_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
