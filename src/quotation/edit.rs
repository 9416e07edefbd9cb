//! Quotation editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    quotation::{
        QuotationId,
        form::{FormAction, QuotationForm, quotation_form_view},
        get_quotation, update_quotation,
    },
};

/// The state needed for the edit quotation page and for updating a quotation.
#[derive(Debug, Clone)]
pub struct EditQuotationState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditQuotationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the quotation editing page, or the 404 page if the quotation does not exist.
pub async fn get_edit_quotation_page(
    Path(quotation_id): Path<QuotationId>,
    State(state): State<EditQuotationState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let quotation = get_quotation(quotation_id, &connection).inspect_err(|error| match error {
        Error::NotFound => tracing::debug!("Quotation {quotation_id} not found"),
        error => tracing::error!("Failed to retrieve quotation {quotation_id}: {error}"),
    })?;

    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_QUOTATION, quotation_id);

    let values = QuotationForm::from_quotation(&quotation);

    Ok(edit_quotation_view(&update_endpoint, &values).into_response())
}

/// Handle quotation update form submission.
pub async fn update_quotation_endpoint(
    Path(quotation_id): Path<QuotationId>,
    State(state): State<EditQuotationState>,
    Form(form): Form<QuotationForm>,
) -> Response {
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(error) => {
            tracing::debug!("Rejected update to quotation {quotation_id}: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_quotation(quotation_id, fields, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingQuotation) => Error::UpdateMissingQuotation.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating quotation {quotation_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_quotation_view(update_endpoint: &str, values: &QuotationForm) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_QUOTATION_VIEW).into_html();
    let form = quotation_form_view(
        FormAction::Update {
            endpoint: update_endpoint,
        },
        values,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4 self-start" { "Edit Quotation" }
            (form)
        }
    };

    base("Edit Quotation", &[], &content)
}
