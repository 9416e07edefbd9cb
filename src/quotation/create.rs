//! Quotation creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
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
        form::{FormAction, QuotationForm, quotation_form_view},
        insert_quotation,
    },
    timezone::local_now,
};

/// The state needed for the new quotation page.
#[derive(Debug, Clone)]
pub struct NewQuotationPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewQuotationPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The state needed for creating a quotation.
#[derive(Debug, Clone)]
pub struct CreateQuotationEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateQuotationEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the quotation creation page with the date and intake time set to now.
pub async fn get_new_quotation_page(
    State(state): State<NewQuotationPageState>,
) -> Result<Response, Error> {
    let now = local_now(&state.local_timezone)
        .inspect_err(|error| tracing::error!("Could not get local time: {error}"))?;

    Ok(new_quotation_view(&QuotationForm::starting_at(now)).into_response())
}

/// Handle quotation creation form submission.
pub async fn create_quotation_endpoint(
    State(state): State<CreateQuotationEndpointState>,
    Form(form): Form<QuotationForm>,
) -> Response {
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(error) => {
            tracing::debug!("Rejected new quotation: {error}");
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

    match insert_quotation(fields, &connection) {
        Ok(quotation) => {
            tracing::info!("Created quotation {}", quotation.id);

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a quotation: {error}");

            error.into_alert_response()
        }
    }
}

fn new_quotation_view(values: &QuotationForm) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_QUOTATION_VIEW).into_html();
    let form = quotation_form_view(
        FormAction::Create {
            endpoint: endpoints::POST_QUOTATION,
        },
        values,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4 self-start" { "Create New Quotation" }
            (form)
        }
    };

    base("Create Quotation", &[], &content)
}


#[cfg(test)]
mod create_quotation_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        endpoints,
        quotation::{
            Source, Status, create::CreateQuotationEndpointState, form::QuotationForm,
            create_quotation_endpoint, create_quotation_table, get_all_quotations,
        },
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_fragment},
    };

    fn get_create_state() -> CreateQuotationEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_quotation_table(&connection).expect("Could not create quotation table");

        CreateQuotationEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn valid_form() -> QuotationForm {
        QuotationForm {
            sl_number: "400".to_owned(),
            date: "2024-03-01".to_owned(),
            time_in: "2024-03-01T09:30".to_owned(),
            source: "whatsapp".to_owned(),
            client: "Acme".to_owned(),
            status: "quoted".to_owned(),
            item: "Widget".to_owned(),
            remarks: "Call back Monday".to_owned(),
            quote_number: "Q-17".to_owned(),
            quoted_date: "2024-03-02".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_quotation() {
        let state = get_create_state();

        let response = create_quotation_endpoint(State(state.clone()), Form(valid_form())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);

        let quotations = get_all_quotations(&state.db_connection.lock().unwrap())
            .expect("Could not get quotations");
        assert_eq!(quotations.len(), 1);
        let quotation = &quotations[0];
        assert_eq!(quotation.sl_number, 400);
        assert_eq!(quotation.source, Source::Whatsapp);
        assert_eq!(quotation.status, Status::Quoted);
        assert_eq!(quotation.remarks.as_deref(), Some("Call back Monday"));
        assert_eq!(quotation.quoted_date, Some(date!(2024 - 03 - 02)));
    }

    #[tokio::test]
    async fn invalid_sl_number_renders_alert_and_stores_nothing() {
        let state = get_create_state();
        let form = QuotationForm {
            sl_number: "abc".to_owned(),
            ..valid_form()
        };

        let response = create_quotation_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Invalid quotation"));
        assert!(text.contains("\"abc\" is not a valid SL number"));

        let quotations = get_all_quotations(&state.db_connection.lock().unwrap())
            .expect("Could not get quotations");
        assert!(quotations.is_empty());
    }

    #[tokio::test]
    async fn status_outside_enum_is_rejected() {
        let state = get_create_state();
        let form = QuotationForm {
            status: "approved".to_owned(),
            ..valid_form()
        };

        let response = create_quotation_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn decodes_urlencoded_form_without_optional_fields() {
        let form: QuotationForm = serde_html_form::from_str(
            "sl_number=12&date=2024-01-15&time_in=2024-01-15T08%3A00&source=mail\
            &client=Bob&status=pending&item=Bolts",
        )
        .expect("Could not decode form");

        assert_eq!(form.client, "Bob");
        assert_eq!(form.time_in, "2024-01-15T08:00");
        assert_eq!(form.remarks, "");
        assert_eq!(form.quoted_date, "");
    }
}
