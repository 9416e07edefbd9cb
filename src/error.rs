//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The SL number in a submitted form is not a whole number.
    #[error("\"{0}\" is not a valid SL number")]
    InvalidSerialNumber(String),

    /// A date in a submitted form could not be parsed.
    ///
    /// Callers should pass in the name of the field and the offending text.
    #[error("could not parse the {0} \"{1}\", expected a date like 2024-03-01")]
    InvalidDate(&'static str, String),

    /// The intake time in a submitted form could not be parsed.
    #[error("could not parse the time in \"{0}\", expected a date and time like 2024-03-01T09:30")]
    InvalidDateTime(String),

    /// A required text field was empty or only whitespace.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// The source is not one of the known acquisition channels.
    #[error("\"{0}\" is not a valid source")]
    InvalidSource(String),

    /// The status is not one of the known quotation statuses.
    #[error("\"{0}\" is not a valid status")]
    InvalidStatus(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The CSV writer failed while producing an export.
    #[error("could not write the CSV export: {0}")]
    CsvExportError(String),

    /// Tried to update a quotation that does not exist
    #[error("tried to update a quotation that is not in the database")]
    UpdateMissingQuotation,

    /// Tried to delete a quotation that does not exist
    #[error("tried to delete a quotation that is not in the database")]
    DeleteMissingQuotation,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvExportError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidSerialNumber(_)
            | Error::InvalidDate(..)
            | Error::InvalidDateTime(_)
            | Error::EmptyField(_)
            | Error::InvalidSource(_)
            | Error::InvalidStatus(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert {
                    message: "Invalid quotation".to_owned(),
                    details: capitalize_first(&self.to_string()),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::UpdateMissingQuotation => (
                StatusCode::NOT_FOUND,
                Alert {
                    message: "Could not update quotation".to_owned(),
                    details: "The quotation could not be found. \
                    It may have been deleted in the meantime."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingQuotation => (
                StatusCode::NOT_FOUND,
                Alert {
                    message: "Could not delete quotation".to_owned(),
                    details: "The quotation could not be found. \
                    Try refreshing the page to see if the quotation has already been deleted."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        Error,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn not_found_renders_404_page() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn validation_errors_render_unprocessable_alert() {
        let response = Error::InvalidSerialNumber("abc".to_owned()).into_alert_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("\"abc\" is not a valid SL number"),
            "alert should explain the problem, got {text:?}"
        );
    }

    #[test]
    fn missing_quotation_on_delete_is_not_found() {
        let response = Error::DeleteMissingQuotation.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
