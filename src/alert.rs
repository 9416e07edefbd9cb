//! Alert system for displaying error messages to users.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element of the base page, standing in for a toast.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// An error message with optional extra details.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub message: String,
    /// Shown under the message when not empty.
    pub details: String,
}

impl Alert {
    pub fn into_html(self) -> Markup {
        html!(
            div
                role="alert"
                class="flex items-start p-4 mb-4 text-red-800 border border-red-300 rounded-lg \
                    bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                div class="text-sm"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex h-8 w-8 \
                        items-center justify-center hover:opacity-75"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
