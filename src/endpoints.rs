//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/quotations/{quotation_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with the headline numbers and the quotations list.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The quotations list on its own, for live filtering with htmx.
pub const QUOTATIONS_TABLE: &str = "/quotations/table";
/// The page for creating a new quotation.
pub const NEW_QUOTATION_VIEW: &str = "/quotations/new";
/// The page for editing an existing quotation.
pub const EDIT_QUOTATION_VIEW: &str = "/quotations/{quotation_id}/edit";
/// The page with charts over all quotations.
pub const ANALYTICS_VIEW: &str = "/analytics";
/// Download the filtered quotations as CSV.
pub const EXPORT_CSV: &str = "/quotations/export/csv";
/// Download the filtered quotations as PDF.
pub const EXPORT_PDF: &str = "/quotations/export/pdf";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a quotation.
pub const POST_QUOTATION: &str = "/api/quotations";
/// The route to update a quotation.
pub const PUT_QUOTATION: &str = "/api/quotations/{quotation_id}";
/// The route to delete a quotation.
pub const DELETE_QUOTATION: &str = "/api/quotations/{quotation_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/quotations/{quotation_id}', '{quotation_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found, `endpoint_path` is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
