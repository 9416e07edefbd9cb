//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    analytics::get_analytics_page,
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    quotation::{
        create_quotation_endpoint, delete_quotation_endpoint, get_edit_quotation_page,
        get_new_quotation_page, get_quotations_table, update_quotation_endpoint,
    },
    report::{export_csv_endpoint, export_pdf_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::QUOTATIONS_TABLE, get(get_quotations_table))
        .route(endpoints::NEW_QUOTATION_VIEW, get(get_new_quotation_page))
        .route(endpoints::EDIT_QUOTATION_VIEW, get(get_edit_quotation_page))
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(endpoints::EXPORT_CSV, get(export_csv_endpoint))
        .route(endpoints::EXPORT_PDF, get(export_pdf_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // These routes are called by htmx and answer with HX-Redirect or an alert fragment.
    let api_routes = Router::new()
        .route(endpoints::POST_QUOTATION, post(create_quotation_endpoint))
        .route(
            endpoints::PUT_QUOTATION,
            put(update_quotation_endpoint).delete(delete_quotation_endpoint),
        );

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
