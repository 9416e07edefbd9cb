//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{DashboardStats, QuotationFilter, filter_quotations},
    dashboard::cards::stat_cards_view,
    endpoints,
    html::base,
    navigation::NavBar,
    quotation::{get_all_quotations, quotations_list_view},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading quotations.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the headline numbers and the quotations matching `filter`.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(filter): Query<QuotationFilter>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let quotations = get_all_quotations(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve quotations: {error}"))?;

    let stats = DashboardStats::from_quotations(&quotations);
    let total_count = quotations.len();
    let quotations = filter_quotations(quotations, &filter);

    let list = quotations_list_view(&quotations, &filter, total_count);

    Ok(dashboard_view(&stats, &list).into_response())
}

fn dashboard_view(stats: &DashboardStats, list: &Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="w-full flex justify-between flex-wrap items-end gap-4 mb-8"
            {
                div
                {
                    h1 class="text-3xl font-bold mb-2" { "Quotation Tracker" }
                    p class="text-gray-600 dark:text-gray-400"
                    {
                        "Manage and track all your quotations in one place"
                    }
                }

                a
                    href=(endpoints::NEW_QUOTATION_VIEW)
                    class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                        dark:hover:bg-blue-700 text-white rounded"
                {
                    "New Quotation"
                }
            }

            (stat_cards_view(stats))

            (list)
        }
    );

    base("Dashboard", &[], &content)
}
