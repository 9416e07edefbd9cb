//! Analytics HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{
        GroupCount, TOP_CLIENT_COUNT, group_by_source, group_by_status, monthly_trend, top_clients,
    },
    analytics::charts::{
        AnalyticsChart, charts_script, charts_view, monthly_trend_chart, source_chart,
        status_chart,
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    quotation::{Quotation, get_all_quotations},
};

/// The state needed for displaying the analytics page.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading quotations.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display charts and the top clients over all quotations.
pub async fn get_analytics_page(State(state): State<AnalyticsState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let quotations = get_all_quotations(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve quotations: {error}"))?;

    if quotations.is_empty() {
        return Ok(analytics_no_data_view().into_response());
    }

    let charts = build_analytics_charts(&quotations);
    let clients = top_clients(&quotations, TOP_CLIENT_COUNT);

    Ok(analytics_view(&charts, &clients).into_response())
}

/// Creates the status, source and monthly charts.
fn build_analytics_charts(quotations: &[Quotation]) -> [AnalyticsChart; 3] {
    [
        AnalyticsChart {
            id: "status-chart",
            options: status_chart(&group_by_status(quotations)).to_string(),
        },
        AnalyticsChart {
            id: "source-chart",
            options: source_chart(&group_by_source(quotations)).to_string(),
        },
        AnalyticsChart {
            id: "monthly-trend-chart",
            options: monthly_trend_chart(&monthly_trend(quotations)).to_string(),
        },
    ]
}

fn analytics_no_data_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW).into_html();
    let new_quotation_link = link(endpoints::NEW_QUOTATION_VIEW, "adding a quotation");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you start by " (new_quotation_link) "."
            }
        }
    );

    base("Analytics", &[], &content)
}

fn analytics_view(charts: &[AnalyticsChart], clients: &[GroupCount]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="w-full mb-8"
            {
                h1 class="text-3xl font-bold mb-2" { "Analytics & Insights" }
                p class="text-gray-600 dark:text-gray-400"
                {
                    "Visual insights into your quotation performance"
                }
            }

            (charts_view(charts))

            (top_clients_view(clients))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Analytics", &scripts, &content)
}

fn top_clients_view(clients: &[GroupCount]) -> Markup {
    html!(
        section
            id="top-clients"
            class="w-full bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-6 shadow-md"
        {
            h3 class="text-lg font-semibold mb-4" { "Top " (TOP_CLIENT_COUNT) " Clients" }

            ol class="space-y-4"
            {
                @for client in clients {
                    li
                        class="flex items-center justify-between p-3 rounded-lg
                            bg-gray-100 dark:bg-gray-700"
                    {
                        span class="font-medium" { (client.label) }
                        span class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (quotation_count_label(client.count))
                        }
                    }
                }
            }
        }
    )
}

fn quotation_count_label(count: usize) -> String {
    if count == 1 {
        "1 quotation".to_owned()
    } else {
        format!("{count} quotations")
    }
}

#[cfg(test)]
mod analytics_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::{date, datetime};

    use crate::{
        analytics::get_analytics_page,
        quotation::{QuotationFields, Source, Status, create_quotation_table, insert_quotation},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{AnalyticsState, quotation_count_label};

    fn get_analytics_state(clients: &[&str]) -> AnalyticsState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_quotation_table(&connection).expect("Could not create quotation table");

        for client in clients {
            insert_quotation(
                QuotationFields {
                    sl_number: 1,
                    date: date!(2024 - 01 - 20),
                    time_in: datetime!(2024-01-20 08:00),
                    client: (*client).to_owned(),
                    item: "Widget".to_owned(),
                    source: Source::Mail,
                    status: Status::Quoted,
                    remarks: None,
                    quote_number: None,
                    quoted_date: None,
                },
                &connection,
            )
            .expect("Could not insert quotation");
        }

        AnalyticsState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn no_quotations_shows_empty_state() {
        let state = get_analytics_state(&[]);

        let response = get_analytics_page(State(state))
            .await
            .expect("Could not render analytics");

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(
            html.select(&Selector::parse("#charts").unwrap())
                .next()
                .is_none()
        );
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Nothing here yet..."));
    }

    /// Quotations on the same date are listed newest first, so ties between
    /// clients go to the most recently added one.
    #[tokio::test]
    async fn shows_charts_and_top_clients() {
        let state = get_analytics_state(&["Acme", "Bolt", "Acme", "Cog", "Dyn", "Eel", "Fin"]);

        let response = get_analytics_page(State(state))
            .await
            .expect("Could not render analytics");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        for id in ["status-chart", "source-chart", "monthly-trend-chart"] {
            assert!(
                html.select(&Selector::parse(&format!("#{id}")).unwrap())
                    .next()
                    .is_some(),
                "missing chart container {id}"
            );
        }

        let clients = html
            .select(&Selector::parse("#top-clients li").unwrap())
            .map(|item| {
                item.text()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>();
        assert_eq!(
            clients,
            vec![
                "Acme 2 quotations",
                "Fin 1 quotation",
                "Eel 1 quotation",
                "Dyn 1 quotation",
                "Cog 1 quotation",
            ]
        );
    }

    #[test]
    fn count_label_is_pluralized() {
        assert_eq!(quotation_count_label(0), "0 quotations");
        assert_eq!(quotation_count_label(1), "1 quotation");
        assert_eq!(quotation_count_label(12), "12 quotations");
    }
}
