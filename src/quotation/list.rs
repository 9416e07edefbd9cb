//! The searchable quotations list shown on the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    aggregation::{QuotationFilter, StatusFilter, filter_quotations},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, edit_delete_action_links, source_badge, status_badge,
        truncate_graphemes,
    },
    quotation::{Quotation, Status, get_all_quotations},
    report::format_export_date,
};

/// The number of user-perceived characters of the remarks shown in the table.
const REMARKS_PREVIEW_LENGTH: usize = 30;

const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

/// The id of the element replaced when the filters change.
const TABLE_CONTAINER_ID: &str = "quotations-table";

/// The state needed for the quotations table.
#[derive(Debug, Clone)]
pub struct QuotationsTableState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for QuotationsTableState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the export links and table for the quotations matching the filter.
///
/// The dashboard's filter form swaps this fragment in as the user types.
pub async fn get_quotations_table(
    State(state): State<QuotationsTableState>,
    Query(filter): Query<QuotationFilter>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let quotations = get_all_quotations(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve quotations: {error}"))?;
    let total_count = quotations.len();
    let quotations = filter_quotations(quotations, &filter);

    Ok(quotations_table_view(&quotations, &filter, total_count).into_response())
}

/// The filter form followed by the table of matching quotations.
///
/// `total_count` is the number of quotations before filtering, used to pick the
/// message shown when the table is empty.
pub fn quotations_list_view(
    quotations: &[Quotation],
    filter: &QuotationFilter,
    total_count: usize,
) -> Markup {
    html!(
        section class="w-full space-y-4"
        {
            (filters_view(filter))
            (quotations_table_view(quotations, filter, total_count))
        }
    )
}

fn filters_view(filter: &QuotationFilter) -> Markup {
    html!(
        form
            id="quotation-filters"
            action=(endpoints::DASHBOARD_VIEW)
            method="get"
            hx-get=(endpoints::QUOTATIONS_TABLE)
            hx-trigger="input delay:300ms, submit"
            hx-target={"#" (TABLE_CONTAINER_ID)}
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="flex flex-col md:flex-row gap-4"
        {
            input
                type="search"
                name="search"
                value=(filter.search)
                placeholder="Search by client, item, or SL number..."
                aria-label="Search quotations"
                class=(FORM_TEXT_INPUT_STYLE);

            select
                name="status"
                aria-label="Filter by status"
                class={(FORM_TEXT_INPUT_STYLE) " md:max-w-48"}
            {
                option
                    value=(StatusFilter::All.as_str())
                    selected[filter.status == StatusFilter::All]
                {
                    "All Status"
                }

                @for status in Status::ALL {
                    option
                        value=(status.as_str())
                        selected[filter.status == StatusFilter::Only(status.clone())]
                    {
                        (status.label())
                    }
                }
            }
        }
    )
}

fn quotations_table_view(
    quotations: &[Quotation],
    filter: &QuotationFilter,
    total_count: usize,
) -> Markup {
    let query = filter.to_query_string();
    let csv_url = format!("{}?{query}", endpoints::EXPORT_CSV);
    let pdf_url = format!("{}?{query}", endpoints::EXPORT_PDF);

    let empty_message = html!(
        @if total_count == 0 {
            "No quotations yet. "
            a href=(endpoints::NEW_QUOTATION_VIEW) class=(LINK_STYLE)
            {
                "Create your first one!"
            }
        } @else {
            "No quotations found matching your filters"
        }
    );

    html!(
        div id=(TABLE_CONTAINER_ID) class="space-y-4"
        {
            div class="flex justify-between flex-wrap items-end gap-2"
            {
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Showing " (quotations.len()) " of " (total_count) " quotations"
                }

                div class="flex gap-2"
                {
                    a href=(csv_url) download class=(BUTTON_SECONDARY_STYLE) { "Export CSV" }
                    a href=(pdf_url) download class=(BUTTON_SECONDARY_STYLE) { "Export PDF" }
                }
            }

            div class="overflow-x-auto dark:bg-gray-800"
            {
                table class="w-full text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            @for heading in [
                                "SL #", "Date", "Time In", "Client", "Item", "Source",
                                "Status", "Quote #", "Remarks", "Actions",
                            ] {
                                th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                            }
                        }
                    }

                    tbody
                    {
                        @for quotation in quotations {
                            (table_row(quotation))
                        }

                        @if quotations.is_empty() {
                            tr
                            {
                                td
                                    colspan="10"
                                    class="px-6 py-4 text-center
                                        text-gray-500 dark:text-gray-400"
                                {
                                    (empty_message)
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn table_row(quotation: &Quotation) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_QUOTATION_VIEW, quotation.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_QUOTATION, quotation.id);

    html!(
        tr id={"quotation-" (quotation.id)} class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (quotation.sl_number) }
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} { (format_export_date(quotation.date)) }
            td class=(TABLE_CELL_STYLE) { (format_time(quotation.time_in)) }
            td class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
            {
                (quotation.client)
            }
            td class=(TABLE_CELL_STYLE) { (quotation.item) }
            td class=(TABLE_CELL_STYLE) { (source_badge(&quotation.source)) }
            td class=(TABLE_CELL_STYLE) { (status_badge(&quotation.status)) }
            td class=(TABLE_CELL_STYLE) { (quotation.quote_number.as_deref().unwrap_or("-")) }
            td class=(TABLE_CELL_STYLE)
            {
                @match &quotation.remarks {
                    Some(remarks) => {
                        span title=(remarks)
                        {
                            (truncate_graphemes(remarks, REMARKS_PREVIEW_LENGTH))
                        }
                    }
                    None => { "-" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        "Are you sure you want to delete this quotation?",
                        "closest tr",
                        "outerHTML",
                    ))
                }
            }
        }
    )
}

fn format_time(time_in: PrimitiveDateTime) -> String {
    time_in.format(TIME_FORMAT).unwrap_or_default()
}

#[cfg(test)]
mod quotations_list_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::{ElementRef, Html, Selector};
    use time::macros::{date, datetime};

    use crate::{
        aggregation::{QuotationFilter, StatusFilter},
        endpoints,
        quotation::{
            Quotation, QuotationFields, Source, Status, create_quotation_table, delete_quotation,
            get_quotations_table, insert_quotation, quotations_list_view,
        },
        test_utils::{assert_status_ok, assert_valid_html, parse_html_fragment},
    };

    use super::QuotationsTableState;

    fn quotation(id: i64, client: &str, status: Status, remarks: Option<&str>) -> Quotation {
        Quotation {
            id,
            sl_number: 400 + id,
            date: date!(2024 - 03 - 01),
            time_in: datetime!(2024-03-01 09:30),
            client: client.to_owned(),
            item: "Widget".to_owned(),
            source: Source::GoogleAds,
            status,
            remarks: remarks.map(str::to_owned),
            quote_number: None,
            quoted_date: None,
        }
    }

    fn render(quotations: &[Quotation], filter: &QuotationFilter, total_count: usize) -> Html {
        let markup = quotations_list_view(quotations, filter, total_count).into_string();

        Html::parse_fragment(&markup)
    }

    fn rows(html: &Html) -> Vec<ElementRef<'_>> {
        html.select(&Selector::parse("tbody tr[id]").unwrap())
            .collect()
    }

    fn empty_message(html: &Html) -> String {
        html.select(&Selector::parse("tbody td[colspan]").unwrap())
            .next()
            .expect("No empty message")
            .text()
            .collect::<String>()
    }

    #[test]
    fn empty_store_invites_first_quotation() {
        let html = render(&[], &QuotationFilter::default(), 0);

        assert_valid_html(&html);
        assert!(rows(&html).is_empty());
        assert_eq!(
            empty_message(&html).trim(),
            "No quotations yet. Create your first one!"
        );
    }

    #[test]
    fn filters_that_exclude_everything_say_so() {
        let filter = QuotationFilter {
            search: "zzz".to_owned(),
            status: StatusFilter::All,
        };

        let html = render(&[], &filter, 3);

        assert_eq!(
            empty_message(&html).trim(),
            "No quotations found matching your filters"
        );
    }

    #[test]
    fn rows_show_badges_and_remarks_placeholder() {
        let quotations = vec![
            quotation(1, "Acme", Status::Confirmed, None),
            quotation(2, "Bolt Co", Status::Unknown("approved".to_owned()), None),
        ];

        let html = render(&quotations, &QuotationFilter::default(), 2);

        assert_valid_html(&html);
        let rows = rows(&html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value().attr("id"), Some("quotation-1"));
        let first_row = rows[0].text().collect::<String>();
        assert!(first_row.contains("01 Mar 2024"));
        assert!(first_row.contains("09:30"));
        assert!(first_row.contains("google ads"));
        assert!(first_row.contains("confirmed"));
        assert!(rows[1].text().collect::<String>().contains("approved"));

        let remarks_cell = rows[0]
            .select(&Selector::parse("td").unwrap())
            .nth(8)
            .expect("No remarks cell");
        assert_eq!(remarks_cell.text().collect::<String>().trim(), "-");
    }

    #[test]
    fn long_remarks_are_truncated_with_full_text_in_tooltip() {
        let remarks = "Customer wants delivery before the end of the month, call first";
        let quotations = vec![quotation(1, "Acme", Status::Pending, Some(remarks))];

        let html = render(&quotations, &QuotationFilter::default(), 1);

        let span = html
            .select(&Selector::parse("td span[title]").unwrap())
            .next()
            .expect("No remarks tooltip");
        assert_eq!(span.value().attr("title"), Some(remarks));
        assert_eq!(
            span.text().collect::<String>().trim(),
            "Customer wants delivery before…"
        );
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let quotations = vec![quotation(5, "Acme", Status::Pending, None)];

        let html = render(&quotations, &QuotationFilter::default(), 1);

        let button = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("No delete button");
        assert_eq!(
            button.value().attr("hx-delete"),
            Some(endpoints::format_endpoint(endpoints::DELETE_QUOTATION, 5).as_str())
        );
        assert_eq!(
            button.value().attr("hx-confirm"),
            Some("Are you sure you want to delete this quotation?")
        );
    }

    #[test]
    fn export_links_carry_the_filter() {
        let filter = QuotationFilter {
            search: "acme co".to_owned(),
            status: StatusFilter::Only(Status::Pending),
        };

        let html = render(&[], &filter, 1);

        let hrefs = html
            .select(&Selector::parse("a[download]").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(
            hrefs,
            vec![
                "/quotations/export/csv?search=acme+co&status=pending",
                "/quotations/export/pdf?search=acme+co&status=pending",
            ]
        );
    }

    #[test]
    fn filter_form_keeps_current_values() {
        let filter = QuotationFilter {
            search: "widget".to_owned(),
            status: StatusFilter::Only(Status::Hold),
        };

        let html = render(&[], &filter, 1);

        let search = html
            .select(&Selector::parse("input[name='search']").unwrap())
            .next()
            .expect("No search input");
        assert_eq!(search.value().attr("value"), Some("widget"));
        let selected = html
            .select(&Selector::parse("select[name='status'] option[selected]").unwrap())
            .next()
            .expect("No selected status");
        assert_eq!(selected.value().attr("value"), Some("hold"));
        let options = html
            .select(&Selector::parse("select[name='status'] option").unwrap())
            .count();
        assert_eq!(options, Status::ALL.len() + 1);
    }

    #[tokio::test]
    async fn table_endpoint_filters_and_omits_deleted_rows() {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_quotation_table(&connection).expect("Could not create quotation table");
        let mut ids = Vec::new();
        for (client, status) in [
            ("Acme", Status::Pending),
            ("ACME Labs", Status::Confirmed),
            ("Bolt Co", Status::Pending),
        ] {
            let inserted = insert_quotation(
                QuotationFields {
                    sl_number: 1,
                    date: date!(2024 - 03 - 01),
                    time_in: datetime!(2024-03-01 09:30),
                    client: client.to_owned(),
                    item: "Widget".to_owned(),
                    source: Source::Other,
                    status,
                    remarks: None,
                    quote_number: None,
                    quoted_date: None,
                },
                &connection,
            )
            .expect("Could not insert quotation");
            ids.push(inserted.id);
        }
        delete_quotation(ids[0], &connection).expect("Could not delete quotation");
        let state = QuotationsTableState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let filter = QuotationFilter {
            search: "acme".to_owned(),
            status: StatusFilter::All,
        };

        let response = get_quotations_table(State(state), Query(filter))
            .await
            .expect("Could not render table");

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let row_ids = rows(&html)
            .iter()
            .filter_map(|row| row.value().attr("id"))
            .map(str::to_owned)
            .collect::<Vec<_>>();
        assert_eq!(row_ids, vec![format!("quotation-{}", ids[1])]);
    }
}
