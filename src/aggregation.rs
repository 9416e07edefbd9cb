//! Filtering and grouping of quotations for the list, the exports and the charts.
//!
//! Everything here is a pure function of the quotation list it is given. Inputs
//! are expected newest first (the order of [crate::quotation::get_all_quotations])
//! and no function re-sorts them, so "first encountered" means "most recent".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Month;

use crate::quotation::{Quotation, Status};

/// How many clients the analytics page ranks.
pub const TOP_CLIENT_COUNT: usize = 5;

/// Restricts a list to a single status, or lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    /// Every status.
    All,
    /// Quotations with exactly this status.
    Only(Status),
}

impl From<String> for StatusFilter {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" | "all" => StatusFilter::All,
            status => StatusFilter::Only(Status::from_stored(status)),
        }
    }
}

impl From<StatusFilter> for String {
    fn from(value: StatusFilter) -> Self {
        match value {
            StatusFilter::All => "all".to_owned(),
            StatusFilter::Only(status) => status.as_str().to_owned(),
        }
    }
}

impl StatusFilter {
    /// The value used in query strings and select options.
    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

/// The search box and status selector of the quotations list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuotationFilter {
    /// Case-insensitive text matched against client, item and SL number.
    pub search: String,
    /// Which statuses to keep.
    pub status: StatusFilter,
}

impl QuotationFilter {
    /// Whether `quotation` passes both the text search and the status filter.
    pub fn matches(&self, quotation: &Quotation) -> bool {
        self.matches_search(quotation) && self.matches_status(quotation)
    }

    fn matches_search(&self, quotation: &Quotation) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let term = self.search.to_lowercase();

        quotation.client.to_lowercase().contains(&term)
            || quotation.item.to_lowercase().contains(&term)
            || quotation.sl_number.to_string().contains(&term)
    }

    fn matches_status(&self, quotation: &Quotation) -> bool {
        match &self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => &quotation.status == status,
        }
    }

    /// The filter encoded as a query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }
}

/// Keep the quotations that match `filter`, preserving their order.
pub fn filter_quotations(quotations: Vec<Quotation>, filter: &QuotationFilter) -> Vec<Quotation> {
    quotations
        .into_iter()
        .filter(|quotation| filter.matches(quotation))
        .collect()
}

/// A display label and how many quotations fall under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    /// Display label of the group.
    pub label: String,
    /// How many quotations fall in the group.
    pub count: usize,
}

/// Count occurrences of each key, keeping keys in the order they first appear.
fn count_in_order(keys: impl IntoIterator<Item = String>) -> Vec<GroupCount> {
    let mut groups: Vec<GroupCount> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    for key in keys {
        match index_of.get(&key) {
            Some(&index) => groups[index].count += 1,
            None => {
                index_of.insert(key.clone(), groups.len());
                groups.push(GroupCount {
                    label: key,
                    count: 1,
                });
            }
        }
    }

    groups
}

/// Count quotations per status that occurs in the data, e.g. "Pending".
pub fn group_by_status(quotations: &[Quotation]) -> Vec<GroupCount> {
    count_in_order(
        quotations
            .iter()
            .map(|quotation| capitalize_first(quotation.status.as_str())),
    )
}

/// Count quotations per source that occurs in the data, e.g. "Google ads".
pub fn group_by_source(quotations: &[Quotation]) -> Vec<GroupCount> {
    count_in_order(
        quotations
            .iter()
            .map(|quotation| capitalize_first(&quotation.source.as_str().replace('_', " "))),
    )
}

/// Count quotations per calendar month name.
///
/// The year is ignored, so January 2023 and January 2024 share the "Jan" bucket.
pub fn monthly_trend(quotations: &[Quotation]) -> Vec<GroupCount> {
    count_in_order(
        quotations
            .iter()
            .map(|quotation| month_abbreviation(quotation.date.month()).to_owned()),
    )
}

/// The `limit` clients with the most quotations, most first.
///
/// Client names are compared exactly. Ties keep the order in which the
/// clients were first encountered.
pub fn top_clients(quotations: &[Quotation], limit: usize) -> Vec<GroupCount> {
    let mut clients = count_in_order(quotations.iter().map(|quotation| quotation.client.clone()));
    clients.sort_by(|a, b| b.count.cmp(&a.count));
    clients.truncate(limit);
    clients
}

/// The headline numbers on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    /// Number of quotations.
    pub total: usize,
    /// Quotations that are still pending.
    pub pending: usize,
    /// Quotations the client confirmed.
    pub confirmed: usize,
    /// Confirmed as a percentage of all quotations, rounded to the nearest whole number.
    pub conversion_rate: u32,
}

impl DashboardStats {
    /// Count `quotations`. The conversion rate of nothing is 0.
    pub fn from_quotations(quotations: &[Quotation]) -> Self {
        let total = quotations.len();
        let count_status = |status: Status| {
            quotations
                .iter()
                .filter(|quotation| quotation.status == status)
                .count()
        };
        let pending = count_status(Status::Pending);
        let confirmed = count_status(Status::Confirmed);

        let conversion_rate = if total == 0 {
            0
        } else {
            (confirmed as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            total,
            pending,
            confirmed,
            conversion_rate,
        }
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Three-letter English month name, e.g. "Jan".
pub fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod aggregation_test_utils {
    use time::{Date, macros::datetime};

    use crate::quotation::{Quotation, Source, Status};

    pub(super) fn quotation(
        id: i64,
        date: Date,
        client: &str,
        source: Source,
        status: Status,
    ) -> Quotation {
        Quotation {
            id,
            sl_number: 400 + id,
            date,
            time_in: datetime!(2024-01-01 09:00),
            client: client.to_owned(),
            item: format!("Item {id}"),
            source,
            status,
            remarks: None,
            quote_number: None,
            quoted_date: None,
        }
    }
}
