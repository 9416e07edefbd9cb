//! The projection of a quotation that both report formats render.

use time::{
    Date, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::quotation::Quotation;

/// Column titles shared by the CSV header and the PDF table header.
pub const EXPORT_HEADERS: [&str; 9] = [
    "SL #",
    "Date",
    "Client",
    "Item",
    "Source",
    "Status",
    "Quote #",
    "Quoted Date",
    "Remarks",
];

const EXPORT_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[day] [month repr:short] [year]");
const GENERATED_AT_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[day] [month repr:short] [year], [hour]:[minute]");
const FILENAME_TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");

/// The quotation fields that appear in exports, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// Serial label of the quotation.
    pub sl_number: i64,
    /// The day the inquiry was logged.
    pub date: Date,
    /// Who asked for the quote.
    pub client: String,
    /// What was asked for.
    pub item: String,
    /// Stored source value, e.g. "google_ads".
    pub source: String,
    /// Stored status value, e.g. "pending".
    pub status: String,
    /// The reference of the quote sent to the client.
    pub quote_number: Option<String>,
    /// When the quote was sent.
    pub quoted_date: Option<Date>,
    /// Free-form notes.
    pub remarks: Option<String>,
}

impl From<&Quotation> for ExportRow {
    fn from(quotation: &Quotation) -> Self {
        Self {
            sl_number: quotation.sl_number,
            date: quotation.date,
            client: quotation.client.clone(),
            item: quotation.item.clone(),
            source: quotation.source.as_str().to_owned(),
            status: quotation.status.as_str().to_owned(),
            quote_number: quotation.quote_number.clone(),
            quoted_date: quotation.quoted_date,
            remarks: quotation.remarks.clone(),
        }
    }
}

impl ExportRow {
    /// The cells of the row as displayed text, with `missing` standing in for absent values.
    pub fn display_cells(&self, missing: &str) -> [String; 9] {
        let or_missing = |value: Option<String>| value.unwrap_or_else(|| missing.to_owned());

        [
            self.sl_number.to_string(),
            format_export_date(self.date),
            self.client.clone(),
            self.item.clone(),
            self.source.clone(),
            self.status.clone(),
            or_missing(self.quote_number.clone().filter(|text| !text.is_empty())),
            or_missing(self.quoted_date.map(format_export_date)),
            or_missing(self.remarks.clone().filter(|text| !text.is_empty())),
        ]
    }
}

/// Format a date like "01 Mar 2024".
pub fn format_export_date(date: Date) -> String {
    date.format(EXPORT_DATE_FORMAT).unwrap_or_default()
}

/// Format a timestamp like "01 Mar 2024, 09:30".
pub fn format_generated_at(now: PrimitiveDateTime) -> String {
    now.format(GENERATED_AT_FORMAT).unwrap_or_default()
}

/// The download name for an export made at `now`, e.g. "quotations_2024-03-01_09-30-00.csv".
pub fn export_filename(base: &str, now: PrimitiveDateTime, extension: &str) -> String {
    let timestamp = now.format(FILENAME_TIMESTAMP_FORMAT).unwrap_or_default();

    format!("{base}_{timestamp}.{extension}")
}
