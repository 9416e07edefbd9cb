//! The quotation form shared by the create and edit pages, and validation of its submissions.

use maud::{Markup, html};
use serde::Deserialize;
use time::{
    Date, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    Error,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    quotation::{Quotation, QuotationFields, Source, Status},
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DATE_TIME_WITH_SECONDS_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// The raw form data for creating or updating a quotation.
///
/// Every field is text so that invalid input can be reported back to the
/// user instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuotationForm {
    pub sl_number: String,
    pub date: String,
    pub time_in: String,
    pub source: String,
    pub client: String,
    pub status: String,
    pub item: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub quote_number: String,
    #[serde(default)]
    pub quoted_date: String,
}

impl QuotationForm {
    /// Prefill the form with an existing quotation.
    pub fn from_quotation(quotation: &Quotation) -> Self {
        Self {
            sl_number: quotation.sl_number.to_string(),
            date: format_date_input(quotation.date),
            time_in: format_date_time_input(quotation.time_in),
            source: quotation.source.as_str().to_owned(),
            client: quotation.client.clone(),
            status: quotation.status.as_str().to_owned(),
            item: quotation.item.clone(),
            remarks: quotation.remarks.clone().unwrap_or_default(),
            quote_number: quotation.quote_number.clone().unwrap_or_default(),
            quoted_date: quotation
                .quoted_date
                .map(format_date_input)
                .unwrap_or_default(),
        }
    }

    /// An empty form with the date and intake time set to `now`.
    pub fn starting_at(now: PrimitiveDateTime) -> Self {
        Self {
            date: format_date_input(now.date()),
            time_in: format_date_time_input(now),
            source: Source::GoogleAds.as_str().to_owned(),
            status: Status::Pending.as_str().to_owned(),
            ..Default::default()
        }
    }

    /// Check the submitted values and convert them into quotation fields.
    ///
    /// # Errors
    /// Returns the first validation error found, checking fields in form order.
    pub fn validate(&self) -> Result<QuotationFields, Error> {
        let sl_number = self
            .sl_number
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidSerialNumber(self.sl_number.clone()))?;
        let date = parse_date("date", &self.date)?;
        let time_in = parse_date_time(&self.time_in)?;
        let source = Source::parse(self.source.trim())?;
        let client = required_text("Client name", &self.client)?;
        let status = Status::parse(self.status.trim())?;
        let item = required_text("Item", &self.item)?;
        let quoted_date = match optional_text(&self.quoted_date) {
            Some(text) => Some(parse_date("quoted date", &text)?),
            None => None,
        };

        Ok(QuotationFields {
            sl_number,
            date,
            time_in,
            client,
            item,
            source,
            status,
            remarks: optional_text(&self.remarks),
            quote_number: optional_text(&self.quote_number),
            quoted_date,
        })
    }
}

fn parse_date(field_name: &'static str, text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(field_name, text.to_owned()))
}

fn parse_date_time(text: &str) -> Result<PrimitiveDateTime, Error> {
    let text = text.trim();

    PrimitiveDateTime::parse(text, DATE_TIME_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, DATE_TIME_WITH_SECONDS_FORMAT))
        .map_err(|_| Error::InvalidDateTime(text.to_owned()))
}

fn required_text(field_name: &'static str, text: &str) -> Result<String, Error> {
    optional_text(text).ok_or(Error::EmptyField(field_name))
}

fn optional_text(text: &str) -> Option<String> {
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

fn format_date_input(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

fn format_date_time_input(date_time: PrimitiveDateTime) -> String {
    date_time.format(DATE_TIME_FORMAT).unwrap_or_default()
}

/// How the form is submitted.
pub enum FormAction<'a> {
    Create { endpoint: &'a str },
    Update { endpoint: &'a str },
}

/// Render the quotation form with `values` filled in.
pub fn quotation_form_view(action: FormAction, values: &QuotationForm) -> Markup {
    let (hx_post, hx_put, submit_text) = match action {
        FormAction::Create { endpoint } => (Some(endpoint), None, "Create Quotation"),
        FormAction::Update { endpoint } => (None, Some(endpoint), "Update Quotation"),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                div
                {
                    label for="sl_number" class=(FORM_LABEL_STYLE) { "SL Number" }

                    input
                        id="sl_number"
                        type="number"
                        name="sl_number"
                        step="1"
                        placeholder="e.g. 400"
                        value=(values.sl_number)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        id="date"
                        type="date"
                        name="date"
                        value=(values.date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="time_in" class=(FORM_LABEL_STYLE) { "Time In" }

                    input
                        id="time_in"
                        type="datetime-local"
                        name="time_in"
                        value=(values.time_in)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="source" class=(FORM_LABEL_STYLE) { "Source" }

                    select id="source" name="source" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @if Source::parse(&values.source).is_err() {
                            (legacy_option(&values.source))
                        }

                        @for source in Source::ALL {
                            option
                                value=(source.as_str())
                                selected[source.as_str() == values.source]
                            {
                                (source.label())
                            }
                        }
                    }
                }

                div
                {
                    label for="client" class=(FORM_LABEL_STYLE) { "Client Name" }

                    input
                        id="client"
                        type="text"
                        name="client"
                        placeholder="Client Name"
                        value=(values.client)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                    select id="status" name="status" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @if Status::parse(&values.status).is_err() {
                            (legacy_option(&values.status))
                        }

                        @for status in Status::ALL {
                            option
                                value=(status.as_str())
                                selected[status.as_str() == values.status]
                            {
                                (status.label())
                            }
                        }
                    }
                }

                div class="md:col-span-2"
                {
                    label for="item" class=(FORM_LABEL_STYLE) { "Item/Product" }

                    input
                        id="item"
                        type="text"
                        name="item"
                        placeholder="Item or product description"
                        value=(values.item)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="quote_number" class=(FORM_LABEL_STYLE) { "Quote Number" }

                    input
                        id="quote_number"
                        type="text"
                        name="quote_number"
                        placeholder="Optional"
                        value=(values.quote_number)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="quoted_date" class=(FORM_LABEL_STYLE) { "Quoted Date" }

                    input
                        id="quoted_date"
                        type="date"
                        name="quoted_date"
                        value=(values.quoted_date)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="md:col-span-2"
                {
                    label for="remarks" class=(FORM_LABEL_STYLE) { "Remarks" }

                    textarea
                        id="remarks"
                        name="remarks"
                        rows="3"
                        placeholder="Any additional notes"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        (values.remarks)
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}

/// Keeps a stored value that is no longer offered selected, so saving the form
/// is rejected instead of quietly replacing it with the first option.
fn legacy_option(value: &str) -> Markup {
    html! {
        option value=(value) selected { (value) " (no longer offered)" }
    }
}
