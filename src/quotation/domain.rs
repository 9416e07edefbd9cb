//! The quotation record and its closed enumerations.

use std::fmt::Display;

use time::{Date, PrimitiveDateTime};

use crate::Error;

/// The store assigned ID of a quotation.
pub type QuotationId = i64;

/// The channel through which a quotation inquiry arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// Found the business through a Google Ads campaign.
    GoogleAds,
    /// Sent a WhatsApp message.
    Whatsapp,
    /// Sent an email.
    Mail,
    /// Any other channel, e.g. a phone call or walk-in.
    Other,
    /// A stored value that is not one of the known channels.
    Unknown(String),
}

impl Source {
    /// The selectable sources, in the order they are offered in forms.
    pub const ALL: [Source; 4] = [Source::GoogleAds, Source::Whatsapp, Source::Mail, Source::Other];

    /// The value as stored in the database and written to exports.
    pub fn as_str(&self) -> &str {
        match self {
            Source::GoogleAds => "google_ads",
            Source::Whatsapp => "whatsapp",
            Source::Mail => "mail",
            Source::Other => "other",
            Source::Unknown(raw) => raw,
        }
    }

    /// The label shown in form select options.
    pub fn label(&self) -> &str {
        match self {
            Source::GoogleAds => "Google Ads",
            Source::Whatsapp => "WhatsApp",
            Source::Mail => "Email",
            Source::Other => "Other",
            Source::Unknown(raw) => raw,
        }
    }

    /// Parse a submitted form value. Only the known channels are accepted.
    ///
    /// # Errors
    /// Returns [Error::InvalidSource] for any other string.
    pub fn parse(text: &str) -> Result<Self, Error> {
        match Self::from_stored(text) {
            Source::Unknown(raw) => Err(Error::InvalidSource(raw)),
            source => Ok(source),
        }
    }

    /// Convert a stored value, falling back to [Source::Unknown].
    pub fn from_stored(text: &str) -> Self {
        match text {
            "google_ads" => Source::GoogleAds,
            "whatsapp" => Source::Whatsapp,
            "mail" => Source::Mail,
            "other" => Source::Other,
            raw => Source::Unknown(raw.to_owned()),
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a quotation is in the sales process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// Received but not yet priced.
    Pending,
    /// A quote has been sent to the client.
    Quoted,
    /// The client accepted the quote.
    Confirmed,
    /// Paused, waiting on the client or a supplier.
    Hold,
    /// The order has been delivered.
    Delivered,
    /// The inquiry will not go ahead.
    Cancelled,
    /// A stored value that is not one of the known statuses, e.g. "approved".
    Unknown(String),
}

impl Status {
    /// The selectable statuses for the create form, the edit form and the list filter.
    pub const ALL: [Status; 6] = [
        Status::Pending,
        Status::Quoted,
        Status::Confirmed,
        Status::Hold,
        Status::Delivered,
        Status::Cancelled,
    ];

    /// The value as stored in the database and written to exports.
    pub fn as_str(&self) -> &str {
        match self {
            Status::Pending => "pending",
            Status::Quoted => "quoted",
            Status::Confirmed => "confirmed",
            Status::Hold => "hold",
            Status::Delivered => "delivered",
            Status::Cancelled => "cancelled",
            Status::Unknown(raw) => raw,
        }
    }

    /// The label shown in form select options.
    pub fn label(&self) -> &str {
        match self {
            Status::Pending => "Pending",
            Status::Quoted => "Quoted",
            Status::Confirmed => "Confirmed",
            Status::Hold => "Hold",
            Status::Delivered => "Delivered",
            Status::Cancelled => "Cancelled",
            Status::Unknown(raw) => raw,
        }
    }

    /// Parse a submitted form value. Only the known statuses are accepted.
    ///
    /// # Errors
    /// Returns [Error::InvalidStatus] for any other string.
    pub fn parse(text: &str) -> Result<Self, Error> {
        match Self::from_stored(text) {
            Status::Unknown(raw) => Err(Error::InvalidStatus(raw)),
            status => Ok(status),
        }
    }

    /// Convert a stored value, falling back to [Status::Unknown].
    pub fn from_stored(text: &str) -> Self {
        match text {
            "pending" => Status::Pending,
            "quoted" => Status::Quoted,
            "confirmed" => Status::Confirmed,
            "hold" => Status::Hold,
            "delivered" => Status::Delivered,
            "cancelled" => Status::Cancelled,
            raw => Status::Unknown(raw.to_owned()),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked sales inquiry.
#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    /// The ID assigned when the quotation was stored.
    pub id: QuotationId,
    /// User assigned serial label, not unique.
    pub sl_number: i64,
    /// The day the inquiry was logged.
    pub date: Date,
    /// When the inquiry came in. Independent of `date`.
    pub time_in: PrimitiveDateTime,
    /// Who asked for the quote.
    pub client: String,
    /// What was asked for.
    pub item: String,
    /// How the inquiry arrived.
    pub source: Source,
    /// Where the quotation is in the sales process.
    pub status: Status,
    /// Free-form notes.
    pub remarks: Option<String>,
    /// The reference of the quote sent to the client.
    pub quote_number: Option<String>,
    /// When the quote was sent.
    pub quoted_date: Option<Date>,
}

/// Every field of a [Quotation] except its ID, used to insert or overwrite a record.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationFields {
    /// User assigned serial label, not unique.
    pub sl_number: i64,
    /// The day the inquiry was logged.
    pub date: Date,
    /// When the inquiry came in.
    pub time_in: PrimitiveDateTime,
    /// Who asked for the quote.
    pub client: String,
    /// What was asked for.
    pub item: String,
    /// How the inquiry arrived.
    pub source: Source,
    /// Where the quotation is in the sales process.
    pub status: Status,
    /// Free-form notes.
    pub remarks: Option<String>,
    /// The reference of the quote sent to the client.
    pub quote_number: Option<String>,
    /// When the quote was sent.
    pub quoted_date: Option<Date>,
}

impl QuotationFields {
    /// Attach the store assigned `id`.
    pub fn into_quotation(self, id: QuotationId) -> Quotation {
        Quotation {
            id,
            sl_number: self.sl_number,
            date: self.date,
            time_in: self.time_in,
            client: self.client,
            item: self.item,
            source: self.source,
            status: self.status,
            remarks: self.remarks,
            quote_number: self.quote_number,
            quoted_date: self.quoted_date,
        }
    }
}
