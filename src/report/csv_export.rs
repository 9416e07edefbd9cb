//! CSV rendering of export rows.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{
    Error,
    report::row::{EXPORT_HEADERS, ExportRow, format_export_date},
};

/// Render `rows` as CSV bytes.
///
/// Client, item and remarks are wrapped in double quotes with inner quotes
/// doubled. Every other column is written as is, so the writer is told never
/// to add quotes of its own.
///
/// # Errors
/// Returns [Error::CsvExportError] if the writer fails.
pub fn render_csv(rows: &[ExportRow]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;

    for row in rows {
        writer.write_record(csv_fields(row))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExportError(error.to_string()))
}

fn csv_fields(row: &ExportRow) -> [String; 9] {
    [
        row.sl_number.to_string(),
        format_export_date(row.date),
        quote(&row.client),
        quote(&row.item),
        row.source.clone(),
        row.status.clone(),
        row.quote_number.clone().unwrap_or_default(),
        row.quoted_date.map(format_export_date).unwrap_or_default(),
        row.remarks
            .as_deref()
            .filter(|remarks| !remarks.is_empty())
            .map(quote)
            .unwrap_or_default(),
    ]
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod csv_export_tests {
    use time::macros::date;

    use crate::report::{csv_export::render_csv, row::ExportRow};

    fn row() -> ExportRow {
        ExportRow {
            sl_number: 400,
            date: date!(2024 - 03 - 01),
            client: "A \"B\"".to_owned(),
            item: "Widget".to_owned(),
            source: "google_ads".to_owned(),
            status: "pending".to_owned(),
            quote_number: None,
            quoted_date: None,
            remarks: None,
        }
    }

    fn render_lines(rows: &[ExportRow]) -> Vec<String> {
        let bytes = render_csv(rows).expect("Could not render CSV");
        let text = String::from_utf8(bytes).expect("CSV should be valid UTF-8");

        text.lines().map(str::to_owned).collect()
    }

    #[test]
    fn header_and_row_match_expected_text() {
        let lines = render_lines(&[row()]);

        assert_eq!(
            lines,
            vec![
                "SL #,Date,Client,Item,Source,Status,Quote #,Quoted Date,Remarks",
                "400,01 Mar 2024,\"A \"\"B\"\"\",\"Widget\",google_ads,pending,,,",
            ]
        );
    }

    #[test]
    fn optional_values_are_written_when_present() {
        let row = ExportRow {
            quote_number: Some("Q-9".to_owned()),
            quoted_date: Some(date!(2024 - 03 - 04)),
            remarks: Some("Needs \"rush\", call first".to_owned()),
            ..row()
        };

        let lines = render_lines(&[row]);

        assert_eq!(
            lines[1],
            "400,01 Mar 2024,\"A \"\"B\"\"\",\"Widget\",google_ads,pending,Q-9,04 Mar 2024,\
            \"Needs \"\"rush\"\", call first\""
        );
    }

    #[test]
    fn no_rows_writes_only_header() {
        let bytes = render_csv(&[]).unwrap();

        assert_eq!(
            bytes,
            b"SL #,Date,Client,Item,Source,Status,Quote #,Quoted Date,Remarks\n"
        );
    }
}
