//! Tabular PDF rendering of export rows.
//!
//! The document uses the standard Helvetica fonts, so no font files are
//! embedded. Layout is done in millimetres from the top-left corner of the
//! page and converted to PDF points (bottom-left origin) when drawing.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use time::PrimitiveDateTime;

use crate::report::row::{EXPORT_HEADERS, ExportRow, format_generated_at};

/// The heading at the top of the first page and the document title.
pub const REPORT_TITLE: &str = "Quotation Tracker Report";

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Placeholder for absent optional values.
const MISSING_VALUE: &str = "-";

/// Page geometry and table styling for the PDF report.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    /// Page width; the default is A4 landscape.
    pub page_width_mm: f32,
    /// Page height; the table breaks onto a new page before the bottom margin.
    pub page_height_mm: f32,
    /// Left edge of all text and the table, and the top and bottom margin of table pages.
    pub margin_mm: f32,
    /// Font size of the report title, in points.
    pub title_font_size: f32,
    /// Baseline of the title, from the top of the page.
    pub title_y_mm: f32,
    /// Font size of the "Generated:" and "Total Records:" lines.
    pub meta_font_size: f32,
    /// Baseline of the "Generated:" line.
    pub generated_y_mm: f32,
    /// Baseline of the "Total Records:" line.
    pub total_y_mm: f32,
    /// Top of the table on the first page.
    pub table_top_mm: f32,
    /// Font size of header and body cells.
    pub table_font_size: f32,
    /// Space between a cell border and its text, on every side.
    pub cell_padding_mm: f32,
    /// Line spacing as a multiple of the font size.
    pub line_height_factor: f32,
    /// RGB fill of the header row.
    pub header_fill: [u8; 3],
    /// RGB colour of the header text.
    pub header_text: [u8; 3],
    /// RGB fill of every second body row.
    pub alternate_row_fill: [u8; 3],
    /// Widths of the nine export columns, in header order.
    pub column_widths_mm: [f32; 9],
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            // A4 landscape
            page_width_mm: 297.0,
            page_height_mm: 210.0,
            margin_mm: 14.0,
            title_font_size: 18.0,
            title_y_mm: 15.0,
            meta_font_size: 10.0,
            generated_y_mm: 22.0,
            total_y_mm: 27.0,
            table_top_mm: 32.0,
            table_font_size: 8.0,
            cell_padding_mm: 2.0,
            line_height_factor: 1.15,
            header_fill: [59, 130, 246],
            header_text: [255, 255, 255],
            alternate_row_fill: [245, 247, 250],
            column_widths_mm: [12.0, 25.0, 40.0, 45.0, 20.0, 20.0, 25.0, 25.0, 45.0],
        }
    }
}

impl PdfLayout {
    fn line_height_mm(&self) -> f32 {
        self.table_font_size * self.line_height_factor / POINTS_PER_MM
    }

    fn row_height_mm(&self, line_count: usize) -> f32 {
        line_count.max(1) as f32 * self.line_height_mm() + 2.0 * self.cell_padding_mm
    }

    /// How many lines of table text fit in a row of height `available_mm`.
    fn lines_that_fit(&self, available_mm: f32) -> usize {
        let text_height = available_mm - 2.0 * self.cell_padding_mm;

        if text_height <= 0.0 {
            0
        } else {
            (text_height / self.line_height_mm()).floor() as usize
        }
    }

    fn text_width_mm(&self, column: usize) -> f32 {
        (self.column_widths_mm[column] - 2.0 * self.cell_padding_mm).max(0.0)
    }
}

/// Render `rows` as a PDF document generated at `now`.
pub fn render_pdf(rows: &[ExportRow], now: PrimitiveDateTime, layout: &PdfLayout) -> Vec<u8> {
    let mut pages = Vec::new();
    let mut page = PageCanvas::new(layout);

    page.text(
        REPORT_TITLE,
        REGULAR_FONT,
        layout.title_font_size,
        layout.margin_mm,
        layout.title_y_mm,
    );
    page.text(
        &format!("Generated: {}", format_generated_at(now)),
        REGULAR_FONT,
        layout.meta_font_size,
        layout.margin_mm,
        layout.generated_y_mm,
    );
    page.text(
        &format!("Total Records: {}", rows.len()),
        REGULAR_FONT,
        layout.meta_font_size,
        layout.margin_mm,
        layout.total_y_mm,
    );

    let header_cells = wrap_row(&EXPORT_HEADERS, layout);
    let page_bottom_mm = layout.page_height_mm - layout.margin_mm;
    // Room for body rows on a continuation page, below the repeated header.
    let fresh_page_room_mm = page_bottom_mm
        - layout.margin_mm
        - layout.row_height_mm(max_line_count(&header_cells));

    let mut cursor_mm = layout.table_top_mm;
    cursor_mm += page.header_row(&header_cells, cursor_mm);
    let mut page_has_rows = false;

    for (index, row) in rows.iter().enumerate() {
        let fill = (index % 2 == 1).then_some(layout.alternate_row_fill);
        let mut cells = wrap_row(&row.display_cells(MISSING_VALUE), layout);

        loop {
            let height = layout.row_height_mm(max_line_count(&cells));

            if cursor_mm + height <= page_bottom_mm {
                page.body_row(&cells, cursor_mm, height, fill);
                cursor_mm += height;
                page_has_rows = true;
                break;
            }

            // Rows that fit on a page of their own are moved whole, taller
            // rows are split and continue under the header on the next page.
            if !page_has_rows || height > fresh_page_room_mm {
                let mut fit = layout.lines_that_fit(page_bottom_mm - cursor_mm);

                if fit == 0 && !page_has_rows {
                    fit = 1;
                }

                if fit > 0 {
                    let rest = split_off_lines(&mut cells, fit);
                    let height = layout.row_height_mm(fit);
                    page.body_row(&cells, cursor_mm, height, fill);

                    if rest.iter().all(Vec::is_empty) {
                        cursor_mm += height;
                        page_has_rows = true;
                        break;
                    }

                    cells = rest;
                }
            }

            pages.push(std::mem::replace(&mut page, PageCanvas::new(layout)).finish());
            cursor_mm = layout.margin_mm;
            cursor_mm += page.header_row(&header_cells, cursor_mm);
            page_has_rows = false;
        }
    }

    pages.push(page.finish());

    assemble_document(pages, layout)
}

/// Write the catalog, page tree, fonts and page streams around the drawn pages.
fn assemble_document(pages: Vec<Vec<u8>>, layout: &PdfLayout) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_ref = Ref::new(1);
    let catalog_id = next_ref.bump();
    let page_tree_id = next_ref.bump();
    let regular_font_id = next_ref.bump();
    let bold_font_id = next_ref.bump();
    let info_id = next_ref.bump();
    let page_ids: Vec<(Ref, Ref)> = pages
        .iter()
        .map(|_| (next_ref.bump(), next_ref.bump()))
        .collect();

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    let media_box = Rect::new(
        0.0,
        0.0,
        layout.page_width_mm * POINTS_PER_MM,
        layout.page_height_mm * POINTS_PER_MM,
    );

    for ((page_id, content_id), content) in page_ids.into_iter().zip(pages) {
        {
            // The page dictionary is written out when `page` is dropped.
            let mut page = pdf.page(page_id);
            page.media_box(media_box);
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources()
                .fonts()
                .pair(REGULAR_FONT, regular_font_id)
                .pair(BOLD_FONT, bold_font_id);
        }

        pdf.stream(content_id, &content);
    }

    pdf.type1_font(regular_font_id)
        .base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_font_id)
        .base_font(Name(b"Helvetica-Bold"));
    pdf.document_info(info_id)
        .title(TextStr(REPORT_TITLE))
        .creator(TextStr("Quotation Tracker"));

    pdf.finish()
}

/// Drawing operations for a single page, positioned in millimetres from the top left.
struct PageCanvas<'a> {
    layout: &'a PdfLayout,
    content: Content,
}

impl<'a> PageCanvas<'a> {
    fn new(layout: &'a PdfLayout) -> Self {
        Self {
            layout,
            content: Content::new(),
        }
    }

    fn finish(self) -> Vec<u8> {
        self.content.finish().to_vec()
    }

    fn to_x(&self, x_mm: f32) -> f32 {
        x_mm * POINTS_PER_MM
    }

    fn to_y(&self, y_mm: f32) -> f32 {
        (self.layout.page_height_mm - y_mm) * POINTS_PER_MM
    }

    /// Draw a single line of text with its baseline at `baseline_mm`.
    fn text(&mut self, text: &str, font: Name, size: f32, x_mm: f32, baseline_mm: f32) {
        let x = self.to_x(x_mm);
        let y = self.to_y(baseline_mm);
        let text = to_printable_ascii(text);

        self.content.begin_text();
        self.content.set_font(font, size);
        self.content.next_line(x, y);
        self.content.show(Str(text.as_bytes()));
        self.content.end_text();
    }

    fn fill_rect(&mut self, top_mm: f32, height_mm: f32, color: [u8; 3]) {
        let width_mm: f32 = self.layout.column_widths_mm.iter().sum();
        let x = self.to_x(self.layout.margin_mm);
        let y = self.to_y(top_mm + height_mm);

        self.content.save_state();
        self.set_fill(color);
        self.content
            .rect(x, y, width_mm * POINTS_PER_MM, height_mm * POINTS_PER_MM);
        self.content.fill_nonzero();
        self.content.restore_state();
    }

    fn set_fill(&mut self, [red, green, blue]: [u8; 3]) {
        self.content.set_fill_rgb(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
        );
    }

    /// Draw the header row at `top_mm` and return its height.
    fn header_row(&mut self, cells: &[Vec<String>], top_mm: f32) -> f32 {
        let height = self.layout.row_height_mm(max_line_count(cells));

        self.fill_rect(top_mm, height, self.layout.header_fill);
        self.content.save_state();
        self.set_fill(self.layout.header_text);
        self.cells(cells, top_mm, BOLD_FONT);
        self.content.restore_state();

        height
    }

    fn body_row(&mut self, cells: &[Vec<String>], top_mm: f32, height: f32, fill: Option<[u8; 3]>) {
        if let Some(fill) = fill {
            self.fill_rect(top_mm, height, fill);
        }

        self.content.save_state();
        self.set_fill([0, 0, 0]);
        self.cells(cells, top_mm, REGULAR_FONT);
        self.content.restore_state();
    }

    fn cells(&mut self, cells: &[Vec<String>], top_mm: f32, font: Name) {
        let size = self.layout.table_font_size;
        let line_height = self.layout.line_height_mm();
        let padding = self.layout.cell_padding_mm;
        // Baseline of the first line sits roughly one ascender below the padding.
        let first_baseline = top_mm + padding + size * 0.8 / POINTS_PER_MM;
        let mut left = self.layout.margin_mm;

        for (column, lines) in cells.iter().enumerate() {
            for (line_index, line) in lines.iter().enumerate() {
                let baseline = first_baseline + line_index as f32 * line_height;
                self.text(line, font, size, left + padding, baseline);
            }

            left += self.layout.column_widths_mm[column];
        }
    }
}

/// Keep the first `line_count` lines of every cell and return the rest.
fn split_off_lines(cells: &mut [Vec<String>], line_count: usize) -> Vec<Vec<String>> {
    cells
        .iter_mut()
        .map(|lines| lines.split_off(line_count.min(lines.len())))
        .collect()
}

fn max_line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(1)
}

/// Replace anything the standard fonts cannot show with `?`.
fn to_printable_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c,
            '\t' => ' ',
            _ => '?',
        })
        .collect()
}

/// Wrap each cell of a table row to the width of its column.
fn wrap_row<S: AsRef<str>>(cells: &[S], layout: &PdfLayout) -> Vec<Vec<String>> {
    cells
        .iter()
        .enumerate()
        .map(|(column, text)| {
            wrap_text(
                text.as_ref(),
                layout.text_width_mm(column),
                layout.table_font_size,
            )
        })
        .collect()
}

/// Break `text` into lines no wider than `max_width_mm` at `font_size`.
///
/// Lines break at whitespace where possible and inside words that are wider
/// than the column on their own. Explicit line breaks are kept.
fn wrap_text(text: &str, max_width_mm: f32, font_size: f32) -> Vec<String> {
    let max_width = max_width_mm * POINTS_PER_MM;
    let fits = |line: &str| text_width(line, font_size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = to_printable_ascii(paragraph.trim_end_matches('\r'));
        let mut line = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_owned()
            } else {
                format!("{line} {word}")
            };

            if fits(&candidate) {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }

            for c in word.chars() {
                line.push(c);

                if !fits(&line) && line.len() > 1 {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    line.push(c);
                }
            }
        }

        lines.push(line);
    }

    lines
}

/// Width of `text` in points when set in Helvetica at `font_size`.
fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.bytes().map(helvetica_width).sum();

    units as f32 * font_size / 1000.0
}

/// Advance width of a printable ASCII byte in Helvetica, in thousandths of an em.
fn helvetica_width(byte: u8) -> u32 {
    const WIDTHS: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 222, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
        222, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
    ];

    match byte {
        b' '..=b'~' => u32::from(WIDTHS[usize::from(byte - b' ')]),
        _ => 556,
    }
}

#[cfg(test)]
mod pdf_export_tests {
    use time::macros::{date, datetime};

    use crate::report::{
        pdf_export::{POINTS_PER_MM, PdfLayout, render_pdf, to_printable_ascii, wrap_text},
        row::ExportRow,
    };

    fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|window| *window == needle)
            .count()
    }

    #[track_caller]
    fn assert_contains(pdf: &[u8], needle: &str) {
        assert!(
            count_occurrences(pdf, needle.as_bytes()) > 0,
            "want PDF to contain {needle:?}"
        );
    }

    fn row(sl_number: i64) -> ExportRow {
        ExportRow {
            sl_number,
            date: date!(2024 - 03 - 01),
            client: "Acme".to_owned(),
            item: "Widget".to_owned(),
            source: "google_ads".to_owned(),
            status: "pending".to_owned(),
            quote_number: None,
            quoted_date: None,
            remarks: None,
        }
    }

    #[test]
    fn empty_report_has_title_and_zero_total() {
        let pdf = render_pdf(&[], datetime!(2024-03-01 09:30), &PdfLayout::default());

        assert!(pdf.starts_with(b"%PDF-"));
        assert_contains(&pdf, "(Quotation Tracker Report)");
        assert_contains(&pdf, "(Generated: 01 Mar 2024, 09:30)");
        assert_contains(&pdf, "(Total Records: 0)");
        assert_contains(&pdf, "(SL #)");
        assert_contains(&pdf, "/Count 1");
        assert_eq!(count_occurrences(&pdf, b"(Acme)"), 0);
    }

    #[test]
    fn missing_values_render_as_dash() {
        let pdf = render_pdf(&[row(400)], datetime!(2024-03-01 09:30), &PdfLayout::default());

        assert_contains(&pdf, "(Total Records: 1)");
        assert_contains(&pdf, "(400)");
        assert_contains(&pdf, "(01 Mar 2024)");
        assert_contains(&pdf, "(google_ads)");
        assert_eq!(count_occurrences(&pdf, b"(-)"), 3);
    }

    #[test]
    fn long_tables_repeat_header_on_each_page() {
        let rows: Vec<_> = (1..=60).map(row).collect();

        let pdf = render_pdf(&rows, datetime!(2024-03-01 09:30), &PdfLayout::default());

        let header_count = count_occurrences(&pdf, b"(Quoted Date)");
        assert!(header_count >= 2, "want header on every page, got {header_count}");
        assert_contains(&pdf, &format!("/Count {header_count}"));
        assert_eq!(count_occurrences(&pdf, b"(Total Records: 60)"), 1);
    }

    /// The baseline heights, in points from the bottom of the page, of every line of text.
    fn text_baselines(pdf: &[u8]) -> Vec<f32> {
        pdf.split(|byte| *byte == b'\n')
            .filter_map(|line| line.strip_suffix(b" Td"))
            .filter_map(|operands| {
                let operands = std::str::from_utf8(operands).ok()?;
                operands.split_whitespace().nth(1)?.parse().ok()
            })
            .collect()
    }

    #[test]
    fn rows_taller_than_a_page_continue_on_the_next_page() {
        let layout = PdfLayout::default();
        let mut rows: Vec<_> = (1..=40).map(row).collect();
        rows[20].remarks = Some("word ".repeat(2000));

        let pdf = render_pdf(&rows, datetime!(2024-03-01 09:30), &layout);

        let baselines = text_baselines(&pdf);
        assert!(!baselines.is_empty(), "want text positions in the content streams");
        let bottom_margin = layout.margin_mm * POINTS_PER_MM;
        let page_top = layout.page_height_mm * POINTS_PER_MM;
        for baseline in baselines {
            assert!(
                baseline >= bottom_margin && baseline <= page_top,
                "text at y = {baseline} is outside the page body"
            );
        }

        assert_eq!(count_occurrences(&pdf, b"word"), 2000);
        let header_count = count_occurrences(&pdf, b"(Quoted Date)");
        assert!(header_count > 2, "want the long row split over pages, got {header_count}");
        assert_contains(&pdf, &format!("/Count {header_count}"));
        assert_contains(&pdf, "(40)");
    }

    #[test]
    fn wraps_long_text_at_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 20.0, 8.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn breaks_words_wider_than_column() {
        let lines = wrap_text(&"W".repeat(40), 10.0, 8.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "W".repeat(40));
    }

    #[test]
    fn keeps_explicit_line_breaks() {
        let lines = wrap_text("first\r\nsecond", 100.0, 8.0);

        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn replaces_non_ascii_characters() {
        assert_eq!(to_printable_ascii("Café ☕\tok"), "Caf? ? ok");
    }
}
