use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, PrimitiveDateTime, Time, macros::date};

use quotation_tracker::{QuotationFields, Source, Status, initialize_db, insert_quotation};

/// A utility for creating a demo database for the quotation tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating demo quotations...");

    for fields in demo_quotations()? {
        insert_quotation(fields, &conn)?;
    }

    println!("Success!");

    Ok(())
}

/// A spread of quotations over every source, every status and two years.
fn demo_quotations() -> Result<Vec<QuotationFields>, Box<dyn Error>> {
    use Source::{GoogleAds, Mail, Other, Whatsapp};
    use Status::{Cancelled, Confirmed, Delivered, Hold, Pending, Quoted};

    let rows = [
        (date!(2023 - 11 - 06), "Harbour Marine", "Stainless fittings", GoogleAds, Delivered, None),
        (date!(2023 - 12 - 14), "Acme Engineering", "Hydraulic pump", Mail, Confirmed, Some("Repeat order")),
        (date!(2024 - 01 - 09), "Kiwi Builders", "Scaffold clamps x200", Whatsapp, Quoted, None),
        (date!(2024 - 01 - 22), "Acme Engineering", "Pressure gauges", GoogleAds, Pending, None),
        (date!(2024 - 02 - 03), "Southern Farms", "Irrigation valves", Other, Hold, Some("Waiting on site survey")),
        (date!(2024 - 02 - 17), "Harbour Marine", "Anchor chain 50m", Whatsapp, Cancelled, Some("Went local")),
        (date!(2024 - 03 - 01), "Acme Engineering", "Seal kit", Mail, Confirmed, None),
        (date!(2024 - 03 - 12), "Te Awa Cafe", "Espresso machine parts", GoogleAds, Pending, None),
        (date!(2024 - 03 - 25), "Kiwi Builders", "Ladder brackets", GoogleAds, Quoted, None),
        (date!(2024 - 04 - 08), "Southern Farms", "Trough floats", Whatsapp, Delivered, None),
        (date!(2024 - 04 - 19), "Northland Timber", "Saw blades", Other, Pending, Some("Call back Monday")),
        (date!(2024 - 05 - 02), "Acme Engineering", "Bearings", GoogleAds, Quoted, None),
    ];

    let mut quotations = Vec::with_capacity(rows.len());

    for (index, (date, client, item, source, status, remarks)) in rows.into_iter().enumerate() {
        let sl_number = 401 + index as i64;
        let time_in = PrimitiveDateTime::new(date, intake_time(index)?);
        let is_quoted = matches!(status, Quoted | Confirmed | Delivered);

        quotations.push(QuotationFields {
            sl_number,
            date,
            time_in,
            client: client.to_owned(),
            item: item.to_owned(),
            source,
            status,
            remarks: remarks.map(str::to_owned),
            quote_number: is_quoted.then(|| format!("Q-{}-{sl_number}", date.year())),
            quoted_date: if is_quoted { quoted_date(date) } else { None },
        });
    }

    Ok(quotations)
}

/// Spread intake times over the working day.
fn intake_time(index: usize) -> Result<Time, Box<dyn Error>> {
    let hour = 8 + (index % 9) as u8;
    let minute = ((index * 17) % 60) as u8;

    Ok(Time::from_hms(hour, minute, 0)?)
}

/// Quotes go out the day after the inquiry.
fn quoted_date(date: Date) -> Option<Date> {
    date.next_day()
}
