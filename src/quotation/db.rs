//! Database operations for quotations.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    quotation::{Quotation, QuotationFields, QuotationId, Source, Status},
};

const SELECT_COLUMNS: &str = "SELECT id, sl_number, date, time_in, client, item, source, status, \
    remarks, quote_number, quoted_date FROM quotation";

/// Retrieve all quotations, newest first.
pub fn get_all_quotations(connection: &Connection) -> Result<Vec<Quotation>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC, id DESC;"))?
        .query_map([], map_row)?
        .map(|maybe_quotation| maybe_quotation.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a single quotation by ID.
pub fn get_quotation(id: QuotationId, connection: &Connection) -> Result<Quotation, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id;"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Create a quotation and return it with its generated ID.
pub fn insert_quotation(
    fields: QuotationFields,
    connection: &Connection,
) -> Result<Quotation, Error> {
    connection.execute(
        "INSERT INTO quotation \
        (sl_number, date, time_in, client, item, source, status, remarks, quote_number, quoted_date) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
        rusqlite::params![
            fields.sl_number,
            fields.date,
            fields.time_in,
            fields.client,
            fields.item,
            fields.source.as_str(),
            fields.status.as_str(),
            fields.remarks,
            fields.quote_number,
            fields.quoted_date,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(fields.into_quotation(id))
}

/// Overwrite every field of a quotation. Returns an error if the quotation doesn't exist.
pub fn update_quotation(
    id: QuotationId,
    fields: QuotationFields,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE quotation SET sl_number = ?1, date = ?2, time_in = ?3, client = ?4, item = ?5, \
        source = ?6, status = ?7, remarks = ?8, quote_number = ?9, quoted_date = ?10 \
        WHERE id = ?11",
        rusqlite::params![
            fields.sl_number,
            fields.date,
            fields.time_in,
            fields.client,
            fields.item,
            fields.source.as_str(),
            fields.status.as_str(),
            fields.remarks,
            fields.quote_number,
            fields.quoted_date,
            id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingQuotation);
    }

    Ok(())
}

/// Delete a quotation by ID. Returns an error if the quotation doesn't exist.
pub fn delete_quotation(id: QuotationId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM quotation WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingQuotation);
    }

    Ok(())
}

/// Initialize the quotation table and indexes.
pub fn create_quotation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS quotation (
            id INTEGER PRIMARY KEY,
            sl_number INTEGER NOT NULL,
            date TEXT NOT NULL,
            time_in TEXT NOT NULL,
            client TEXT NOT NULL,
            item TEXT NOT NULL,
            source TEXT NOT NULL,
            status TEXT NOT NULL,
            remarks TEXT,
            quote_number TEXT,
            quoted_date TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_quotation_date ON quotation(date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Quotation, rusqlite::Error> {
    let raw_source: String = row.get(6)?;
    let raw_status: String = row.get(7)?;

    Ok(Quotation {
        id: row.get(0)?,
        sl_number: row.get(1)?,
        date: row.get(2)?,
        time_in: row.get(3)?,
        client: row.get(4)?,
        item: row.get(5)?,
        source: Source::from_stored(&raw_source),
        status: Status::from_stored(&raw_status),
        remarks: row.get(8)?,
        quote_number: row.get(9)?,
        quoted_date: row.get(10)?,
    })
}
