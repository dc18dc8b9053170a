use std::io::Write;

use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::Result;

/// Download filename for the normalized table, stamped with the given date.
pub fn export_filename(date: NaiveDate) -> String {
    format!("shipment_data_{}.csv", date.format("%Y%m%d"))
}

/// Serializes the normalized table as CSV with a header row. A pure format
/// transform; no recomputation happens here.
pub fn write_csv<W: Write>(table: &DataFrame, writer: W) -> Result<()> {
    let mut out = table.clone();
    CsvWriter::new(writer)
        .include_header(true)
        .finish(&mut out)?;
    Ok(())
}
