pub(crate) mod common;
pub(crate) mod csv_table;
pub(crate) mod xlsx_table;

pub(crate) use common::dedupe_headers;
pub use csv_table::CsvTableParser;
pub use xlsx_table::XlsxTableParser;
