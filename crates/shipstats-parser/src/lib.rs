pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{ParserAttempt, ParserError};
pub use model::RawTable;
pub use registry::{parse_shipment_table, parse_with_parsers, TableParser};

#[cfg(test)]
mod tests;
