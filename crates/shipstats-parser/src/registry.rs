use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{CsvTableParser, XlsxTableParser};
use crate::model::RawTable;

pub trait TableParser {
    fn name(&self) -> &'static str;
    fn parse(&self, contents: &[u8]) -> Result<RawTable, ParserError>;
}

pub fn parse_shipment_table(contents: &[u8]) -> Result<RawTable, ParserError> {
    let xlsx = XlsxTableParser;
    let csv = CsvTableParser;
    let parsers: [&dyn TableParser; 2] = [&xlsx, &csv];
    parse_with_parsers(contents, &parsers)
}

pub fn parse_with_parsers(
    contents: &[u8],
    parsers: &[&dyn TableParser],
) -> Result<RawTable, ParserError> {
    let mut attempts = Vec::new();

    for parser in parsers {
        match parser.parse(contents) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                attempts.push(ParserAttempt {
                    parser: parser.name(),
                    message: reason,
                });
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingParser { attempts })
}
