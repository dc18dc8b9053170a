use csv::ReaderBuilder;

use crate::errors::ParserError;
use crate::formats::common::{build_raw_dataframe, clean_cell, is_blank_row};
use crate::model::RawTable;
use crate::registry::TableParser;

const PARSER_NAME: &str = "csv";

pub struct CsvTableParser;

impl TableParser for CsvTableParser {
    fn name(&self) -> &'static str {
        PARSER_NAME
    }

    fn parse(&self, contents: &[u8]) -> Result<RawTable, ParserError> {
        let text = std::str::from_utf8(contents).map_err(|_| ParserError::FormatMismatch {
            parser: PARSER_NAME,
            reason: "contents are not valid UTF-8".to_string(),
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| ParserError::Csv {
                parser: PARSER_NAME,
                source,
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ParserError::EmptyData {
                parser: PARSER_NAME,
            });
        }

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|source| ParserError::Csv {
                parser: PARSER_NAME,
                source,
            })?;
            let row: Vec<Option<String>> = record.iter().map(clean_cell).collect();
            if is_blank_row(&row) {
                continue;
            }
            rows.push(row);
        }

        let df = build_raw_dataframe(PARSER_NAME, &headers, &rows)?;
        Ok(RawTable {
            format: PARSER_NAME,
            df,
        })
    }
}
