use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::errors::ParserError;
use crate::formats::common::{build_raw_dataframe, is_blank_row};
use crate::model::RawTable;
use crate::registry::TableParser;

const PARSER_NAME: &str = "xlsx";

// Local file header magic shared by .xlsx/.xlsm containers.
const ZIP_MAGIC: &[u8] = b"PK";

pub struct XlsxTableParser;

impl TableParser for XlsxTableParser {
    fn name(&self) -> &'static str {
        PARSER_NAME
    }

    fn parse(&self, contents: &[u8]) -> Result<RawTable, ParserError> {
        if !contents.starts_with(ZIP_MAGIC) {
            return Err(ParserError::FormatMismatch {
                parser: PARSER_NAME,
                reason: "missing ZIP container magic".to_string(),
            });
        }

        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(contents)).map_err(|err| ParserError::Workbook {
                parser: PARSER_NAME,
                message: err.to_string(),
            })?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ParserError::Workbook {
                parser: PARSER_NAME,
                message: "workbook has no sheets".to_string(),
            });
        }

        // First sheet only, first row as header.
        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|err| ParserError::Workbook {
                parser: PARSER_NAME,
                message: err.to_string(),
            })?;

        let mut rows_iter = range.rows();
        let header_row = rows_iter.next().ok_or(ParserError::EmptyData {
            parser: PARSER_NAME,
        })?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default())
            .collect();

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        for data_row in rows_iter {
            let row: Vec<Option<String>> = data_row.iter().map(cell_to_string).collect();
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

/// Flattens a workbook cell into the string form the normalizer coerces from.
/// Datetimes render as `YYYY-MM-DD HH:MM:SS`; whole floats lose the trailing
/// `.0` so integer codes survive the round trip.
pub(crate) fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| naive.format("%Y-%m-%d %H:%M:%S").to_string()),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
    }
}
