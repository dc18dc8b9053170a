use polars::prelude::*;

use crate::errors::ParserError;

/// Assigns a usable, unique name to every header cell. Blank headers become
/// `column_N` (1-based sheet position); repeated names get a `_N` occurrence
/// suffix so the DataFrame constructor does not reject them.
pub(crate) fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, header) in raw.iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut occurrence = 1usize;
        while seen.iter().any(|existing| existing == &candidate) {
            occurrence += 1;
            candidate = format!("{base}_{occurrence}");
        }
        seen.push(candidate);
    }
    seen
}

/// Builds the all-string DataFrame from row-major cells. Rows shorter than the
/// header are padded with nulls; cells beyond the header are dropped.
pub(crate) fn build_raw_dataframe(
    parser: &'static str,
    headers: &[String],
    rows: &[Vec<Option<String>>],
) -> Result<DataFrame, ParserError> {
    let names = dedupe_headers(headers);

    let mut columns: Vec<Column> = Vec::with_capacity(names.len());
    for (col_idx, name) in names.iter().enumerate() {
        let values: Vec<Option<&str>> = rows
            .iter()
            .map(|row| row.get(col_idx).and_then(|cell| cell.as_deref()))
            .collect();
        columns.push(Series::new(name.as_str().into(), values).into());
    }

    DataFrame::new(columns).map_err(|err| ParserError::InvalidHeader {
        parser,
        message: format!("failed to assemble dataframe: {err}"),
    })
}

pub(crate) fn clean_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn is_blank_row(row: &[Option<String>]) -> bool {
    row.iter().all(|cell| cell.is_none())
}
