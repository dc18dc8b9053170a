use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::columns;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Turns the parser's all-string table into the normalized shipment table:
/// billed rows only, timestamp and numeric columns coerced in place, derived
/// columns appended. Row order of the input is preserved.
///
/// Cell-level problems degrade to nulls; the only hard failure besides Polars
/// internals is a missing `STATUS` column.
pub fn normalize(raw: &DataFrame, config: &PipelineConfig) -> Result<DataFrame> {
    let status = raw
        .column(columns::STATUS)
        .map_err(|_| PipelineError::MissingColumn(columns::STATUS))?
        .str()?;

    let keep: Vec<bool> = (0..raw.height())
        .map(|idx| status.get(idx) == Some(config.billed_status.as_str()))
        .collect();
    let mask = BooleanChunked::from_slice("billed".into(), &keep);
    let filtered = raw.filter(&mask)?;
    let height = filtered.height();
    tracing::debug!(
        input_rows = raw.height(),
        billed_rows = height,
        "applied billed-status filter"
    );

    let mut cols: Vec<Column> = Vec::with_capacity(filtered.width() + 6);

    let mut ord_create: Option<Vec<Option<i64>>> = None;
    let mut depart: Option<Vec<Option<i64>>> = None;
    let mut arrive: Option<Vec<Option<i64>>> = None;
    let mut charges_usd: Option<Vec<Option<f64>>> = None;

    for column in filtered.get_columns() {
        let name = column.name().as_str();
        if columns::TIMESTAMP_COLUMNS.contains(&name) {
            let micros = parse_timestamp_cells(column)?;
            if name == columns::ORD_CREATE {
                ord_create = Some(micros.clone());
            } else if name == columns::DEPART {
                depart = Some(micros.clone());
            } else if name == columns::ARRIVE {
                arrive = Some(micros.clone());
            }
            cols.push(datetime_column(name, micros)?);
        } else if name == columns::TOTAL_CHARGES {
            let charges = parse_numeric_cells(column)?;
            cols.push(Series::new(name.into(), charges.clone()).into());
            charges_usd = Some(charges);
        } else if name == columns::WEIGHT_KG {
            cols.push(Series::new(name.into(), parse_numeric_cells(column)?).into());
        } else if name == columns::QC_CODE {
            cols.push(Series::new(name.into(), parse_code_cells(column)?).into());
        } else {
            cols.push(column.clone());
        }
    }

    // Converted cost: zero (not null) on every row when the source column is
    // absent, so downstream sums never fail.
    match charges_usd {
        Some(values) => {
            let eur: Vec<Option<f64>> = values
                .iter()
                .map(|usd| usd.map(|v| v * config.usd_to_eur))
                .collect();
            cols.push(Series::new(columns::TOTAL_CHARGES_EUR.into(), eur).into());
        }
        None => {
            cols.push(Series::new(columns::TOTAL_CHARGES_EUR.into(), vec![0.0f64; height]).into());
        }
    }

    let dep = filtered
        .column(columns::DEP)
        .ok()
        .map(|c| c.str())
        .transpose()?;
    let arr = filtered
        .column(columns::ARR)
        .ok()
        .map(|c| c.str())
        .transpose()?;

    // Route needs both endpoints and keeps the codes as uploaded.
    if let (Some(dep), Some(arr)) = (dep, arr) {
        let mut route: Vec<Option<String>> = Vec::with_capacity(height);
        for idx in 0..height {
            route.push(match (dep.get(idx), arr.get(idx)) {
                (Some(d), Some(a)) => Some(format!("{d} → {a}")),
                _ => None,
            });
        }
        cols.push(Series::new(columns::ROUTE.into(), route).into());
    }

    // The *_CLEAN columns are the case-normalized forms used for location
    // grouping; each one depends only on its own source column.
    if let Some(dep) = dep {
        cols.push(Series::new(columns::DEP_CLEAN.into(), clean_location_codes(dep)).into());
    }
    if let Some(arr) = arr {
        cols.push(Series::new(columns::ARR_CLEAN.into(), clean_location_codes(arr)).into());
    }

    if let Some(created) = ord_create {
        let month: Vec<Option<String>> = created
            .iter()
            .map(|micros| micros.and_then(month_key))
            .collect();
        cols.push(Series::new(columns::MONTH.into(), month).into());
    }

    if let (Some(departed), Some(arrived)) = (depart, arrive) {
        // May be negative or absurdly large on inconsistent data; consumers
        // apply the sanity window before using it.
        let hours: Vec<Option<f64>> = departed
            .iter()
            .zip(arrived.iter())
            .map(|(d, a)| match (d, a) {
                (Some(d), Some(a)) => Some((a - d) as f64 / MICROS_PER_HOUR),
                _ => None,
            })
            .collect();
        cols.push(Series::new(columns::TRANSIT_HOURS.into(), hours).into());
    }

    Ok(DataFrame::new(cols)?)
}

static TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

pub(crate) fn parse_timestamp_micros(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    for fmt in TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.and_utc().timestamp_micros());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_micros());
        }
    }
    None
}

fn clean_location_codes(values: &StringChunked) -> Vec<Option<String>> {
    (0..values.len())
        .map(|idx| values.get(idx).map(|v| v.trim().to_uppercase()))
        .collect()
}

fn month_key(micros: i64) -> Option<String> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.format("%Y-%m").to_string())
}

fn parse_timestamp_cells(column: &Column) -> Result<Vec<Option<i64>>> {
    let values = column.str()?;
    Ok((0..values.len())
        .map(|idx| values.get(idx).and_then(parse_timestamp_micros))
        .collect())
}

fn parse_numeric_cells(column: &Column) -> Result<Vec<Option<f64>>> {
    let values = column.str()?;
    Ok((0..values.len())
        .map(|idx| values.get(idx).and_then(|v| v.trim().parse::<f64>().ok()))
        .collect())
}

fn parse_code_cells(column: &Column) -> Result<Vec<Option<i64>>> {
    let values = column.str()?;
    Ok((0..values.len())
        .map(|idx| values.get(idx).and_then(parse_code))
        .collect())
}

fn parse_code(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(code) = trimmed.parse::<i64>() {
        return Some(code);
    }
    // workbook exports often deliver integer codes as floats ("262.0")
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.fract() == 0.0)
        .map(|f| f as i64)
}

fn datetime_column(name: &str, micros: Vec<Option<i64>>) -> Result<Column> {
    let series = Series::new(name.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    Ok(series.into())
}
