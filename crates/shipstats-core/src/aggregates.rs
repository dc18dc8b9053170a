//! Aggregates the presentation layer derives from the normalized table. These
//! mirror the dashboard's summary cards and chart inputs; each one degrades to
//! an empty result when its source columns are missing.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::*;
use serde::Serialize;

use crate::columns;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::otp::{compute_otp, OtpSummary};

#[derive(Debug, Clone, Serialize)]
pub struct KpiSummary {
    pub shipments: usize,
    pub total_cost_eur: f64,
    pub avg_cost_eur: f64,
    pub otp: OtpSummary,
}

pub fn kpi_summary(df: &DataFrame, config: &PipelineConfig) -> Result<KpiSummary> {
    let (total, counted) = sum_eur(df)?;
    let avg = if counted > 0 {
        total / counted as f64
    } else {
        0.0
    };
    Ok(KpiSummary {
        shipments: df.height(),
        total_cost_eur: total,
        avg_cost_eur: avg,
        otp: compute_otp(df, config)?,
    })
}

fn sum_eur(df: &DataFrame) -> Result<(f64, usize)> {
    let Ok(column) = df.column(columns::TOTAL_CHARGES_EUR) else {
        return Ok((0.0, 0));
    };
    let values = column.f64()?;
    let mut total = 0.0;
    let mut counted = 0usize;
    for idx in 0..values.len() {
        if let Some(value) = values.get(idx) {
            total += value;
            counted += 1;
        }
    }
    Ok((total, counted))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationVolume {
    pub location: String,
    pub shipments: usize,
    pub avg_cost_eur: f64,
}

/// Shipment counts per case-normalized departure code, busiest first.
pub fn departure_volume(df: &DataFrame) -> Result<Vec<LocationVolume>> {
    location_volume(df, columns::DEP_CLEAN)
}

/// Shipment counts per case-normalized arrival code, busiest first.
pub fn arrival_volume(df: &DataFrame) -> Result<Vec<LocationVolume>> {
    location_volume(df, columns::ARR_CLEAN)
}

fn location_volume(df: &DataFrame, column_name: &str) -> Result<Vec<LocationVolume>> {
    let Ok(column) = df.column(column_name) else {
        return Ok(Vec::new());
    };
    let locations = column.str()?;
    let eur = df
        .column(columns::TOTAL_CHARGES_EUR)
        .ok()
        .map(|c| c.f64())
        .transpose()?;

    let mut stats: HashMap<String, (usize, f64, usize)> = HashMap::new();
    for idx in 0..df.height() {
        let Some(location) = locations.get(idx) else {
            continue;
        };
        let entry = stats.entry(location.to_string()).or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(values) = eur {
            if let Some(value) = values.get(idx) {
                entry.1 += value;
                entry.2 += 1;
            }
        }
    }

    let mut rows: Vec<LocationVolume> = stats
        .into_iter()
        .map(|(location, (count, cost_sum, cost_n))| LocationVolume {
            location,
            shipments: count,
            avg_cost_eur: if cost_n > 0 {
                cost_sum / cost_n as f64
            } else {
                0.0
            },
        })
        .collect();
    rows.sort_by(|a, b| {
        b.shipments
            .cmp(&a.shipments)
            .then_with(|| a.location.cmp(&b.location))
    });
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStats {
    pub route: String,
    pub shipments: usize,
    pub avg_cost_eur: f64,
    pub total_cost_eur: f64,
}

/// Volume and cost per route label, busiest first. Groups on the raw-cased
/// `Route` string, so mixed-case duplicates stay separate here (see the
/// location aggregations for the case-folded view).
pub fn route_stats(df: &DataFrame) -> Result<Vec<RouteStats>> {
    let Ok(column) = df.column(columns::ROUTE) else {
        return Ok(Vec::new());
    };
    let routes = column.str()?;
    let eur = df
        .column(columns::TOTAL_CHARGES_EUR)
        .ok()
        .map(|c| c.f64())
        .transpose()?;

    let mut stats: HashMap<String, (usize, f64, usize)> = HashMap::new();
    for idx in 0..df.height() {
        let Some(route) = routes.get(idx) else {
            continue;
        };
        let entry = stats.entry(route.to_string()).or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(values) = eur {
            if let Some(value) = values.get(idx) {
                entry.1 += value;
                entry.2 += 1;
            }
        }
    }

    let mut rows: Vec<RouteStats> = stats
        .into_iter()
        .map(|(route, (count, cost_sum, cost_n))| RouteStats {
            route,
            shipments: count,
            avg_cost_eur: if cost_n > 0 {
                cost_sum / cost_n as f64
            } else {
                0.0
            },
            total_cost_eur: cost_sum,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.shipments
            .cmp(&a.shipments)
            .then_with(|| a.route.cmp(&b.route))
    });
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcIssue {
    pub name: String,
    pub controllable: bool,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QcBreakdown {
    /// Rows with a recorded cause code; the denominator for the shares.
    pub recorded_issues: usize,
    pub controllable: usize,
    pub non_controllable: usize,
    pub top_issues: Vec<QcIssue>,
}

impl QcBreakdown {
    pub fn controllable_pct(&self) -> f64 {
        if self.recorded_issues == 0 {
            0.0
        } else {
            100.0 * self.controllable as f64 / self.recorded_issues as f64
        }
    }
}

/// Splits recorded delay causes into controllable and non-controllable and
/// counts occurrences per cause label. `None` when no cause column exists.
pub fn qc_breakdown(df: &DataFrame, config: &PipelineConfig) -> Result<Option<QcBreakdown>> {
    let Ok(code_col) = df.column(columns::QC_CODE) else {
        return Ok(None);
    };
    let codes = code_col.i64()?;
    let names = df
        .column(columns::QC_NAME)
        .ok()
        .map(|c| c.str())
        .transpose()?;

    let mut recorded = 0usize;
    let mut controllable_total = 0usize;
    let mut counts: HashMap<(String, bool), usize> = HashMap::new();

    for idx in 0..df.height() {
        let Some(code) = codes.get(idx) else {
            continue;
        };
        recorded += 1;
        let controllable = config.is_controllable(code);
        if controllable {
            controllable_total += 1;
        }

        let name = names
            .and_then(|values| values.get(idx))
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string());
        *counts.entry((name, controllable)).or_insert(0) += 1;
    }

    let mut top_issues: Vec<QcIssue> = counts
        .into_iter()
        .map(|((name, controllable), count)| QcIssue {
            name,
            controllable,
            count,
        })
        .collect();
    top_issues.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    Ok(Some(QcBreakdown {
        recorded_issues: recorded,
        controllable: controllable_total,
        non_controllable: recorded - controllable_total,
        top_issues,
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrendRow {
    pub month: String,
    pub orders: usize,
    pub total_cost_eur: f64,
    pub net_otp_pct: f64,
}

/// Orders, cost, and net OTP per `YYYY-MM` bucket, in calendar order. Each
/// month's OTP comes from running the engine on just that month's rows.
pub fn monthly_trend(df: &DataFrame, config: &PipelineConfig) -> Result<Vec<MonthlyTrendRow>> {
    let Ok(month_col) = df.column(columns::MONTH) else {
        return Ok(Vec::new());
    };
    let months: BTreeSet<String> = month_col
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::with_capacity(months.len());
    for month in months {
        let subset = df
            .clone()
            .lazy()
            .filter(col(columns::MONTH).eq(lit(month.as_str())))
            .collect()?;
        let otp = compute_otp(&subset, config)?;
        let (total_cost_eur, _) = sum_eur(&subset)?;
        rows.push(MonthlyTrendRow {
            month,
            orders: subset.height(),
            total_cost_eur,
            net_otp_pct: otp.net_pct,
        });
    }
    Ok(rows)
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitStats {
    pub shipments: usize,
    pub avg_hours: f64,
    pub median_hours: f64,
    pub p95_hours: f64,
}

/// Transit-time statistics over the sanity window `0 < h < max_transit_hours`.
/// `None` when the column is missing or no value falls inside the window.
pub fn transit_stats(df: &DataFrame, config: &PipelineConfig) -> Result<Option<TransitStats>> {
    let Ok(column) = df.column(columns::TRANSIT_HOURS) else {
        return Ok(None);
    };
    let values = column.f64()?;

    let mut window: Vec<f64> = Vec::new();
    for idx in 0..values.len() {
        if let Some(hours) = values.get(idx) {
            if hours > 0.0 && hours < config.max_transit_hours {
                window.push(hours);
            }
        }
    }
    if window.is_empty() {
        return Ok(None);
    }
    window.sort_by(f64::total_cmp);

    let total: f64 = window.iter().sum();
    Ok(Some(TransitStats {
        shipments: window.len(),
        avg_hours: total / window.len() as f64,
        median_hours: quantile(&window, 0.5),
        p95_hours: quantile(&window, 0.95),
    }))
}

// linear interpolation between the surrounding order statistics
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// One bin of a segmentation chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentCount {
    pub label: &'static str,
    pub shipments: usize,
}

// left-open bins, matching the dashboard's cost-range donut
const COST_SEGMENTS: [(&str, f64, f64); 6] = [
    ("<€250", 0.0, 250.0),
    ("€250-500", 250.0, 500.0),
    ("€500-1K", 500.0, 1000.0),
    ("€1K-2.5K", 1000.0, 2500.0),
    ("€2.5K-5K", 2500.0, 5000.0),
    (">€5K", 5000.0, f64::INFINITY),
];

/// Shipment counts per converted-cost range.
pub fn cost_segments(df: &DataFrame) -> Result<Vec<SegmentCount>> {
    bin_segments(df, columns::TOTAL_CHARGES_EUR, &COST_SEGMENTS)
}

// same left-open binning, over billable weight
const WEIGHT_SEGMENTS: [(&str, f64, f64); 6] = [
    ("<10kg", 0.0, 10.0),
    ("10-50kg", 10.0, 50.0),
    ("50-100kg", 50.0, 100.0),
    ("100-500kg", 100.0, 500.0),
    ("500-1000kg", 500.0, 1000.0),
    (">1000kg", 1000.0, f64::INFINITY),
];

/// Shipment counts per billable-weight category. Zero and negative weights
/// fall outside every bin, like the cost segmentation's left-open edges.
pub fn weight_segments(df: &DataFrame) -> Result<Vec<SegmentCount>> {
    bin_segments(df, columns::WEIGHT_KG, &WEIGHT_SEGMENTS)
}

fn bin_segments(
    df: &DataFrame,
    column_name: &str,
    segments: &[(&'static str, f64, f64)],
) -> Result<Vec<SegmentCount>> {
    let Ok(column) = df.column(column_name) else {
        return Ok(Vec::new());
    };
    let values = column.f64()?;

    let mut counts = vec![0usize; segments.len()];
    for idx in 0..values.len() {
        let Some(value) = values.get(idx) else {
            continue;
        };
        for (slot, (_, low, high)) in segments.iter().enumerate() {
            if value > *low && value <= *high {
                counts[slot] += 1;
                break;
            }
        }
    }

    Ok(segments
        .iter()
        .zip(counts)
        .map(|((label, _, _), shipments)| SegmentCount { label, shipments })
        .collect())
}
