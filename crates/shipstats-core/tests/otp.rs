use chrono::{TimeZone, Utc};
use polars::prelude::*;

use shipstats_core::{columns, compute_otp, OtpSummary, PipelineConfig};

fn micros(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
        .unwrap()
        .timestamp_micros()
}

fn datetime_column(name: &str, values: &[Option<i64>]) -> Column {
    Series::new(name.into(), values.to_vec())
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .unwrap()
        .into()
}

fn code_column(values: &[Option<i64>]) -> Column {
    Series::new(columns::QC_CODE.into(), values.to_vec()).into()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn delivery_on_the_deadline_counts_as_on_time() {
    let deadline = micros(2024, 5, 1, 12, 0, 0);
    let df = DataFrame::new(vec![
        datetime_column(columns::QDT, &[Some(deadline), Some(deadline)]),
        datetime_column(
            columns::POD,
            &[Some(deadline), Some(deadline + 1_000_000)], // exactly on time / 1s late
        ),
    ])
    .unwrap();

    let otp = compute_otp(&df, &PipelineConfig::default()).unwrap();
    assert_close(otp.gross_pct, 50.0);
}

#[test]
fn gross_and_net_follow_the_forgiveness_rule() {
    // (a) on time, no cause; (b) late, controllable 262; (c) late, code 999
    let deadline = micros(2024, 5, 1, 12, 0, 0);
    let df = DataFrame::new(vec![
        datetime_column(
            columns::QDT,
            &[Some(deadline), Some(deadline), Some(deadline)],
        ),
        datetime_column(
            columns::POD,
            &[
                Some(deadline - 3_600_000_000),
                Some(deadline + 2 * 3_600_000_000),
                Some(deadline + 3_600_000_000),
            ],
        ),
        code_column(&[None, Some(262), Some(999)]),
    ])
    .unwrap();

    let otp = compute_otp(&df, &PipelineConfig::default()).unwrap();
    assert_close(otp.gross_pct, 100.0 / 3.0);
    assert_close(otp.net_pct, 200.0 / 3.0);
    assert_close(otp.improvement_pct(), 100.0 / 3.0);
}

#[test]
fn net_is_never_below_gross() {
    let deadline = micros(2024, 5, 1, 12, 0, 0);
    let df = DataFrame::new(vec![
        datetime_column(
            columns::QDT,
            &[Some(deadline), Some(deadline), Some(deadline), Some(deadline)],
        ),
        datetime_column(
            columns::POD,
            &[
                Some(deadline),
                Some(deadline + 1_000_000),
                Some(deadline + 2_000_000),
                None,
            ],
        ),
        code_column(&[Some(262), Some(183), Some(-7), Some(262)]),
    ])
    .unwrap();

    let otp = compute_otp(&df, &PipelineConfig::default()).unwrap();
    assert!(otp.net_pct >= otp.gross_pct);
}

#[test]
fn missing_otp_columns_return_zero_zero() {
    let df = DataFrame::new(vec![datetime_column(
        columns::QDT,
        &[Some(micros(2024, 1, 1, 0, 0, 0))],
    )])
    .unwrap();

    let otp = compute_otp(&df, &PipelineConfig::default()).unwrap();
    assert_eq!(otp, OtpSummary::ZERO);
}

#[test]
fn no_valid_rows_return_zero_zero() {
    let df = DataFrame::new(vec![
        datetime_column(columns::QDT, &[Some(micros(2024, 1, 1, 0, 0, 0)), None]),
        datetime_column(columns::POD, &[None, Some(micros(2024, 1, 2, 0, 0, 0))]),
    ])
    .unwrap();

    let otp = compute_otp(&df, &PipelineConfig::default()).unwrap();
    assert_eq!(otp, OtpSummary::ZERO);

    let empty = DataFrame::new(vec![
        datetime_column(columns::QDT, &[]),
        datetime_column(columns::POD, &[]),
    ])
    .unwrap();
    assert_eq!(
        compute_otp(&empty, &PipelineConfig::default()).unwrap(),
        OtpSummary::ZERO
    );
}

// The controllable set is closed: anything outside the eleven codes is
// non-controllable, including zero, negatives, and out-of-range values.
#[test]
fn codes_outside_the_fixed_set_are_forgiven_when_late() {
    let deadline = micros(2024, 5, 1, 12, 0, 0);
    let late = deadline + 3_600_000_000;
    let df = DataFrame::new(vec![
        datetime_column(
            columns::QDT,
            &[Some(deadline), Some(deadline), Some(deadline), Some(deadline)],
        ),
        datetime_column(columns::POD, &[Some(late), Some(late), Some(late), Some(late)]),
        code_column(&[Some(0), Some(-42), Some(99_999), Some(262)]),
    ])
    .unwrap();

    let otp = compute_otp(&df, &PipelineConfig::default()).unwrap();
    assert_close(otp.gross_pct, 0.0);
    assert_close(otp.net_pct, 75.0); // only the 262 row stays late
}

#[test]
fn late_row_with_null_code_is_treated_as_non_controllable() {
    let deadline = micros(2024, 5, 1, 12, 0, 0);
    let df = DataFrame::new(vec![
        datetime_column(columns::QDT, &[Some(deadline)]),
        datetime_column(columns::POD, &[Some(deadline + 3_600_000_000)]),
        code_column(&[None]),
    ])
    .unwrap();

    let otp = compute_otp(&df, &PipelineConfig::default()).unwrap();
    assert_close(otp.gross_pct, 0.0);
    assert_close(otp.net_pct, 100.0);
}

#[test]
fn without_a_code_column_net_equals_gross() {
    let deadline = micros(2024, 5, 1, 12, 0, 0);
    let df = DataFrame::new(vec![
        datetime_column(columns::QDT, &[Some(deadline), Some(deadline)]),
        datetime_column(
            columns::POD,
            &[Some(deadline), Some(deadline + 3_600_000_000)],
        ),
    ])
    .unwrap();

    let otp = compute_otp(&df, &PipelineConfig::default()).unwrap();
    assert_close(otp.gross_pct, 50.0);
    assert_close(otp.net_pct, 50.0);
}

#[test]
fn controllable_set_is_injectable() {
    let deadline = micros(2024, 5, 1, 12, 0, 0);
    let df = DataFrame::new(vec![
        datetime_column(columns::QDT, &[Some(deadline)]),
        datetime_column(columns::POD, &[Some(deadline + 3_600_000_000)]),
        code_column(&[Some(999)]),
    ])
    .unwrap();

    // 999 is controllable under this alternate classification, so the late
    // row is not forgiven.
    let config = PipelineConfig {
        controllable_codes: [999].into_iter().collect(),
        ..PipelineConfig::default()
    };
    let otp = compute_otp(&df, &config).unwrap();
    assert_close(otp.net_pct, 0.0);
}
