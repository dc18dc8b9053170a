use polars::prelude::*;
use serde::Serialize;

use crate::columns;
use crate::config::PipelineConfig;
use crate::error::Result;

/// Gross and net on-time percentages over the rows where both delivery
/// timestamps are present. Unrounded; display rounding is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OtpSummary {
    pub gross_pct: f64,
    pub net_pct: f64,
}

impl OtpSummary {
    pub const ZERO: OtpSummary = OtpSummary {
        gross_pct: 0.0,
        net_pct: 0.0,
    };

    /// Headroom gained by fixing controllable delays.
    pub fn improvement_pct(&self) -> f64 {
        self.net_pct - self.gross_pct
    }
}

/// Computes on-time performance for the given table or any row subset of it.
///
/// Missing `QDT`/`POD DATE/TIME` columns and empty valid-row sets both yield
/// `(0.0, 0.0)` — a defined fallback, not an error. A delivery on or before
/// the requested time is on time (inclusive boundary). Net OTP additionally
/// forgives late rows whose recorded cause code is outside the controllable
/// set; a null code counts as non-controllable.
pub fn compute_otp(df: &DataFrame, config: &PipelineConfig) -> Result<OtpSummary> {
    let (Ok(qdt_col), Ok(pod_col)) = (df.column(columns::QDT), df.column(columns::POD)) else {
        return Ok(OtpSummary::ZERO);
    };
    let requested_times = qdt_col.datetime()?;
    let delivered_times = pod_col.datetime()?;

    let qc_codes = match df.column(columns::QC_CODE) {
        Ok(column) => Some(column.i64()?),
        Err(_) => None,
    };

    let mut valid = 0usize;
    let mut gross = 0usize;
    let mut net = 0usize;

    for idx in 0..df.height() {
        let (Some(requested), Some(delivered)) = (requested_times.get(idx), delivered_times.get(idx))
        else {
            continue;
        };
        valid += 1;

        let on_time_gross = delivered <= requested;
        if on_time_gross {
            gross += 1;
        }

        let on_time_net = match qc_codes {
            Some(codes) => {
                let controllable = codes
                    .get(idx)
                    .map(|code| config.is_controllable(code))
                    .unwrap_or(false);
                on_time_gross || !controllable
            }
            // without a cause column there is no forgiveness at all
            None => on_time_gross,
        };
        if on_time_net {
            net += 1;
        }
    }

    if valid == 0 {
        return Ok(OtpSummary::ZERO);
    }

    Ok(OtpSummary {
        gross_pct: 100.0 * gross as f64 / valid as f64,
        net_pct: 100.0 * net as f64 / valid as f64,
    })
}
