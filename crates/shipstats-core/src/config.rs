use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Status sentinel marking a shipment as billed; all other rows are dropped.
pub const BILLED_STATUS: &str = "440-BILLED";

/// Fixed conversion rate applied to `TOTAL CHARGES` (assumed USD).
pub const USD_TO_EUR: f64 = 0.92;

/// Transit durations at or above this are treated as data errors by consumers.
pub const MAX_TRANSIT_HOURS: f64 = 200.0;

/// Delay-cause codes within the shipper's operational control. The set is
/// closed: any other code is non-controllable, never an error.
pub const CONTROLLABLE_QC_CODES: [i64; 11] =
    [262, 287, 183, 197, 199, 308, 309, 319, 326, 278, 203];

static DEFAULT_CONTROLLABLE_SET: Lazy<HashSet<i64>> =
    Lazy::new(|| CONTROLLABLE_QC_CODES.iter().copied().collect());

/// Tunable constants of the pipeline, injected into the normalizer and the OTP
/// engine so alternate rates or code sets can be tested without touching them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub billed_status: String,
    pub usd_to_eur: f64,
    pub controllable_codes: HashSet<i64>,
    pub max_transit_hours: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            billed_status: BILLED_STATUS.to_string(),
            usd_to_eur: USD_TO_EUR,
            controllable_codes: DEFAULT_CONTROLLABLE_SET.clone(),
            max_transit_hours: MAX_TRANSIT_HOURS,
        }
    }
}

impl PipelineConfig {
    pub fn is_controllable(&self, code: i64) -> bool {
        self.controllable_codes.contains(&code)
    }
}
