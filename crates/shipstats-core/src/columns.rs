//! Canonical column names of the shipment export. Input headers are matched
//! verbatim; every name here is optional except [`STATUS`].

// Input columns.
pub const STATUS: &str = "STATUS";
pub const QDT: &str = "QDT";
pub const POD: &str = "POD DATE/TIME";
pub const ORD_CREATE: &str = "ORD CREATE";
pub const DEPART: &str = "Depart Date / Time";
pub const ARRIVE: &str = "Arrive Date / Time";
pub const TOTAL_CHARGES: &str = "TOTAL CHARGES";
pub const DEP: &str = "DEP";
pub const ARR: &str = "ARR";
pub const QC_CODE: &str = "QCCODE";
pub const QC_NAME: &str = "QC NAME";
pub const WEIGHT_KG: &str = "Billable Weight KG";

/// Columns coerced to microsecond datetimes during normalization.
pub const TIMESTAMP_COLUMNS: [&str; 5] = [QDT, POD, ORD_CREATE, DEPART, ARRIVE];

// Derived columns.
pub const TOTAL_CHARGES_EUR: &str = "TOTAL_CHARGES_EUR";
pub const ROUTE: &str = "Route";
pub const DEP_CLEAN: &str = "DEP_CLEAN";
pub const ARR_CLEAN: &str = "ARR_CLEAN";
pub const MONTH: &str = "Month";
pub const TRANSIT_HOURS: &str = "Transit_Hours";
