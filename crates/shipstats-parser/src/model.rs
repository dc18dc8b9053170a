use polars::prelude::DataFrame;

/// Output of the format registry: every column is a nullable string series, one
/// per header cell, in sheet order. Typed coercion is the normalizer's job.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Identifier of the format parser that accepted the file.
    pub format: &'static str,
    pub df: DataFrame,
}
