use polars::prelude::DataFrame;

use crate::cache::{content_hash, TableCache};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::normalize::normalize;

#[derive(Debug)]
pub struct IngestOutcome {
    pub hash: String,
    /// Whether the table came from the memo cache instead of a fresh parse.
    pub cached: bool,
    pub table: DataFrame,
}

/// Full upload path: hash the bytes, serve the memoized table when the same
/// file is supplied again, otherwise parse and normalize.
pub fn ingest_bytes(
    cache: &mut TableCache,
    contents: &[u8],
    config: &PipelineConfig,
) -> Result<IngestOutcome> {
    let hash = content_hash(contents);

    if let Some(table) = cache.get(&hash) {
        tracing::debug!(%hash, "normalized table served from cache");
        return Ok(IngestOutcome {
            hash,
            cached: true,
            table: table.clone(),
        });
    }

    let raw = shipstats_parser::parse_shipment_table(contents)?;
    tracing::info!(format = raw.format, rows = raw.df.height(), "parsed upload");

    let table = normalize(&raw.df, config)?;
    cache.store(hash.clone(), table.clone());

    Ok(IngestOutcome {
        hash,
        cached: false,
        table,
    })
}
