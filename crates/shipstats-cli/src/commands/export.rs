use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use shipstats_core::cache::TableCache;
use shipstats_core::export::{export_filename, write_csv};
use shipstats_core::{ingest_bytes, PipelineConfig};

pub fn handle_export(file: &Path, out_dir: Option<&Path>) -> Result<()> {
    let contents =
        fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;

    let config = PipelineConfig::default();
    let mut cache = TableCache::new();
    let outcome = ingest_bytes(&mut cache, &contents, &config)?;

    let filename = export_filename(Local::now().date_naive());
    let path = out_dir.unwrap_or_else(|| Path::new(".")).join(&filename);

    let writer = fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(&outcome.table, writer)?;

    println!(
        "Wrote {} normalized rows to {}",
        outcome.table.height(),
        path.display()
    );
    Ok(())
}
