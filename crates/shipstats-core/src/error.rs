// crates/shipstats-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("input could not be read as a spreadsheet: {0}")]
    Parser(#[from] shipstats_parser::ParserError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("required column '{0}' is missing from the input")]
    MissingColumn(&'static str),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
