pub mod aggregates;
pub mod cache;
pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod normalize;
pub mod otp;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use ingest::{ingest_bytes, IngestOutcome};
pub use normalize::normalize;
pub use otp::{compute_otp, OtpSummary};
