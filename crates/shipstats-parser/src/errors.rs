use thiserror::Error;

/// One rejected format probe, kept so the final error can say what was tried.
#[derive(Debug, Clone)]
pub struct ParserAttempt {
    pub parser: &'static str,
    pub message: String,
}

fn describe_attempts(attempts: &[ParserAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} ({})", a.parser, a.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{parser} format mismatch: {reason}")]
    FormatMismatch {
        parser: &'static str,
        reason: String,
    },

    #[error("{parser} workbook error: {message}")]
    Workbook {
        parser: &'static str,
        message: String,
    },

    #[error("{parser} CSV error: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser} header row invalid: {message}")]
    InvalidHeader {
        parser: &'static str,
        message: String,
    },

    #[error("{parser} file did not contain a header row")]
    EmptyData { parser: &'static str },

    #[error("no parser recognized this file; tried {}", describe_attempts(attempts))]
    NoMatchingParser { attempts: Vec<ParserAttempt> },
}
