// Error taxonomy for the classification core
// Every boundary failure maps to one of four kinds; the presentation layer
// decides how to render them.

use thiserror::Error;

/// Library-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection string could not be resolved from secrets or environment.
    /// The category store degrades to in-memory defaults and the session
    /// continues.
    #[error("store not configured: {0}")]
    Config(String),

    /// Backing document store unreachable at handle creation or at a call.
    /// Degrade for that operation, never crash the session.
    #[error("store unreachable: {0}")]
    Connectivity(#[from] rusqlite::Error),

    /// Malformed input row or column during a load. Aborts the current load
    /// only; prior session state is untouched.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Rejected user input (duplicate category, empty keyword). Surfaced as a
    /// non-blocking warning, never an abort.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl Error {
    /// Parse failure with line context. Lines are physical lines in the
    /// input, counting the header as line 1; 0 means "no position".
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

// CSV-level failures (missing required column, bad structure) are parse
// failures of the current load, reported with the same physical-line
// convention as the field parsers.
impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
        Error::Parse {
            line,
            message: e.to_string(),
        }
    }
}
