//! Error types for reading and parsing cgroup interface files.
//!
//! [`StatParseError`] describes what went wrong inside a file's content and
//! converts into [`std::io::Error`] so the parsers can stay on `io::Result`.
//! [`ReadError`] is what callers of [`super::try_read_cgroup_value`] see.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::fsutil;

#[derive(Debug, Error)]
pub enum StatParseError {
    #[error("invalid value at line {line}: '{value}': {source}")]
    InvalidValue {
        value: String,
        line: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("missing field '{field}' at line {line}")]
    MissingField { field: &'static str, line: usize },

    #[error("error during I/O: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StatParseError> for std::io::Error {
    fn from(err: StatParseError) -> Self {
        match err {
            StatParseError::Io(e) => e,
            StatParseError::InvalidValue { .. } | StatParseError::MissingField { .. } => {
                std::io::Error::new(std::io::ErrorKind::InvalidData, err)
            }
        }
    }
}

/// Errors returned when a cgroup file cannot be turned into a value.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Open(#[from] fsutil::FileOpenError),
    #[error("failed to read cgroup file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Returns `true` if the file does not exist, the most common and least
    /// interesting failure on hosts with the other cgroup layout.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReadError::Open(err) if err.is_not_found())
    }
}

/// Extracts a `StatParseError` from an `std::io::Error` assuming it was wrapped.
///
/// Panics if the inner error is not a `StatParseError`. Intended for use in test assertions only.
#[cfg(test)]
pub(super) fn extract_stat_parse_error(err: &std::io::Error) -> &StatParseError {
    err.get_ref()
        .and_then(|e| e.downcast_ref::<StatParseError>())
        .unwrap()
}
