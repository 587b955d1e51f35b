//! Parsers for the single-line cgroup interface files the inspector reads.
//!
//! - [`CgroupValue`]: one signed integer, e.g. `memory.limit_in_bytes`,
//!   `memory.current` or `cpu.cfs_quota_us` (which is `-1` when unlimited).
//! - [`CpuMax`]: the cgroup v2 `cpu.max` pair, `"<quota> <period>"` or
//!   `"max <period>"`.
//!
//! # Examples
//!
//! ```rust
//! use pagewatch::cgroup::{CgroupValue, CpuMax, SingleLineStat};
//!
//! let value = CgroupValue::from_reader(&mut "1073741824\n".as_bytes()).unwrap();
//! assert_eq!(value.0, 1073741824);
//!
//! let max = CpuMax::from_reader(&mut "max 100000\n".as_bytes()).unwrap();
//! assert_eq!(max.quota_us, None);
//! ```

use std::io::{BufRead, Read};

use super::StatParseError;

/// A trait for parsing single-line, single-value statistics, such as
/// `memory.current` or `cpu.max` files.
pub trait SingleLineStat: Sized {
    /// Parses the statistic from the provided buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if reading fails, or a [`StatParseError`] wrapped
    /// in an `io::Error` of kind `InvalidData` if the content does not parse.
    fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self>;
}

/// A plain integer cgroup value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CgroupValue(pub i64);

impl SingleLineStat for CgroupValue {
    /// The whole file content, trimmed, must be a single integer. A file with
    /// trailing garbage or a second line is rejected.
    fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        let mut content = String::new();
        buf.read_to_string(&mut content)?;
        let content = content.trim();
        let value = content
            .parse::<i64>()
            .map_err(|source| StatParseError::InvalidValue {
                value: content.to_string(),
                line: 1,
                source,
            })?;

        Ok(CgroupValue(value))
    }
}

/// CPU bandwidth limit from the cgroup v2 `cpu.max` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuMax {
    /// Allowed CPU time per period in microseconds; `None` when `max`.
    pub quota_us: Option<i64>,
    /// Length of the enforcement period in microseconds.
    pub period_us: i64,
}

impl SingleLineStat for CpuMax {
    fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        let mut line = String::new();
        buf.read_line(&mut line)?;
        let mut parts = line.split_whitespace();

        let quota_us = match parts.next() {
            Some("max") => None,
            Some(value) => Some(parse_field(value)?),
            None => {
                return Err(StatParseError::MissingField {
                    field: "quota",
                    line: 1,
                }
                .into());
            }
        };
        let period_us = match parts.next() {
            Some(value) => parse_field(value)?,
            None => {
                return Err(StatParseError::MissingField {
                    field: "period",
                    line: 1,
                }
                .into());
            }
        };

        Ok(CpuMax {
            quota_us,
            period_us,
        })
    }
}

fn parse_field(value: &str) -> Result<i64, StatParseError> {
    value
        .parse::<i64>()
        .map_err(|source| StatParseError::InvalidValue {
            value: value.to_string(),
            line: 1,
            source,
        })
}
