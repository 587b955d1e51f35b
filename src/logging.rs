//! Logger construction.
//!
//! Every line goes to standard output as
//! `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`, in local time. The level filter
//! defaults to `info` and can be overridden through `RUST_LOG`.

use std::io::Write;

use chrono::{DateTime, TimeZone};

/// `chrono` format string for the timestamp prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes one formatted log line.
pub fn write_line<W, Tz>(
    out: &mut W,
    timestamp: &DateTime<Tz>,
    level: log::Level,
    args: &std::fmt::Arguments<'_>,
) -> std::io::Result<()>
where
    W: Write + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    writeln!(
        out,
        "[{}] [{}] {}",
        timestamp.format(TIMESTAMP_FORMAT),
        level,
        args
    )
}

/// Builds the process logger without installing it.
pub fn build_logger() -> env_logger::Logger {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| write_line(buf, &chrono::Local::now(), record.level(), record.args()))
        .build()
}

/// Builds the process logger, installs it globally and returns a handle to it
/// for explicit injection.
///
/// # Errors
///
/// Returns [`log::SetLoggerError`] if a global logger is already installed.
pub fn init() -> Result<&'static dyn log::Log, log::SetLoggerError> {
    let logger = build_logger();
    let filter = logger.filter();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(log::logger())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    #[test]
    fn test_line_format() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 3)
            .unwrap()
            .and_utc();

        let mut out = Vec::new();
        write_line(
            &mut out,
            &timestamp,
            log::Level::Info,
            &format_args!("Allocated CPU Cores: {:.2}", 2.0),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[2024-03-09 07:05:03] [INFO] Allocated CPU Cores: 2.00\n"
        );
    }

    #[test]
    fn test_error_level_label() {
        let mut out = Vec::new();
        write_line(
            &mut out,
            &Utc::now(),
            log::Level::Error,
            &format_args!("Could not retrieve system specs"),
        )
        .unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with('['));
        assert_eq!(&line[21..30], " [ERROR] ");
        assert!(line.ends_with("Could not retrieve system specs\n"));
    }
}
