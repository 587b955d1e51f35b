use std::net::SocketAddr;

use crate::config;

/// Errors that end the process. Resource inspection never produces one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("failed to bind listener on `{addr}`: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Turns a `Result` into an `Option`, logging the discarded error at `debug`
/// level on the given logger.
pub trait ResultOkLogExt<T, E> {
    fn ok_log(self, logger: &dyn log::Log) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self, logger: &dyn log::Log) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::debug!(logger: logger, "{err}");
                None
            }
        }
    }
}
