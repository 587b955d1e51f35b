//! Process configuration, read once from environment variables.
//!
//! | variable            | default          | meaning                                   |
//! |---------------------|------------------|-------------------------------------------|
//! | `PORT`              | `5000`           | TCP port the page server listens on       |
//! | `RESOURCE_PROFILE`  | `container`      | `container`, `host` or `auto`             |
//! | `CGROUP_ROOT`       | `/sys/fs/cgroup` | mount point of the cgroup filesystem      |
//! | `ROOTFS_MOUNT_PATH` | `/`              | root used by `auto` environment detection |
//!
//! Empty values are treated like unset ones.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::cgroup::DEFAULT_CGROUP_ROOT;
use crate::environment::{self, RuntimeEnvironment};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid value `{value}` for `PORT`: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid value `{value}` for `RESOURCE_PROFILE`, expected one of `container`, `host`, `auto`")]
    InvalidProfile { value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Which resource report to log at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Allocation from cgroups, host totals as fallback.
    #[default]
    Container,
    /// Host OS totals, no cgroup awareness.
    Host,
    /// Pick one of the above by detecting the runtime environment.
    Auto,
}

impl Profile {
    /// Resolves the profile to the report that will actually be logged.
    pub fn resolve(self, rootfs: impl AsRef<Path>) -> RuntimeEnvironment {
        match self {
            Profile::Container => RuntimeEnvironment::Container,
            Profile::Host => RuntimeEnvironment::Host,
            Profile::Auto => environment::detect_runtime_environment(rootfs),
        }
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "container" => Ok(Profile::Container),
            "host" => Ok(Profile::Host),
            "auto" => Ok(Profile::Auto),
            _ => Err(Error::InvalidProfile {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Container => write!(f, "container"),
            Profile::Host => write!(f, "host"),
            Profile::Auto => write!(f, "auto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub profile: Profile,
    pub cgroup_root: PathBuf,
    pub rootfs: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            profile: Profile::default(),
            cgroup_root: PathBuf::from(DEFAULT_CGROUP_ROOT),
            rootfs: PathBuf::from("/"),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPort`] or [`Error::InvalidProfile`] if a
    /// variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        if let Some(value) = lookup("PORT") {
            config.port = value
                .trim()
                .parse::<u16>()
                .map_err(|source| Error::InvalidPort { value, source })?;
        }
        if let Some(value) = lookup("RESOURCE_PROFILE") {
            config.profile = value.parse()?;
        }
        if let Some(value) = lookup("CGROUP_ROOT") {
            config.cgroup_root = PathBuf::from(value);
        }
        if let Some(value) = lookup("ROOTFS_MOUNT_PATH") {
            config.rootfs = PathBuf::from(value);
        }

        Ok(config)
    }

    /// The address the page server binds to: all interfaces on the configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
