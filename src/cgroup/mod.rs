//! Read-only access to the cgroup interface files that describe the resources
//! allocated to this process.
//!
//! Both hierarchy generations are supported. The files live at fixed paths
//! below the cgroup mount (usually `/sys/fs/cgroup`):
//!
//! | file                            | layout | meaning                       |
//! |---------------------------------|--------|-------------------------------|
//! | `memory/memory.limit_in_bytes`  | v1     | memory limit in bytes         |
//! | `memory/memory.usage_in_bytes`  | v1     | memory usage in bytes         |
//! | `memory.max`                    | v2     | memory limit or `max`         |
//! | `memory.current`                | v2     | memory usage in bytes         |
//! | `cpu/cpu.cfs_quota_us`          | v1     | CPU quota, `-1` if unlimited  |
//! | `cpu/cpu.cfs_period_us`         | v1     | CPU period                    |
//! | `cpu.max`                       | v2     | `"<quota> <period>"`          |
//!
//! Every file is optional. The readers report absence through [`ReadError`]
//! or, for [`read_cgroup_value`], through `None`.
mod error;
mod parser;

use std::path::{Path, PathBuf};

pub use error::{ReadError, StatParseError};
pub use parser::{CgroupValue, CpuMax, SingleLineStat};

use crate::fsutil;

/// Default mount point of the cgroup filesystem.
pub const DEFAULT_CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Resolves the well-known cgroup interface files below a cgroup mount point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgroupLayout {
    root: PathBuf,
}

impl Default for CgroupLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CGROUP_ROOT)
    }
}

impl CgroupLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn v1_memory_limit(&self) -> PathBuf {
        self.root.join("memory/memory.limit_in_bytes")
    }

    pub fn v1_memory_usage(&self) -> PathBuf {
        self.root.join("memory/memory.usage_in_bytes")
    }

    pub fn v2_memory_limit(&self) -> PathBuf {
        self.root.join("memory.max")
    }

    pub fn v2_memory_usage(&self) -> PathBuf {
        self.root.join("memory.current")
    }

    pub fn v1_cpu_quota(&self) -> PathBuf {
        self.root.join("cpu/cpu.cfs_quota_us")
    }

    pub fn v1_cpu_period(&self) -> PathBuf {
        self.root.join("cpu/cpu.cfs_period_us")
    }

    pub fn v2_cpu_max(&self) -> PathBuf {
        self.root.join("cpu.max")
    }
}

/// Opens `path` and parses its content as `T`.
///
/// # Errors
///
/// - [`ReadError::Open`] if the file cannot be opened (missing, permission denied).
/// - [`ReadError::Read`] if reading fails or the content does not parse as `T`.
pub fn try_read_stat<T: SingleLineStat>(path: impl AsRef<Path>) -> Result<T, ReadError> {
    let path = path.as_ref();
    let mut reader = fsutil::open_file_reader(path)?;
    T::from_reader(&mut reader).map_err(|source| ReadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a single integer from a cgroup file.
///
/// # Errors
///
/// See [`try_read_stat`].
pub fn try_read_cgroup_value(path: impl AsRef<Path>) -> Result<i64, ReadError> {
    try_read_stat::<CgroupValue>(path).map(|CgroupValue(value)| value)
}

/// Reads a single integer from a cgroup file, or `None` if the file is
/// missing, unreadable or does not contain an integer.
pub fn read_cgroup_value(path: impl AsRef<Path>) -> Option<i64> {
    try_read_cgroup_value(path).ok()
}
