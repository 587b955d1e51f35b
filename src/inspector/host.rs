//! Host-wide resource queries.
//!
//! [`HostProbe`] is the seam between the inspector and the operating system;
//! [`SysinfoProbe`] is the production implementation.

use std::path::{Path, PathBuf};

use nix::sys::statvfs::statvfs;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{0} is not reported by the operating system")]
    Unavailable(&'static str),
    #[error("failed to measure filesystem at `{path}`: {source}")]
    Statvfs {
        path: PathBuf,
        #[source]
        source: nix::errno::Errno,
    },
}

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Physical memory of the host in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostMemory {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Capacity of a mounted filesystem in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl DiskUsage {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }

    /// Share of the filesystem in use, `0.0` for a zero-sized filesystem.
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes() as f64 / self.total_bytes as f64 * 100.0
    }
}

/// Operating system name and release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    pub name: String,
    pub version: Option<String>,
}

/// Queries the host operating system for resource totals.
pub trait HostProbe {
    fn memory(&self) -> Result<HostMemory>;

    fn logical_cpus(&self) -> Result<usize>;

    fn physical_cpus(&self) -> Result<usize>;

    /// Usage of the filesystem holding `/`.
    fn root_disk(&self) -> Result<DiskUsage>;

    fn os_release(&self) -> Result<OsRelease>;
}

/// [`HostProbe`] backed by `sysinfo`, with `statvfs(2)` for the root filesystem.
///
/// Core counts cover every CPU the host has online, regardless of the CPU
/// affinity or cgroup quota of this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProbe;

impl SysinfoProbe {
    fn cpu_system() -> System {
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()))
    }
}

impl HostProbe for SysinfoProbe {
    fn memory(&self) -> Result<HostMemory> {
        let mut sys = System::new();
        sys.refresh_memory();
        match sys.total_memory() {
            0 => Err(ProbeError::Unavailable("total memory")),
            total_bytes => Ok(HostMemory {
                total_bytes,
                available_bytes: sys.available_memory(),
            }),
        }
    }

    fn logical_cpus(&self) -> Result<usize> {
        match Self::cpu_system().cpus().len() {
            0 => Err(ProbeError::Unavailable("logical CPU count")),
            n => Ok(n),
        }
    }

    fn physical_cpus(&self) -> Result<usize> {
        Self::cpu_system()
            .physical_core_count()
            .filter(|n| *n > 0)
            .ok_or(ProbeError::Unavailable("physical CPU count"))
    }

    fn root_disk(&self) -> Result<DiskUsage> {
        measure_filesystem(Path::new("/"))
    }

    fn os_release(&self) -> Result<OsRelease> {
        Ok(OsRelease {
            name: System::name().ok_or(ProbeError::Unavailable("OS name"))?,
            version: System::os_version(),
        })
    }
}

/// Measures the filesystem containing `path` with `statvfs(2)`.
///
/// Available space is what an unprivileged user may still allocate.
pub fn measure_filesystem(path: &Path) -> Result<DiskUsage> {
    let stat = statvfs(path).map_err(|source| ProbeError::Statvfs {
        path: path.to_path_buf(),
        source,
    })?;
    let fragment = stat.fragment_size() as u64;
    Ok(DiskUsage {
        total_bytes: (stat.blocks() as u64).saturating_mul(fragment),
        available_bytes: (stat.blocks_available() as u64).saturating_mul(fragment),
    })
}
