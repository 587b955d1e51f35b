//! Best-effort snapshot of the resources available to this process.
//!
//! The [`Inspector`] runs once at startup and reports through an injected
//! [`log::Log`]. It never fails: every source that cannot be read degrades to
//! a documented fallback, so the page server always starts afterwards.
//!
//! Two reports exist, chosen by [`RuntimeEnvironment`]:
//!
//! - **Container**: memory and CPU allocation from cgroup v1 or v2 files, host
//!   totals as fallback, and a note that the disk quota is not visible.
//! - **Host**: OS release, memory, root filesystem and core counts straight
//!   from the operating system.
//!
//! # Example
//!
//! ```no_run
//! use pagewatch::cgroup::CgroupLayout;
//! use pagewatch::environment::RuntimeEnvironment;
//! use pagewatch::inspector::{Inspector, SysinfoProbe};
//!
//! let inspector = Inspector::new(log::logger(), SysinfoProbe, CgroupLayout::default());
//! println!("{}", inspector.detect_memory());
//! inspector.log_snapshot(RuntimeEnvironment::Container);
//! ```
mod cpu;
mod disk;
pub mod host;
mod memory;
mod units;

use std::fmt;
use std::path::Path;

pub use cpu::{CpuInfo, CpuSource};
pub use disk::DiskInfo;
pub use host::{HostProbe, ProbeError, SysinfoProbe};
pub use memory::{MemoryInfo, MemorySource, UNLIMITED_MEMORY_SENTINEL};
pub use units::{Gigabytes, Percent};

use crate::cgroup::{self, CgroupLayout};
use crate::config::Config;
use crate::environment::RuntimeEnvironment;
use host::{HostMemory, OsRelease};

pub const CONTAINER_BANNER: &str =
    "================== ALLOCATED CONTAINER SPECS ==================";
pub const HOST_BANNER: &str = "==================== HOST SYSTEM SPECS ====================";
pub const CLOSING_BANNER: &str =
    "=============================================================";

pub struct Inspector<'a, P> {
    logger: &'a dyn log::Log,
    probe: P,
    layout: CgroupLayout,
}

impl<'a, P: HostProbe> Inspector<'a, P> {
    pub fn new(logger: &'a dyn log::Log, probe: P, layout: CgroupLayout) -> Self {
        Self {
            logger,
            probe,
            layout,
        }
    }

    /// Reads a cgroup integer. A missing file is expected on hosts with the
    /// other cgroup layout and is logged at `trace`; other failures at `debug`.
    fn read_value(&self, path: &Path) -> Option<i64> {
        match cgroup::try_read_cgroup_value(path) {
            Ok(value) => Some(value),
            Err(err) if err.is_not_found() => {
                log::trace!(logger: self.logger, "{err}");
                None
            }
            Err(err) => {
                log::debug!(logger: self.logger, "{err}");
                None
            }
        }
    }

    /// Logs the report for `environment`: an opening banner, one line per
    /// resource and a closing banner.
    pub fn log_snapshot(&self, environment: RuntimeEnvironment) {
        match environment {
            RuntimeEnvironment::Container => self.log_allocated_specs(),
            RuntimeEnvironment::Host => self.log_host_specs(),
        }
    }

    fn log_allocated_specs(&self) {
        log::info!(logger: self.logger, "{CONTAINER_BANNER}");
        log::info!(logger: self.logger, "{}", self.detect_memory());
        log::info!(logger: self.logger, "{}", self.detect_cpu());
        match self.detect_disk(RuntimeEnvironment::Container) {
            Ok(disk) => log::info!(logger: self.logger, "{disk}"),
            Err(err) => log::warn!(logger: self.logger, "Allocated Disk: {err}"),
        }
        log::info!(logger: self.logger, "{CLOSING_BANNER}");
    }

    fn log_host_specs(&self) {
        log::info!(logger: self.logger, "{HOST_BANNER}");
        match self.host_report() {
            Ok(report) => {
                log::info!(logger: self.logger, "OS: {}", report.os);
                log::info!(
                    logger: self.logger,
                    "RAM: Total = {}, Available = {}",
                    Gigabytes(report.memory.total_bytes),
                    Gigabytes(report.memory.available_bytes)
                );
                log::info!(logger: self.logger, "{}", report.disk);
                log::info!(
                    logger: self.logger,
                    "CPU Cores: {} physical, {} logical",
                    report.physical_cores,
                    report.logical_cores
                );
            }
            Err(err) => {
                log::error!(logger: self.logger, "Could not retrieve system specs: {err}")
            }
        }
        log::info!(logger: self.logger, "{CLOSING_BANNER}");
    }

    /// Gathers the host report. Any single failing query fails the whole report.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProbeError`] raised by the probe.
    pub fn host_report(&self) -> host::Result<HostReport> {
        Ok(HostReport {
            os: self.probe.os_release()?,
            memory: self.probe.memory()?,
            disk: self.detect_disk(RuntimeEnvironment::Host)?,
            physical_cores: self.probe.physical_cpus()?,
            logical_cores: self.probe.logical_cpus()?,
        })
    }
}

/// Host-wide totals logged by the host report.
#[derive(Debug, Clone, PartialEq)]
pub struct HostReport {
    pub os: OsRelease,
    pub memory: HostMemory,
    pub disk: DiskInfo,
    pub physical_cores: usize,
    pub logical_cores: usize,
}

impl fmt::Display for OsRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(version) = &self.version {
            write!(f, " {version}")?;
        }
        Ok(())
    }
}

/// Resolves the configured profile and logs the matching resource report.
///
/// Called once at startup, after the logger is installed and before the
/// listener binds. Never fails.
pub fn run_startup_diagnostics<P: HostProbe>(config: &Config, logger: &dyn log::Log, probe: P) {
    let environment = config.profile.resolve(&config.rootfs);
    log::debug!(
        logger: logger,
        "Resource profile `{}` resolved to {} report, cgroup root `{}`",
        config.profile,
        environment,
        config.cgroup_root.display()
    );

    Inspector::new(logger, probe, CgroupLayout::new(&config.cgroup_root))
        .log_snapshot(environment);
}
