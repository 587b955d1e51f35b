use std::fmt;

use super::Inspector;
use super::host::{self, DiskUsage, HostProbe};
use super::units::{Gigabytes, Percent};
use crate::environment::RuntimeEnvironment;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiskInfo {
    /// The container's storage quota is enforced outside and cannot be seen from inside.
    PlatformManaged,
    /// Usage of the host root filesystem.
    Measured(DiskUsage),
}

impl fmt::Display for DiskInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskInfo::PlatformManaged => f.write_str(
                "Allocated Disk: Quota is managed by the platform and is not visible from within the container.",
            ),
            DiskInfo::Measured(usage) => write!(
                f,
                "Disk (/): Total = {}, Free = {}, Used = {}",
                Gigabytes(usage.total_bytes),
                Gigabytes(usage.available_bytes),
                Percent(usage.used_percent())
            ),
        }
    }
}

impl<P: HostProbe> Inspector<'_, P> {
    /// Describes the disk available to the process.
    ///
    /// Inside a container nothing is measured. On a host the root filesystem is.
    ///
    /// # Errors
    ///
    /// Returns the probe's error if the root filesystem cannot be measured.
    pub fn detect_disk(&self, environment: RuntimeEnvironment) -> host::Result<DiskInfo> {
        match environment {
            RuntimeEnvironment::Container => Ok(DiskInfo::PlatformManaged),
            RuntimeEnvironment::Host => self.probe.root_disk().map(DiskInfo::Measured),
        }
    }
}
