use std::fmt;

use super::Inspector;
use super::host::HostProbe;
use super::units::OrUnknown;
use crate::cgroup::{self, CpuMax};
use crate::error::ResultOkLogExt;

/// Where a [`CpuInfo`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuSource {
    /// Derived from a CFS quota and period.
    CgroupQuota,
    /// No quota configured; only the host core count is known.
    HostFallback,
    /// The cgroup files exist but contradict each other or do not parse.
    Indeterminate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuInfo {
    /// Allocated cores, fractional, for [`CpuSource::CgroupQuota`].
    pub allocated_cores: Option<f64>,
    /// Host logical cores, only looked up when no quota applies.
    pub host_logical_cores: Option<usize>,
    pub source: CpuSource,
}

impl fmt::Display for CpuInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = OrUnknown(self.host_logical_cores);
        match (self.source, self.allocated_cores) {
            (CpuSource::CgroupQuota, Some(cores)) => {
                write!(f, "Allocated CPU Cores: {cores:.2}")
            }
            (CpuSource::Indeterminate, _) => write!(
                f,
                "Allocated CPU Cores: Could not determine. (Host Total Cores: {host})"
            ),
            _ => write!(
                f,
                "Allocated CPU Cores: Not specified. (Host Total Cores: {host})"
            ),
        }
    }
}

enum Quota {
    Cores(f64),
    Unspecified,
    Inconsistent,
}

/// Converts a CFS quota/period pair into cores.
///
/// A missing or non-positive quota, or a missing or zero period, means no
/// quota is configured. A positive quota over a negative period is nonsense.
fn cores_from_quota(quota_us: Option<i64>, period_us: Option<i64>) -> Quota {
    match (quota_us, period_us) {
        (Some(quota), Some(period)) if quota > 0 && period > 0 => {
            Quota::Cores(quota as f64 / period as f64)
        }
        (Some(quota), Some(period)) if quota > 0 && period < 0 => Quota::Inconsistent,
        _ => Quota::Unspecified,
    }
}

impl<P: HostProbe> Inspector<'_, P> {
    /// Determines how many cores the CFS bandwidth controller grants this process.
    ///
    /// Uses `cpu.cfs_quota_us`/`cpu.cfs_period_us` when the v1 quota file
    /// exists and `cpu.max` otherwise. Without a quota the host logical core
    /// count is reported.
    pub fn detect_cpu(&self) -> CpuInfo {
        let v1_quota = self.layout.v1_cpu_quota();
        let v2_max = self.layout.v2_cpu_max();

        let quota = if v1_quota.exists() {
            cores_from_quota(
                self.read_value(&v1_quota),
                self.read_value(&self.layout.v1_cpu_period()),
            )
        } else if v2_max.exists() {
            match cgroup::try_read_stat::<CpuMax>(&v2_max).ok_log(self.logger) {
                Some(max) => cores_from_quota(max.quota_us, Some(max.period_us)),
                None => Quota::Inconsistent,
            }
        } else {
            Quota::Unspecified
        };

        match quota {
            Quota::Cores(cores) => CpuInfo {
                allocated_cores: Some(cores),
                host_logical_cores: None,
                source: CpuSource::CgroupQuota,
            },
            Quota::Unspecified => self.host_cpu(CpuSource::HostFallback),
            Quota::Inconsistent => self.host_cpu(CpuSource::Indeterminate),
        }
    }

    fn host_cpu(&self, source: CpuSource) -> CpuInfo {
        CpuInfo {
            allocated_cores: None,
            host_logical_cores: self.probe.logical_cpus().ok_log(self.logger),
            source,
        }
    }
}
