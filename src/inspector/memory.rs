use std::fmt;

use super::Inspector;
use super::host::HostProbe;
use super::units::{Gigabytes, OrUnknown, Percent};
use crate::error::ResultOkLogExt;

/// Limits at or above 2^60 bytes are how cgroups spell "no limit".
pub const UNLIMITED_MEMORY_SENTINEL: i64 = 1 << 60;

/// Where a [`MemoryInfo`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemorySource {
    CgroupV1,
    CgroupV2,
    /// No usable cgroup limit; only the host total is known.
    HostFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub limit_bytes: Option<u64>,
    pub usage_bytes: Option<u64>,
    /// Host total memory, only looked up for [`MemorySource::HostFallback`].
    pub host_total_bytes: Option<u64>,
    pub source: MemorySource,
}

impl MemoryInfo {
    /// Usage as a share of the limit, if both are known.
    pub fn usage_percent(&self) -> Option<f64> {
        match (self.limit_bytes, self.usage_bytes) {
            (Some(limit), Some(usage)) => Some(usage as f64 / limit as f64 * 100.0),
            _ => None,
        }
    }
}

impl fmt::Display for MemoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.limit_bytes, self.usage_percent()) {
            (Some(limit), Some(percent)) => write!(
                f,
                "Allocated RAM: Limit = {}, Current Usage = {}",
                Gigabytes(limit),
                Percent(percent)
            ),
            (Some(limit), None) => write!(f, "Allocated RAM: Limit = {}", Gigabytes(limit)),
            (None, _) => write!(
                f,
                "Allocated RAM: Limit not found. (Host Total RAM: {})",
                OrUnknown(self.host_total_bytes.map(Gigabytes))
            ),
        }
    }
}

/// Accepts a cgroup memory limit unless it is the "unlimited" sentinel or not positive.
fn effective_limit(raw: i64) -> Option<u64> {
    (raw > 0 && raw < UNLIMITED_MEMORY_SENTINEL).then_some(raw as u64)
}

impl<P: HostProbe> Inspector<'_, P> {
    /// Determines the memory limit and usage of this process's cgroup.
    ///
    /// The v1 files are used when `memory/memory.limit_in_bytes` exists, the v2
    /// files otherwise. Without a usable limit the host total is reported.
    pub fn detect_memory(&self) -> MemoryInfo {
        let layout = &self.layout;
        let v1_limit = layout.v1_memory_limit();
        let (source, limit_path, usage_path) = if v1_limit.exists() {
            (MemorySource::CgroupV1, v1_limit, layout.v1_memory_usage())
        } else {
            (
                MemorySource::CgroupV2,
                layout.v2_memory_limit(),
                layout.v2_memory_usage(),
            )
        };

        match self.read_value(&limit_path).and_then(effective_limit) {
            Some(limit) => MemoryInfo {
                limit_bytes: Some(limit),
                usage_bytes: self
                    .read_value(&usage_path)
                    .filter(|usage| *usage > 0)
                    .map(|usage| usage as u64),
                host_total_bytes: None,
                source,
            },
            None => MemoryInfo {
                limit_bytes: None,
                usage_bytes: None,
                host_total_bytes: self
                    .probe
                    .memory()
                    .ok_log(self.logger)
                    .map(|memory| memory.total_bytes),
                source: MemorySource::HostFallback,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgroup::CgroupLayout;
    use crate::testutil::{CaptureLogger, FakeProbe};

    fn write(path: std::path::PathBuf, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn detect(dir: &tempfile::TempDir, probe: FakeProbe) -> MemoryInfo {
        let logger = CaptureLogger::new();
        let inspector = Inspector::new(&logger, probe, CgroupLayout::new(dir.path()));
        inspector.detect_memory()
    }

    #[test]
    fn test_v1_limit_and_usage() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CgroupLayout::new(dir.path());
        write(layout.v1_memory_limit(), "1073741824\n");
        write(layout.v1_memory_usage(), "536870912\n");

        let info = detect(&dir, FakeProbe::healthy());
        assert_eq!(info.source, MemorySource::CgroupV1);
        assert_eq!(info.limit_bytes, Some(1073741824));
        assert_eq!(info.usage_bytes, Some(536870912));
        assert_eq!(
            info.to_string(),
            "Allocated RAM: Limit = 1.00 GB, Current Usage = 50.0%"
        );
    }

    #[test]
    fn test_v1_limit_without_usage() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CgroupLayout::new(dir.path());
        write(layout.v1_memory_limit(), "2147483648\n");

        let info = detect(&dir, FakeProbe::healthy());
        assert_eq!(info.limit_bytes, Some(2147483648));
        assert_eq!(info.usage_bytes, None);
        assert_eq!(info.to_string(), "Allocated RAM: Limit = 2.00 GB");
    }

    #[test]
    fn test_v2_used_when_v1_absent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CgroupLayout::new(dir.path());
        write(layout.v2_memory_limit(), "536870912\n");
        write(layout.v2_memory_usage(), "134217728\n");

        let info = detect(&dir, FakeProbe::healthy());
        assert_eq!(info.source, MemorySource::CgroupV2);
        assert_eq!(info.limit_bytes, Some(536870912));
        assert_eq!(
            info.to_string(),
            "Allocated RAM: Limit = 0.50 GB, Current Usage = 25.0%"
        );
    }

    #[test]
    fn test_v1_present_but_invalid_does_not_consult_v2() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CgroupLayout::new(dir.path());
        write(layout.v1_memory_limit(), "garbage\n");
        write(layout.v2_memory_limit(), "536870912\n");

        let info = detect(&dir, FakeProbe::healthy());
        assert_eq!(info.source, MemorySource::HostFallback);
        assert_eq!(info.limit_bytes, None);
    }

    #[test]
    fn test_unlimited_sentinel_falls_back_to_host() {
        for raw in ["9223372036854771712", "1152921504606846976"] {
            let dir = tempfile::tempdir().unwrap();
            let layout = CgroupLayout::new(dir.path());
            write(layout.v1_memory_limit(), raw);
            write(layout.v1_memory_usage(), "536870912");

            let info = detect(&dir, FakeProbe::healthy());
            assert_eq!(info.source, MemorySource::HostFallback);
            assert_eq!(info.host_total_bytes, Some(16 << 30));
            assert_eq!(
                info.to_string(),
                "Allocated RAM: Limit not found. (Host Total RAM: 16.00 GB)"
            );
        }
    }

    #[test]
    fn test_limit_just_below_sentinel_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CgroupLayout::new(dir.path());
        write(layout.v1_memory_limit(), "1152921504606846975");

        let info = detect(&dir, FakeProbe::healthy());
        assert_eq!(info.limit_bytes, Some((1 << 60) - 1));
    }

    #[test]
    fn test_v2_max_falls_back_to_host() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CgroupLayout::new(dir.path());
        write(layout.v2_memory_limit(), "max\n");
        write(layout.v2_memory_usage(), "134217728\n");

        let info = detect(&dir, FakeProbe::healthy());
        assert_eq!(info.source, MemorySource::HostFallback);
    }

    #[test]
    fn test_zero_limit_and_zero_usage_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CgroupLayout::new(dir.path());
        write(layout.v2_memory_limit(), "0\n");
        let info = detect(&dir, FakeProbe::healthy());
        assert_eq!(info.source, MemorySource::HostFallback);

        write(layout.v2_memory_limit(), "1073741824\n");
        write(layout.v2_memory_usage(), "0\n");
        let info = detect(&dir, FakeProbe::healthy());
        assert_eq!(info.usage_bytes, None);
        assert_eq!(info.to_string(), "Allocated RAM: Limit = 1.00 GB");
    }

    #[test]
    fn test_nothing_available() {
        let dir = tempfile::tempdir().unwrap();
        let info = detect(&dir, FakeProbe::failing());
        assert_eq!(
            info,
            MemoryInfo {
                limit_bytes: None,
                usage_bytes: None,
                host_total_bytes: None,
                source: MemorySource::HostFallback,
            }
        );
        assert_eq!(
            info.to_string(),
            "Allocated RAM: Limit not found. (Host Total RAM: unknown)"
        );
    }
}
