//! Helpers shared by unit tests.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::inspector::host::{self, DiskUsage, HostMemory, HostProbe, OsRelease, ProbeError};

/// A logger that records every line it receives.
#[derive(Debug, Default)]
pub struct CaptureLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl CaptureLogger {
    /// Creates a logger and lifts the global level cap so the `logger:` form
    /// of the `log` macros reaches it.
    pub fn new() -> Self {
        log::set_max_level(LevelFilter::Trace);
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }

    /// Messages at `level` or more severe, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l <= level)
            .map(|(_, msg)| msg)
            .collect()
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

/// A [`HostProbe`] with canned answers; `None` fields fail with
/// [`ProbeError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct FakeProbe {
    pub memory: Option<HostMemory>,
    pub logical_cpus: Option<usize>,
    pub physical_cpus: Option<usize>,
    pub root_disk: Option<DiskUsage>,
    pub os_release: Option<OsRelease>,
}

impl FakeProbe {
    /// A probe where every query fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// An 8-core host with 16 GiB of memory and a 100 GiB root filesystem.
    pub fn healthy() -> Self {
        Self {
            memory: Some(HostMemory {
                total_bytes: 16 << 30,
                available_bytes: 10 << 30,
            }),
            logical_cpus: Some(8),
            physical_cpus: Some(4),
            root_disk: Some(DiskUsage {
                total_bytes: 100 << 30,
                available_bytes: 40 << 30,
            }),
            os_release: Some(OsRelease {
                name: "Debian GNU/Linux".to_string(),
                version: Some("12".to_string()),
            }),
        }
    }
}

impl HostProbe for FakeProbe {
    fn memory(&self) -> host::Result<HostMemory> {
        self.memory.ok_or(ProbeError::Unavailable("total memory"))
    }

    fn logical_cpus(&self) -> host::Result<usize> {
        self.logical_cpus
            .ok_or(ProbeError::Unavailable("logical CPU count"))
    }

    fn physical_cpus(&self) -> host::Result<usize> {
        self.physical_cpus
            .ok_or(ProbeError::Unavailable("physical CPU count"))
    }

    fn root_disk(&self) -> host::Result<DiskUsage> {
        self.root_disk
            .ok_or(ProbeError::Unavailable("root filesystem usage"))
    }

    fn os_release(&self) -> host::Result<OsRelease> {
        self.os_release
            .clone()
            .ok_or(ProbeError::Unavailable("OS name"))
    }
}
