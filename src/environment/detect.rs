use std::fmt;
use std::path::Path;

use super::checks::{
    contains_proc_mount, has_container_marker_files, is_pid_namespace_isolated,
    matches_container_cgroup,
};

/// Where the process runs, and therefore which resource report applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running directly on the host.
    Host,
    /// Running inside a containerized environment (e.g., Docker, Kubernetes, Podman).
    Container,
}

impl fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeEnvironment::Host => write!(f, "host"),
            RuntimeEnvironment::Container => write!(f, "container"),
        }
    }
}

const SELF_CGROUP_PATH: &str = "/proc/self/cgroup";

/// Detects whether the current process runs in a container or on the host.
///
/// The checks run in order and the first positive one wins:
///
/// 1. `/proc` exists below `rootfs` and the PID namespace differs from its init process.
/// 2. `/proc/self/cgroup` names a container runtime or a container id.
/// 3. Marker files (`/.dockerenv`, `/run/.containerenv`) or the `container` variable exist.
///
/// Failing checks are logged as warnings and count as negative.
pub fn detect_runtime_environment(rootfs: impl AsRef<Path>) -> RuntimeEnvironment {
    detect_from(
        rootfs.as_ref(),
        Path::new(SELF_CGROUP_PATH),
        std::env::var_os("container").is_some(),
    )
}

fn detect_from(rootfs: &Path, self_cgroup: &Path, container_var_set: bool) -> RuntimeEnvironment {
    match contains_proc_mount(rootfs) {
        Ok(true) => match is_pid_namespace_isolated(rootfs) {
            Ok(true) => return RuntimeEnvironment::Container,
            Ok(false) => {}
            Err(err) => log::warn!(
                "Namespace check failed when detecting runtime environment: {}",
                err
            ),
        },
        Ok(false) => {}
        Err(err) => log::warn!("Failed to determine presence of /proc in rootfs: {}", err),
    }

    match matches_container_cgroup(self_cgroup) {
        Ok(true) => return RuntimeEnvironment::Container,
        Ok(false) => {}
        Err(err) => log::warn!("Cgroup analysis failed during runtime detection: {}", err),
    }

    if container_var_set || has_container_marker_files(rootfs) {
        return RuntimeEnvironment::Container;
    }

    RuntimeEnvironment::Host
}
