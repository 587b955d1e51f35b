use std::io::BufRead;
use std::path::Path;

use super::{Error, Result};
use crate::fsutil;

/// Cgroup path fragments written by common container runtimes.
const RUNTIME_MARKERS: [&str; 4] = ["docker", "kubepods", "containerd", "libpod"];

/// Returns true if `/proc` is present below `rootfs`.
///
/// # Errors
///
/// Returns [`Error::ExistenceCheck`] if the existence check itself fails.
pub fn contains_proc_mount(rootfs: &Path) -> Result<bool> {
    let path = rootfs.join("proc");

    path.try_exists()
        .map_err(|source| Error::ExistenceCheck { path, source })
}

/// Returns true if this process lives in a different PID namespace than the
/// init process of `rootfs`.
///
/// # Errors
///
/// Returns [`Error::ReadSymlink`] if either namespace link cannot be read.
pub fn is_pid_namespace_isolated(rootfs: &Path) -> Result<bool> {
    let read_ns = |path: &Path| {
        std::fs::read_link(path).map_err(|source| Error::ReadSymlink {
            path: path.to_path_buf(),
            source,
        })
    };

    let own = read_ns(Path::new("/proc/self/ns/pid"))?;
    let init = read_ns(&rootfs.join("proc/1/ns/pid"))?;

    Ok(own != init)
}

/// Returns true if any line of a `/proc/<pid>/cgroup` style file names a
/// container runtime or a container id.
///
/// # Errors
///
/// Returns [`Error::FileOpen`] or [`Error::ReadLine`] if the file cannot be read.
pub fn matches_container_cgroup(path: &Path) -> Result<bool> {
    let mut buf = fsutil::open_file_reader(path)?;
    let mut line = String::with_capacity(256);

    while buf.read_line(&mut line).map_err(|source| Error::ReadLine {
        path: path.to_path_buf(),
        source,
    })? != 0
    {
        if is_container_cgroup_line(&line) {
            return Ok(true);
        }
        line.clear();
    }

    Ok(false)
}

fn is_container_cgroup_line(line: &str) -> bool {
    RUNTIME_MARKERS.iter().any(|marker| line.contains(marker))
        || line
            .trim_end()
            .split(['/', '-', '.'])
            .any(|part| part.len() >= 32 && is_non_empty_hex_string(part))
}

/// Returns true if marker files below `rootfs` announce a container runtime.
pub fn has_container_marker_files(rootfs: &Path) -> bool {
    rootfs.join(".dockerenv").exists() || rootfs.join("run/.containerenv").exists()
}

/// Returns true if the input string is not empty and contains only ASCII hex digits.
pub fn is_non_empty_hex_string(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}
