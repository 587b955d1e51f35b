//! Runtime environment detection.
//!
//! Decides whether the process runs inside a container or directly on a host,
//! which selects the resource report logged by the `auto` profile.
mod checks;
mod detect;
mod error;

pub use detect::{RuntimeEnvironment, detect_runtime_environment};
pub use error::{Error, Result};
