//! Pagewatch: a small static page server that reports the resources it was
//! given when it starts.
//!
//! On startup the [`inspector`] logs memory, CPU and disk allocation, read from
//! cgroup v1/v2 files inside a container or from the OS on a plain host. The
//! [`server`] then serves three static pages on `0.0.0.0:$PORT`.
pub mod cgroup;
pub mod config;
pub mod environment;
pub mod error;
pub mod fsutil;
pub mod inspector;
pub mod logging;
pub mod server;

#[cfg(test)]
mod testutil;

pub use config::Config;
pub use error::{Error, Result};

/// Runs the application.
///
/// Logs the resource report through `logger`, then binds the page server
/// and serves until the process exits. The report never fails; it cannot
/// keep the server from starting.
///
/// # Errors
///
/// Returns [`Error::Bind`] if the listen address is unavailable and
/// [`Error::Serve`] if the server stops with an I/O error.
pub async fn run(config: Config, logger: &dyn log::Log) -> Result<()> {
    inspector::run_startup_diagnostics(&config, logger, inspector::SysinfoProbe);
    server::PageServer::new().listen(config.listen_addr()).await
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::SocketAddr;

    use super::*;
    use crate::config::Profile;
    use crate::server::PageServer;
    use crate::testutil::{CaptureLogger, FakeProbe};

    #[tokio::test]
    async fn test_server_starts_after_diagnostics_with_every_source_failing() {
        let dir = tempfile::tempdir().unwrap();
        let logger = CaptureLogger::new();
        for profile in [Profile::Container, Profile::Host] {
            let config = Config {
                profile,
                cgroup_root: dir.path().join("absent"),
                ..Config::default()
            };
            inspector::run_startup_diagnostics(&config, &logger, FakeProbe::failing());
        }

        let listener = PageServer::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(PageServer::new().serve(listener));

        let response = tokio::task::spawn_blocking(move || {
            let mut stream = std::net::TcpStream::connect(addr).unwrap();
            stream
                .write_all(b"GET /contact HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                .unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            response
        })
        .await
        .unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.contains("<title>Contact</title>"));
    }
}
