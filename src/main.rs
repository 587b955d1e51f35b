/// Entry point for the Pagewatch page server.
///
/// Installs the logger, reads the configuration from the environment, logs
/// the resources allocated to the process and then serves the static pages.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a logger is already
/// installed, or the listener cannot be bound.
///
/// # Examples
///
/// ```bash
/// PORT=8080 RESOURCE_PROFILE=auto cargo run
/// ```
#[tokio::main]
async fn main() -> pagewatch::Result<()> {
    let logger = pagewatch::logging::init()?;
    let config = pagewatch::Config::from_env()?;
    pagewatch::run(config, logger).await?;
    Ok(())
}
