use anyhow::Context as _;

const DEFAULT_DIRECTIVES: &str = "info,tower_http=info";

/// Installs the stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_DIRECTIVES))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    tracing::debug!(default = DEFAULT_DIRECTIVES, "logging initialized");
    Ok(())
}
