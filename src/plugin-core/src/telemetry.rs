use crate::config::LogFormat;

use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// Initialize the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`.
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let collector = Registry::default().with(env_filter);

    match format {
        LogFormat::Compact => collector
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()?,
        LogFormat::Json => collector
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }
    Ok(())
}
