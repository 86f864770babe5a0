use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Safe to call multiple times; later calls keep the subscriber already installed.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = installed {
        tracing::debug!(error = %err, "global subscriber already set; keeping it");
    }
}
