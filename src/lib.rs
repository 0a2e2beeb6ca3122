pub mod calculators;
pub mod commands;
pub mod config;
pub mod format;
pub mod models;

use tracing_subscriber::EnvFilter;

/// Install the log subscriber for a host application.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} calculators ready v{}", config::APP_NAME, config::APP_VERSION);
    }
}
