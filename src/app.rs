use tracing_subscriber::EnvFilter;

use crate::domain::error::Result;
use crate::infrastructure::config::GeneratorConfig;

/// Install the fmt subscriber; a subscriber already set by the host is kept
pub fn init_tracing(config: &GeneratorConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load the configuration and start logging
pub fn bootstrap() -> Result<GeneratorConfig> {
    let config = GeneratorConfig::load()?;
    init_tracing(&config);
    tracing::info!(
        sample_bytes = config.sample_bytes,
        max_column = config.max_column,
        header_detection = ?config.header_detection,
        "Catalog generator ready"
    );
    Ok(config)
}
