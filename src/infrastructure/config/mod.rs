use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::HeaderMode;

pub const DEFAULT_CONFIG_FILE: &str = "catalog_generator.toml";
pub const ENV_PREFIX: &str = "CATALOG_";

/// Settings for reading uploads and running the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeneratorConfig {
    /// Leading bytes decoded to detect the CSV delimiter (default: 4096, at least 64)
    #[validate(range(min = 64))]
    pub sample_bytes: usize,

    /// Largest 1-based column a selector may point at (default: 50)
    #[validate(range(min = 1))]
    pub max_column: usize,

    /// Header row handling for uploaded tables
    pub header_detection: HeaderMode,

    /// `EnvFilter` directive for the tracing subscriber
    #[validate(length(min = 1))]
    pub log_filter: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sample_bytes: 4096,
            max_column: 50,
            header_detection: HeaderMode::Auto,
            log_filter: "info".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Defaults, then `catalog_generator.toml`, then `CATALOG_*` variables
    /// (a `.env` file is loaded first when present)
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: GeneratorConfig = Self::figment(path).extract()?;
        config.check()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(GeneratorConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Validate configuration values
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|e| {
            AppError::ValidationError(format!("Invalid generator config: {}", e))
        })
    }
}
