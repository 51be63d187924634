//! Configuration management for the Maize Planting Predictor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with MAIZE prefix (e.g. MAIZE__MODEL__PATH)

use std::path::Path;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Default location of the exported model artifact
pub const DEFAULT_MODEL_PATH: &str = "maize_planting_model.json";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Model artifact configuration
    pub model: ModelConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Path to the exported model artifact
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set
    pub filter: String,

    /// Emit logs as JSON lines
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("MAIZE_ENVIRONMENT").unwrap_or_else(|_| "production".into());
        Self::load_from(&environment, Path::new("config"))
    }

    /// Load configuration for `environment`, reading files from `config_dir`
    pub fn load_from(environment: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let file = config_dir.join(environment);

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("model.path", DEFAULT_MODEL_PATH)?
            .set_default("logging.filter", "warn")?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&file.to_string_lossy()).required(false))
            // Override with environment variables (MAIZE prefix)
            .add_source(
                Environment::with_prefix("MAIZE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_MODEL_PATH.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            json: false,
        }
    }
}
