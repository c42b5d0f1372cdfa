// src/config/mod.rs
mod schema;

use std::path::{Path, PathBuf};
use ::config::{Config as ConfigLoader, FileFormat};
use tracing::{info, warn};
use url::Url;

pub use schema::{
    Config, ApiConfig, HistoryConfig, OrchestratorConfig,
    OverlapPolicy, GateConfig, OutputConfig
};

use crate::error::{ThreatScopeResult, ThreatScopeError};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Centralized configuration handling
impl Config {
    /// Load configuration from a file or create default if not found
    pub fn load(config_path: Option<&Path>) -> ThreatScopeResult<Self> {
        info!("Loading configuration");

        let mut config_builder = ConfigLoader::builder();

        // Default configuration
        config_builder = config_builder.add_source(
            ::config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml)
        );

        // User-provided configuration
        if let Some(path) = config_path {
            if path.exists() {
                config_builder = config_builder.add_source(::config::File::from(path));
                info!("Loading user configuration from: {}", path.display());
            } else {
                warn!("Specified configuration file not found: {}", path.display());
            }
        } else {
            let default_path = Self::get_default_config_path();
            if default_path.exists() {
                config_builder = config_builder.add_source(::config::File::from(default_path.as_path()));
                info!("Loading default configuration from: {}", default_path.display());
            } else {
                info!("No existing configuration found, using built-in defaults");
            }
        }

        // Environment variables, e.g. THREATSCOPE_API__BASE_URL
        config_builder = config_builder.add_source(
            ::config::Environment::with_prefix("THREATSCOPE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("api.deep_scan_types")
        );

        let config: Config = match config_builder.build() {
            Ok(c) => match c.try_deserialize() {
                Ok(config) => config,
                Err(e) => return Err(ThreatScopeError::ConfigError(format!("Failed to parse configuration: {}", e))),
            },
            Err(e) => return Err(ThreatScopeError::ConfigError(format!("Failed to build configuration: {}", e))),
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string layered over the built-in defaults
    pub fn from_toml(content: &str) -> ThreatScopeResult<Self> {
        let config: Config = ConfigLoader::builder()
            .add_source(::config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(::config::File::from_str(content, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ThreatScopeError::ConfigError(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> ThreatScopeResult<()> {
        Url::parse(&self.api.base_url)
            .map_err(|e| ThreatScopeError::ConfigError(format!("Invalid api.base_url {}: {}", self.api.base_url, e)))?;

        if self.api.deep_scan_types.is_empty() {
            return Err(ThreatScopeError::ConfigError("api.deep_scan_types must not be empty".to_string()));
        }

        if self.history.max_entries == 0 {
            return Err(ThreatScopeError::ConfigError("history.max_entries must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Get the default configuration path
    pub fn get_default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".threatscope/config.toml")
    }

    /// Initialize a new configuration
    pub fn init(force: bool) -> ThreatScopeResult<PathBuf> {
        let config_path = Self::get_default_config_path();
        Config::default().write_new(&config_path, force)?;
        Ok(config_path)
    }

    /// Write this configuration to a new file, refusing to clobber unless forced
    pub fn write_new(&self, config_path: &Path, force: bool) -> ThreatScopeResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ThreatScopeError::FileError {
                    path: parent.to_path_buf(),
                    message: format!("Failed to create directory: {}", e),
                })?;
        }

        if config_path.exists() && !force {
            return Err(ThreatScopeError::ConfigError(
                format!("Configuration already exists at {}. Use --force to overwrite.", config_path.display())
            ));
        }

        self.save(config_path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ThreatScopeResult<()> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| ThreatScopeError::SerializationError(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, config_str)
            .map_err(|e| ThreatScopeError::FileError {
                path: path.to_path_buf(),
                message: format!("Failed to write configuration: {}", e),
            })?;

        info!("Configuration saved to {}", path.display());

        Ok(())
    }
}
