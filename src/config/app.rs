//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! kart-rating tool, including environment variable and file loading and
//! validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub store: StoreSettings,
    pub rating: RatingConfig,
}

/// Process-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Rating store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// CSV file holding one column per player
    pub path: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "kart-rating".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("player_data.csv"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Store settings
        if let Ok(path) = env::var("RATING_STORE_PATH") {
            config.store.path = PathBuf::from(path);
        }

        // Rating settings
        if let Ok(k) = env::var("K_CONSTANT") {
            config.rating.k_constant = k
                .parse()
                .map_err(|_| anyhow!("Invalid K_CONSTANT value: {}", k))?;
        }
        if let Ok(l) = env::var("L_CONSTANT") {
            config.rating.l_constant = l
                .parse()
                .map_err(|_| anyhow!("Invalid L_CONSTANT value: {}", l))?;
        }
        if let Ok(bot_elo) = env::var("BOT_ELO") {
            config.rating.bot_elo = bot_elo
                .parse()
                .map_err(|_| anyhow!("Invalid BOT_ELO value: {}", bot_elo))?;
        }
        if let Ok(size) = env::var("FIELD_SIZE") {
            config.rating.field_size = size
                .parse()
                .map_err(|_| anyhow!("Invalid FIELD_SIZE value: {}", size))?;
        }
        if let Ok(initial) = env::var("INITIAL_RATING") {
            config.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid INITIAL_RATING value: {}", initial))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate store settings
    if config.store.path.as_os_str().is_empty() {
        return Err(anyhow!("Rating store path cannot be empty"));
    }

    config.rating.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.store.path, PathBuf::from("player_data.csv"));
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_store_path() {
        let mut config = AppConfig::default();
        config.store.path = PathBuf::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [store]
            path = "league.csv"

            [rating]
            k_constant = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.store.path, PathBuf::from("league.csv"));
        assert_eq!(config.rating.k_constant, 2.5);
        assert_eq!(config.rating.l_constant, 1.0);
        assert_eq!(config.rating.field_size, 12);
        assert_eq!(config.service.name, "kart-rating");
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "kart-rating-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[service]\nlog_level = \"debug\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.service.log_level, "debug");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_missing_file() {
        let result = AppConfig::from_file("/nonexistent/kart-rating.toml");
        assert!(result.is_err());
    }
}
