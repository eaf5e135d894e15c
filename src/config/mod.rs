//! Configuration module for zxip-rs
//!
//! Handles loading and managing configuration from YAML files and environment variables.

use crate::database::ipdb::reader::DEFAULT_REDIRECT_LIMIT;
use crate::error::{Result, ZxipError};
use crate::utils::path;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables overriding the database file paths
pub const ENV_DB_IP4: &str = "ZXIP_DB_IP4";
pub const ENV_DB_IP6: &str = "ZXIP_DB_IP6";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub global: GlobalConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// IPv4 database file; `qqwry.db` in the data directory when unset
    #[serde(default)]
    pub ipv4_path: Option<String>,

    /// IPv6 database file; `ipv6wry.db` in the data directory when unset
    #[serde(default)]
    pub ipv6_path: Option<String>,

    /// Maximum chained redirects followed while decoding one record
    #[serde(default = "default_redirect_limit")]
    pub redirect_limit: usize,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub enable_colors: bool,

    /// Output in JSON format
    #[serde(default)]
    pub json: bool,
}

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Verbose logging
    #[serde(default)]
    pub verbose: bool,

    /// File the configuration was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

fn default_redirect_limit() -> usize {
    DEFAULT_REDIRECT_LIMIT
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            ipv4_path: None,
            ipv6_path: None,
            redirect_limit: default_redirect_limit(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enable_colors: true,
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file and environment variables
    pub fn load() -> Result<Self> {
        // Ensure directories exist
        path::ensure_zxip_dirs()?;

        let config_file = path::config_file()?;
        let mut config = Self::load_from(&config_file)?;

        // Override with environment variables
        config.apply_env();

        Ok(config)
    }

    /// Load `config_file`, writing the default configuration there if it is missing
    pub fn load_from(config_file: &Path) -> Result<Self> {
        let mut config = if config_file.exists() {
            log::debug!("Reading config file: {}", config_file.display());
            let content = fs::read_to_string(config_file)
                .map_err(|e| ZxipError::config(format!("Failed to read config file: {}", e)))?;

            Self::from_yaml(&content)?
        } else {
            log::info!("Creating default config file: {}", config_file.display());
            let config = Self::default();
            config.save(config_file)?;
            config
        };

        config.global.config_path = Some(config_file.to_path_buf());
        Ok(config)
    }

    /// Parse a YAML document; missing sections and fields take their defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ZxipError::YamlError(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_DB_IP4).filter(|v| !v.is_empty()) {
            self.database.ipv4_path = Some(val);
        }
        if let Some(val) = lookup(ENV_DB_IP6).filter(|v| !v.is_empty()) {
            self.database.ipv6_path = Some(val);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| ZxipError::YamlError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            path::ensure_dir(parent)?;
        }
        fs::write(path, yaml)
            .map_err(|e| ZxipError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Resolved IPv4 database file
    pub fn ipv4_database_path(&self) -> Result<PathBuf> {
        Self::database_path(self.database.ipv4_path.as_deref(), path::IPV4_DB_FILE)
    }

    /// Resolved IPv6 database file
    pub fn ipv6_database_path(&self) -> Result<PathBuf> {
        Self::database_path(self.database.ipv6_path.as_deref(), path::IPV6_DB_FILE)
    }

    fn database_path(custom: Option<&str>, default_file: &str) -> Result<PathBuf> {
        match custom {
            Some(custom_path) => Ok(path::expand_tilde(custom_path)),
            None => path::database_file(default_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.database.ipv4_path.is_none());
        assert_eq!(config.database.redirect_limit, DEFAULT_REDIRECT_LIMIT);
        assert!(config.output.enable_colors);
        assert!(!config.output.json);
        assert!(config.ipv4_database_path().unwrap().ends_with("qqwry.db"));
        assert!(config.ipv6_database_path().unwrap().ends_with("ipv6wry.db"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = AppConfig::from_yaml("database:\n  ipv4_path: /srv/qqwry.db\n").unwrap();
        assert_eq!(config.database.ipv4_path.as_deref(), Some("/srv/qqwry.db"));
        assert_eq!(config.database.redirect_limit, DEFAULT_REDIRECT_LIMIT);
        assert!(config.output.enable_colors);
        assert_eq!(
            config.ipv4_database_path().unwrap(),
            PathBuf::from("/srv/qqwry.db")
        );

        assert!(matches!(
            AppConfig::from_yaml("output: [1, 2"),
            Err(ZxipError::YamlError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| match name {
            ENV_DB_IP6 => Some("/data/ipv6wry.db".to_string()),
            _ => None,
        });
        assert!(config.database.ipv4_path.is_none());
        assert_eq!(config.database.ipv6_path.as_deref(), Some("/data/ipv6wry.db"));
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("config.yaml");

        // first load writes the defaults
        let created = AppConfig::load_from(&file).unwrap();
        assert!(file.exists());
        assert_eq!(created.global.config_path.as_deref(), Some(file.as_path()));

        let mut config = created.clone();
        config.database.ipv4_path = Some("/tmp/custom.db".to_string());
        config.database.redirect_limit = 8;
        config.output.json = true;
        config.save(&file).unwrap();

        let loaded = AppConfig::load_from(&file).unwrap();
        assert_eq!(loaded.database.ipv4_path.as_deref(), Some("/tmp/custom.db"));
        assert_eq!(loaded.database.redirect_limit, 8);
        assert!(loaded.output.json);
        assert!(!loaded.global.verbose);
    }
}
