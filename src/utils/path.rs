//! Path utilities for configuration and database files
//!
//! Handles XDG directory specifications and path resolution.

use crate::error::{Result, ZxipError};
use std::env;
use std::path::{Path, PathBuf};

/// Directory name under the XDG config/data roots
pub const APP_DIR: &str = "zxip-rs";
pub const CONFIG_FILE: &str = "config.yaml";

/// Default database file names
pub const IPV4_DB_FILE: &str = "qqwry.db";
pub const IPV6_DB_FILE: &str = "ipv6wry.db";

/// First set variable of `vars`, else `fallback/zxip-rs`
fn resolve_dir(vars: &[&str], fallback: Option<PathBuf>) -> Option<PathBuf> {
    vars.iter()
        .find_map(|name| env::var_os(name).filter(|v| !v.is_empty()))
        .map(PathBuf::from)
        .or_else(|| fallback.map(|dir| dir.join(APP_DIR)))
}

/// Get the zxip configuration directory
///
/// Priority:
/// 1. ZXIP_CONFIG_HOME environment variable
/// 2. ZXIP_HOME environment variable
/// 3. XDG_CONFIG_HOME/zxip-rs
/// 4. ~/.config/zxip-rs (fallback)
pub fn config_dir() -> Result<PathBuf> {
    resolve_dir(&["ZXIP_CONFIG_HOME", "ZXIP_HOME"], dirs::config_dir())
        .ok_or_else(|| ZxipError::config("cannot determine config directory"))
}

/// Get the zxip data directory for databases
///
/// Priority:
/// 1. ZXIP_DB_HOME environment variable
/// 2. ZXIP_HOME environment variable
/// 3. XDG_DATA_HOME/zxip-rs
/// 4. ~/.local/share/zxip-rs (fallback)
pub fn data_dir() -> Result<PathBuf> {
    resolve_dir(&["ZXIP_DB_HOME", "ZXIP_HOME"], dirs::data_dir())
        .ok_or_else(|| ZxipError::config("cannot determine data directory"))
}

/// Get the path to the config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Get the path to a database file
pub fn database_file(name: &str) -> Result<PathBuf> {
    Ok(data_dir()?.join(name))
}

/// Ensure directory exists, create if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .map_err(|e| ZxipError::config(format!("failed to create {}: {}", path.display(), e)))?;
    }
    Ok(())
}

/// Ensure the zxip directories exist
pub fn ensure_zxip_dirs() -> Result<()> {
    ensure_dir(&config_dir()?)?;
    ensure_dir(&data_dir()?)?;
    Ok(())
}

/// Expand tilde (~) in path
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dir_fallback() {
        let dir = resolve_dir(&["ZXIP_TEST_UNSET_VARIABLE"], Some(PathBuf::from("/xdg")));
        assert_eq!(dir, Some(PathBuf::from("/xdg").join(APP_DIR)));
        assert_eq!(resolve_dir(&["ZXIP_TEST_UNSET_VARIABLE"], None), None);
    }

    #[test]
    fn test_resolve_dir_prefers_env() {
        // PATH is set in any test environment
        let dir = resolve_dir(&["ZXIP_TEST_UNSET_VARIABLE", "PATH"], Some(PathBuf::from("/xdg")));
        assert_eq!(dir, env::var_os("PATH").map(PathBuf::from));
    }

    #[test]
    fn test_database_file() {
        let path = database_file(IPV4_DB_FILE).unwrap();
        assert!(path.ends_with(IPV4_DB_FILE));
        assert!(config_file().unwrap().ends_with(CONFIG_FILE));
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test");
        assert!(!path.to_string_lossy().starts_with("~"));
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
