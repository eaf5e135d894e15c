//! Error types for zxip-rs
//!
//! This module defines custom error types using thiserror for better error handling.

use crate::ip::Family;
use thiserror::Error;

/// Main error type for zxip-rs
#[derive(Error, Debug)]
pub enum ZxipError {
    /// Text or raw bytes that are not an IPv4/IPv6 address
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    /// Two addresses of different families were compared
    #[error("Address family mismatch: {left} vs {right}")]
    FamilyMismatch { left: Family, right: Family },

    /// Range bounds out of order or of different families
    #[error("Invalid address range: {0}")]
    InvalidRange(String),

    /// Prefix length is not a number or wider than the address
    #[error("Invalid prefix length: {0}")]
    InvalidPrefix(String),

    /// Database header missing or inconsistent
    #[error("Corrupt database header: {0}")]
    CorruptHeader(String),

    /// Query address is not handled by this database
    #[error("Unsupported address family for this database: {0}")]
    UnsupportedFamily(Family),

    /// Read past the end of the database
    #[error("Truncated read: offset={offset}, len={len}")]
    TruncatedRead { offset: u64, len: usize },

    /// Redirect chain longer than the configured limit
    #[error("Redirect loop or chain too deep at offset {offset} (limit {limit})")]
    RedirectLoopOrTooDeep { offset: u64, limit: usize },

    /// No database is loaded for the requested family
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for zxip-rs
pub type Result<T> = std::result::Result<T, ZxipError>;

impl ZxipError {
    /// Create an invalid address error
    pub fn address<S: Into<String>>(msg: S) -> Self {
        ZxipError::InvalidAddress(msg.into())
    }

    /// Create an invalid range error
    pub fn range<S: Into<String>>(msg: S) -> Self {
        ZxipError::InvalidRange(msg.into())
    }

    /// Create a corrupt header error
    pub fn header<S: Into<String>>(msg: S) -> Self {
        ZxipError::CorruptHeader(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ZxipError::ConfigError(msg.into())
    }
}
