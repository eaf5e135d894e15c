//! Database module for zxip-rs
//!
//! This module provides the ZX IPDB lookup engine and a unified interface over
//! the IPv4 and IPv6 databases.
//!
//! # Module Organization
//!
//! - `types`: Common type definitions (LookupRecord)
//! - `traits`: Trait definitions (Database trait)
//! - `source`: Positioned reads over buffers and memory-mapped files
//! - `manager`: Database manager for handling both address families
//! - Database implementations: ipdb, zxipv6

// Core modules
pub mod types;
pub mod traits;
pub mod source;
pub mod manager;

// Database implementation modules
pub mod ipdb;
pub mod zxipv6;

// Re-export core types and traits for convenience
pub use types::LookupRecord;
pub use traits::Database;
pub use source::ByteSource;
pub use manager::DatabaseManager;

// Re-export database implementations
pub use ipdb::Ipdb;
pub use zxipv6::ZXIPv6Database;
