//! Trait definitions for the database module
//!
//! This module defines the common interface that all database implementations must follow.

use crate::error::Result;
use crate::ip::{Address, Family};

use super::types::LookupRecord;

/// Common trait for all database implementations
pub trait Database {
    fn name(&self) -> &str;

    /// Whether `lookup` accepts addresses of `family`
    fn supports(&self, family: Family) -> bool;

    /// Look up the range and location containing `addr`
    fn lookup(&self, addr: &Address) -> Result<LookupRecord>;

    /// Version text stored in the database
    fn version(&self) -> Result<String>;
}
