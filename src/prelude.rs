//! Core types and error handling
//!
//! This module re-exports commonly used types and traits for the zxip-rs crate.

pub use crate::database::{ByteSource, Database, DatabaseManager, Ipdb, LookupRecord, ZXIPv6Database};
pub use crate::error::{Result, ZxipError};
pub use crate::ip::{Address, AddressRange, Family};
